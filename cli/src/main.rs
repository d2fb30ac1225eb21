//! CLI entrypoint for Fire Circle
//!
//! Wires together all layers using dependency injection: the figment
//! config loader, the OpenAI-compatible gateway, the filesystem
//! deliberation store, and the deliberation use case.

mod commands;
mod output;
mod progress;

use anyhow::{Context, Result, bail};
use circle_application::{
    DeliberationParams, DeliberationProgress, DeliberationStore, FailureMode, NoProgress,
    RunDeliberationInput, RunDeliberationUseCase, StoreTags, StoredId,
};
use circle_domain::{EvaluationTarget, Model};
use circle_infrastructure::{ConfigLoader, FileConfig, FsDeliberationStore, OpenAiCompatGateway};
use clap::Parser;
use commands::{Cli, Command, OutputFormat};
use output::ConsoleFormatter;
use progress::ConsoleProgress;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?
    };

    match cli.command {
        Command::Evaluate {
            prompt,
            prompt_file,
            response_file,
            model,
            max_rounds,
            strict,
            store,
            category,
            source_id,
            output,
        } => {
            let target = build_target(prompt, prompt_file, response_file)?;
            let participants = resolve_participants(&model, &config);
            let params = build_params(&config, max_rounds, strict);

            run_evaluate(
                &config,
                target,
                participants,
                params,
                store,
                category,
                source_id,
                output,
                cli.quiet,
            )
            .await
        }
        Command::Show { id } => {
            let store = open_store(&config)?;
            let record = store.get(&StoredId::new(id)).await?;
            println!("{}", ConsoleFormatter::format_record(&record));
            Ok(())
        }
        Command::Category { name, limit } => {
            let store = open_store(&config)?;
            let rows = store.query_by_category(&name, limit).await?;
            println!("{}", ConsoleFormatter::format_metadata_rows(&rows));
            Ok(())
        }
        Command::Pattern {
            name,
            min_agreement,
            limit,
        } => {
            let store = open_store(&config)?;
            let rows = store.query_by_pattern(&name, min_agreement, limit).await?;
            println!("{}", ConsoleFormatter::format_metadata_rows(&rows));
            Ok(())
        }
        Command::Dissents { min_delta, limit } => {
            let store = open_store(&config)?;
            let rows = store.find_dissents(min_delta, limit).await?;
            println!("{}", ConsoleFormatter::format_dissent_rows(&rows));
            Ok(())
        }
        Command::ShowConfig => {
            ConfigLoader::print_config_sources();
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_evaluate(
    config: &FileConfig,
    target: EvaluationTarget,
    participants: Vec<Model>,
    params: DeliberationParams,
    store: bool,
    category: Option<String>,
    source_id: Option<String>,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    // === Dependency Injection ===
    let gateway = Arc::new(OpenAiCompatGateway::new(
        &config.gateway.base_url,
        config.gateway.api_key(),
    )?);
    let use_case = RunDeliberationUseCase::new(gateway);
    let input = RunDeliberationInput::new(target, participants).with_params(params);

    let console = ConsoleProgress;
    let silent = NoProgress;
    let progress: &dyn DeliberationProgress = if quiet { &silent } else { &console };
    let result = use_case.execute_with_progress(input, progress).await?;

    if store {
        let store = open_store(config)?;
        let tags = StoreTags {
            category,
            source_id,
        };
        let id = store.store(&result, tags).await?;
        info!("Deliberation stored as {}", id);
        eprintln!("stored: {id}");
    }

    let rendered = match output {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{rendered}");
    Ok(())
}

fn build_target(
    prompt: Option<String>,
    prompt_file: Option<PathBuf>,
    response_file: Option<PathBuf>,
) -> Result<EvaluationTarget> {
    let prompt = match (prompt, prompt_file) {
        (Some(text), None) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading prompt file {}", path.display()))?,
        (None, None) => bail!("provide a prompt argument or --prompt-file"),
        (Some(_), Some(_)) => unreachable!("clap conflicts_with enforces exclusivity"),
    };

    let response = response_file
        .map(|path| {
            std::fs::read_to_string(&path)
                .with_context(|| format!("reading response file {}", path.display()))
        })
        .transpose()?;

    EvaluationTarget::try_new(prompt, response).map_err(Into::into)
}

fn resolve_participants(flags: &[String], config: &FileConfig) -> Vec<Model> {
    if flags.is_empty() {
        config.models.participant_models()
    } else {
        flags
            .iter()
            .map(|s| s.parse().expect("Model::from_str is infallible"))
            .collect()
    }
}

fn build_params(config: &FileConfig, max_rounds: Option<usize>, strict: bool) -> DeliberationParams {
    let mut params = config.circle.deliberation_params();
    if let Some(max) = max_rounds {
        params = params.with_max_rounds(max);
    }
    if strict {
        params = params.with_failure_mode(FailureMode::Strict);
    }
    params
}

fn open_store(config: &FileConfig) -> Result<FsDeliberationStore> {
    let root = config.storage.resolved_root();
    FsDeliberationStore::open(&root)
        .with_context(|| format!("opening deliberation store at {}", root.display()))
}
