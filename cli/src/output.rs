//! Console output formatting for deliberation results and queries

use circle_application::{DeliberationMetadata, DeliberationRecord, StoredDissent};
use circle_domain::{FireCircleResult, Round};
use colored::Colorize;

/// Formats deliberation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Full output: verdict plus every round's evaluations
    pub fn format(result: &FireCircleResult) -> String {
        let mut output = Self::format_summary(result);
        output.push_str(&Self::section_header("Rounds"));
        for round in &result.rounds {
            output.push_str(&Self::format_round(round));
        }
        output
    }

    /// Summary output: verdict, patterns, and dissents
    pub fn format_summary(result: &FireCircleResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Verdict"));
        output.push_str(&format!(
            "{} {}\n",
            "Consensus:".cyan().bold(),
            Self::colored_triple(
                result.consensus.truth,
                result.consensus.indeterminacy,
                result.consensus.falsehood
            )
        ));
        output.push_str(&format!(
            "{} {} rounds, {} participants, quorum {}\n",
            "Circle:".cyan().bold(),
            result.round_count(),
            result.participants.len(),
            if result.quorum_valid {
                "valid".green().to_string()
            } else {
                "NOT met".red().bold().to_string()
            }
        ));
        output.push_str(&format!(
            "{} {:.0}% of rounds moved by the empty chair\n",
            "Empty chair:".cyan().bold(),
            result.empty_chair_influence * 100.0
        ));

        if !result.patterns.is_empty() {
            output.push_str(&Self::section_header("Patterns"));
            for pattern in &result.patterns {
                output.push_str(&format!(
                    "  {} (agreement {:.0}%)\n",
                    pattern.name.yellow(),
                    pattern.agreement_score * 100.0
                ));
            }
        }

        if !result.dissents.is_empty() {
            output.push_str(&Self::section_header("Dissents"));
            for dissent in &result.dissents {
                output.push_str(&format!(
                    "  round {}: {} (F high) vs {} (F low), delta {:.2}\n",
                    dissent.round_number,
                    dissent.model_high.red(),
                    dissent.model_low.green(),
                    dissent.f_delta
                ));
            }
        }

        output
    }

    /// JSON output of the complete result
    pub fn format_json(result: &FireCircleResult) -> String {
        serde_json::to_string_pretty(result)
            .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    /// A stored record, as loaded from the store
    pub fn format_record(record: &DeliberationRecord) -> String {
        let mut output = String::new();
        let meta = &record.metadata;

        output.push_str(&Self::section_header("Deliberation"));
        output.push_str(&format!("{} {}\n", "Id:".cyan().bold(), meta.fire_circle_id));
        output.push_str(&format!(
            "{} {}\n",
            "Started:".cyan().bold(),
            meta.started_at.to_rfc3339()
        ));
        if let Some(category) = &meta.category {
            output.push_str(&format!("{} {}\n", "Category:".cyan().bold(), category));
        }
        if let Some(source_id) = &meta.source_id {
            output.push_str(&format!("{} {}\n", "Source:".cyan().bold(), source_id));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Consensus:".cyan().bold(),
            Self::colored_triple(
                meta.consensus.truth,
                meta.consensus.indeterminacy,
                meta.consensus.falsehood
            )
        ));

        output.push_str(&Self::section_header("Rounds"));
        for round in &record.rounds {
            output.push_str(&Self::format_round(round));
        }

        if !record.dissents.is_empty() {
            output.push_str(&Self::section_header("Dissents"));
            for d in &record.dissents {
                output.push_str(&format!(
                    "  round {}: {} ({}) vs {} ({}), delta {:.2}\n",
                    d.round_number,
                    d.model_high.red(),
                    Self::truncate(&d.reasoning_high, 60),
                    d.model_low.green(),
                    Self::truncate(&d.reasoning_low, 60),
                    d.f_delta
                ));
            }
        }

        output
    }

    /// Metadata rows for category/pattern queries
    pub fn format_metadata_rows(rows: &[DeliberationMetadata]) -> String {
        if rows.is_empty() {
            return "(no matching deliberations)\n".dimmed().to_string();
        }
        let mut output = String::new();
        for meta in rows {
            output.push_str(&format!(
                "{}  {}  F={:.2}  {} rounds  {}\n",
                meta.started_at.format("%Y-%m-%d %H:%M"),
                meta.fire_circle_id.yellow(),
                meta.consensus.falsehood,
                meta.round_count,
                meta.category.as_deref().unwrap_or("-").dimmed()
            ));
        }
        output
    }

    /// Dissent rows for the dissents query
    pub fn format_dissent_rows(rows: &[StoredDissent]) -> String {
        if rows.is_empty() {
            return "(no preserved dissents above that threshold)\n"
                .dimmed()
                .to_string();
        }
        let mut output = String::new();
        for row in rows {
            output.push_str(&format!(
                "{}  {}  round {}  {} vs {}  delta {:.2}\n",
                row.started_at.format("%Y-%m-%d"),
                row.fire_circle_id.yellow(),
                row.dissent.round_number,
                row.dissent.model_high.red(),
                row.dissent.model_low.green(),
                row.dissent.f_delta
            ));
        }
        output
    }

    fn format_round(round: &Round) -> String {
        let mut output = format!(
            "\n{}\n",
            format!(
                "── Round {} (empty chair: {}) ──",
                round.round_number, round.empty_chair
            )
            .yellow()
            .bold()
        );
        for eval in round.evaluations.values() {
            let marker = if eval.model == round.empty_chair {
                "◦"
            } else {
                " "
            };
            output.push_str(&format!(
                "{} {}: {}  {}\n",
                marker,
                eval.model.bold(),
                Self::colored_triple(eval.truth, eval.indeterminacy, eval.falsehood),
                Self::truncate(&eval.reasoning, 100).dimmed()
            ));
        }
        output
    }

    fn colored_triple(truth: f64, indeterminacy: f64, falsehood: f64) -> String {
        let f_str = format!("F={falsehood:.2}");
        let f_colored = if falsehood >= 0.7 {
            f_str.red().bold().to_string()
        } else if falsehood >= 0.4 {
            f_str.yellow().to_string()
        } else {
            f_str.green().to_string()
        };
        format!("T={truth:.2} I={indeterminacy:.2} {f_colored}")
    }

    fn truncate(text: &str, limit: usize) -> String {
        if text.len() <= limit {
            return text.to_string();
        }
        let mut end = limit;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &text[..end])
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("=== {title} ===").cyan().bold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use circle_domain::{Consensus, NeutrosophicEvaluation};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn sample_result() -> FireCircleResult {
        let mut evaluations = BTreeMap::new();
        evaluations.insert(
            "alpha".to_string(),
            NeutrosophicEvaluation::new("alpha", 0.3, 0.1, 0.8, "coercive framing"),
        );
        evaluations.insert(
            "beta".to_string(),
            NeutrosophicEvaluation::new("beta", 0.6, 0.2, 0.3, "looks benign"),
        );
        let round = Round::new(1, "alpha", evaluations, BTreeMap::new());

        FireCircleResult {
            fire_circle_id: "fc-out".to_string(),
            started_at: Utc::now(),
            participants: vec!["alpha".to_string(), "beta".to_string()],
            rounds: vec![round],
            consensus: Consensus {
                truth: 0.3,
                indeterminacy: 0.2,
                falsehood: 0.8,
            },
            patterns: vec![],
            dissents: vec![],
            empty_chair_influence: 1.0,
            quorum_valid: true,
            duration: Duration::from_secs(3),
        }
    }

    #[test]
    fn test_summary_contains_verdict() {
        let text = ConsoleFormatter::format_summary(&sample_result());
        assert!(text.contains("Verdict"));
        assert!(text.contains("F=0.80"));
        assert!(text.contains("quorum"));
    }

    #[test]
    fn test_full_output_lists_rounds() {
        let text = ConsoleFormatter::format(&sample_result());
        assert!(text.contains("Round 1"));
        assert!(text.contains("alpha"));
        assert!(text.contains("coercive framing"));
    }

    #[test]
    fn test_json_output_parses_back() {
        let text = ConsoleFormatter::format_json(&sample_result());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["fire_circle_id"], "fc-out");
    }

    #[test]
    fn test_empty_metadata_rows() {
        let text = ConsoleFormatter::format_metadata_rows(&[]);
        assert!(text.contains("no matching"));
    }
}
