//! Participant roster — live/zombie state and empty-chair rotation
//!
//! The roster is the only mutable state of a deliberation. It is owned by
//! the deliberation engine and mutated strictly between rounds, never
//! while a round is in flight.

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Lifecycle state of one participant within a single deliberation
///
/// Transitions only move forward: a zombie never returns to live within
/// the same deliberation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParticipantState {
    /// Participating in rounds
    Live,
    /// Excluded after an unrecoverable failure
    Zombie {
        /// Round in which the participant was demoted
        since_round: usize,
        /// Why the participant was demoted
        reason: String,
    },
}

impl ParticipantState {
    pub fn is_live(&self) -> bool {
        matches!(self, ParticipantState::Live)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Participant {
    model: Model,
    state: ParticipantState,
    /// Round in which this participant last held the empty chair
    last_chaired: Option<usize>,
}

/// The set of participants in one deliberation
///
/// Tracks live/zombie state, rotates the empty chair over live
/// participants only, and records the minimum live count ever observed
/// (the basis for `quorum_valid`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleRoster {
    participants: Vec<Participant>,
    min_live_seen: usize,
}

impl CircleRoster {
    /// Create a roster with every participant live
    pub fn new(models: Vec<Model>) -> Self {
        let min_live_seen = models.len();
        let participants = models
            .into_iter()
            .map(|model| Participant {
                model,
                state: ParticipantState::Live,
                last_chaired: None,
            })
            .collect();
        Self {
            participants,
            min_live_seen,
        }
    }

    /// Live participants, in configured order
    pub fn live(&self) -> Vec<Model> {
        self.participants
            .iter()
            .filter(|p| p.state.is_live())
            .map(|p| p.model.clone())
            .collect()
    }

    /// Number of live participants
    pub fn live_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| p.state.is_live())
            .count()
    }

    /// Whether a participant is still live
    pub fn is_live(&self, model: &Model) -> bool {
        self.participants
            .iter()
            .any(|p| &p.model == model && p.state.is_live())
    }

    /// Minimum live count ever observed over the deliberation
    pub fn min_live_seen(&self) -> usize {
        self.min_live_seen
    }

    /// Demote a participant to zombie; a no-op for unknown or already
    /// demoted participants. Returns whether a demotion happened.
    pub fn mark_zombie(&mut self, model: &Model, round: usize, reason: impl Into<String>) -> bool {
        let Some(participant) = self
            .participants
            .iter_mut()
            .find(|p| &p.model == model && p.state.is_live())
        else {
            return false;
        };
        participant.state = ParticipantState::Zombie {
            since_round: round,
            reason: reason.into(),
        };
        self.min_live_seen = self.min_live_seen.min(self.live_count());
        true
    }

    /// Assign the empty chair for the given round.
    ///
    /// The chair goes to the live participant that has held the role
    /// least recently: never-chaired participants first, then by oldest
    /// `last_chaired`, ties broken by roster order. Zombies are skipped,
    /// not counted. Returns `None` when nobody is live.
    pub fn assign_empty_chair(&mut self, round: usize) -> Option<Model> {
        // Strict `<` keeps the earliest roster position on ties
        let mut chair: Option<(usize, usize)> = None;
        for (index, participant) in self.participants.iter().enumerate() {
            if !participant.state.is_live() {
                continue;
            }
            let key = participant.last_chaired.map_or(0, |r| r + 1);
            if chair.is_none_or(|(_, best)| key < best) {
                chair = Some((index, key));
            }
        }

        let (chair_index, _) = chair?;
        let participant = &mut self.participants[chair_index];
        participant.last_chaired = Some(round);
        Some(participant.model.clone())
    }

    /// Zombie participants with their demotion round and reason
    pub fn zombies(&self) -> Vec<(Model, usize, String)> {
        self.participants
            .iter()
            .filter_map(|p| match &p.state {
                ParticipantState::Zombie { since_round, reason } => {
                    Some((p.model.clone(), *since_round, reason.clone()))
                }
                ParticipantState::Live => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models(ids: &[&str]) -> Vec<Model> {
        ids.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn roster(ids: &[&str]) -> CircleRoster {
        CircleRoster::new(models(ids))
    }

    #[test]
    fn test_all_live_initially() {
        let r = roster(&["a", "b", "c"]);
        assert_eq!(r.live_count(), 3);
        assert_eq!(r.min_live_seen(), 3);
        assert!(r.zombies().is_empty());
    }

    #[test]
    fn test_rotation_covers_everyone_before_repeating() {
        let mut r = roster(&["a", "b", "c"]);
        let mut chairs = Vec::new();
        for round in 1..=3 {
            chairs.push(r.assign_empty_chair(round).unwrap().to_string());
        }
        let mut sorted = chairs.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3, "no repeat before full coverage: {chairs:?}");

        // Fourth round wraps back to the first chair
        let fourth = r.assign_empty_chair(4).unwrap().to_string();
        assert_eq!(fourth, chairs[0]);
    }

    #[test]
    fn test_rotation_skips_zombies() {
        let mut r = roster(&["a", "b", "c"]);
        let first = r.assign_empty_chair(1).unwrap();
        assert_eq!(first.to_string(), "a");

        r.mark_zombie(&"b".parse().unwrap(), 1, "call failed");
        let second = r.assign_empty_chair(2).unwrap();
        assert_eq!(second.to_string(), "c");
        let third = r.assign_empty_chair(3).unwrap();
        assert_eq!(third.to_string(), "a");
    }

    #[test]
    fn test_zombie_transition_is_one_way() {
        let mut r = roster(&["a", "b"]);
        let b: Model = "b".parse().unwrap();
        assert!(r.mark_zombie(&b, 1, "timeout"));
        assert!(!r.mark_zombie(&b, 2, "again"), "already a zombie");
        assert!(!r.is_live(&b));

        let zombies = r.zombies();
        assert_eq!(zombies.len(), 1);
        assert_eq!(zombies[0].1, 1, "original demotion round preserved");
        assert_eq!(zombies[0].2, "timeout");
    }

    #[test]
    fn test_min_live_watermark() {
        let mut r = roster(&["a", "b", "c"]);
        r.mark_zombie(&"a".parse().unwrap(), 1, "x");
        r.mark_zombie(&"b".parse().unwrap(), 2, "y");
        assert_eq!(r.live_count(), 1);
        assert_eq!(r.min_live_seen(), 1);
    }

    #[test]
    fn test_unknown_participant_not_demoted() {
        let mut r = roster(&["a"]);
        assert!(!r.mark_zombie(&"ghost".parse().unwrap(), 1, "x"));
        assert_eq!(r.live_count(), 1);
    }

    #[test]
    fn test_empty_roster_has_no_chair() {
        let mut r = roster(&["a"]);
        r.mark_zombie(&"a".parse().unwrap(), 1, "x");
        assert!(r.assign_empty_chair(2).is_none());
    }
}
