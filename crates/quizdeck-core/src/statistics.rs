//! Score statistics.
//!
//! Per-round tallies matter mostly for all-rounds sessions, where one session
//! mixes questions from many exam rounds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grading::ItemOutcome;
use crate::model::Round;

/// Correct / total counts for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTally {
    pub round: Round,
    pub total: usize,
    pub correct: usize,
}

impl RoundTally {
    pub fn accuracy(&self) -> f64 {
        accuracy(self.correct, self.total)
    }
}

/// Fraction of correct answers; 0.0 for an empty session.
pub fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// Tally outcomes per round, in catalog round order.
pub fn tally_by_round(outcomes: &[ItemOutcome]) -> Vec<RoundTally> {
    let mut tallies: HashMap<&Round, RoundTally> = HashMap::new();
    for outcome in outcomes {
        let round = &outcome.item.round;
        let tally = tallies.entry(round).or_insert_with(|| RoundTally {
            round: round.clone(),
            total: 0,
            correct: 0,
        });
        tally.total += 1;
        if outcome.correct {
            tally.correct += 1;
        }
    }

    let mut tallies: Vec<RoundTally> = tallies.into_values().collect();
    tallies.sort_by(|a, b| {
        a.round
            .order(&b.round)
            .then_with(|| a.round.as_str().cmp(b.round.as_str()))
    });
    tallies
}
