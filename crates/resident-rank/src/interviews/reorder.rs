use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::ApplicantRanking;

/// The committee's hand-adjusted list. Seeded from the computed ranking and
/// afterwards changed only through [`FinalOrder::reorder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalOrder {
    applicants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRankEntry {
    pub final_rank: usize,
    pub applicant: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error(
        "new order is not a permutation of the current list (missing: {missing:?}, unexpected: {unexpected:?})"
    )]
    NotAPermutation {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error("position {index} is outside the list of {len} applicants")]
    OutOfRange { index: usize, len: usize },
}

impl FinalOrder {
    pub fn from_ranking(ranking: &[ApplicantRanking]) -> Self {
        Self {
            applicants: ranking.iter().map(|row| row.applicant.clone()).collect(),
        }
    }

    pub fn applicants(&self) -> &[String] {
        &self.applicants
    }

    pub fn len(&self) -> usize {
        self.applicants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applicants.is_empty()
    }

    /// Replaces the order with `sequence` if it holds exactly the same names
    /// (duplicates included). On rejection the current order is untouched.
    pub fn reorder(&mut self, sequence: Vec<String>) -> Result<(), ReorderError> {
        let mut counts: BTreeMap<&str, isize> = BTreeMap::new();
        for name in &self.applicants {
            *counts.entry(name.as_str()).or_default() += 1;
        }
        for name in &sequence {
            *counts.entry(name.as_str()).or_default() -= 1;
        }

        let missing: Vec<String> = counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, _)| name.to_string())
            .collect();
        let unexpected: Vec<String> = counts
            .iter()
            .filter(|(_, count)| **count < 0)
            .map(|(name, _)| name.to_string())
            .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            warn!(?missing, ?unexpected, "rejected final order update");
            return Err(ReorderError::NotAPermutation {
                missing,
                unexpected,
            });
        }

        debug!(applicants = sequence.len(), "final order updated");
        self.applicants = sequence;
        Ok(())
    }

    /// Moves the entry at `from` so that it ends up at `to`, the way a single
    /// drag in the list does.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ReorderError> {
        let len = self.applicants.len();
        for index in [from, to] {
            if index >= len {
                return Err(ReorderError::OutOfRange { index, len });
            }
        }

        let mut sequence = self.applicants.clone();
        let moved = sequence.remove(from);
        sequence.insert(to, moved);
        self.reorder(sequence)
    }

    pub fn numbered(&self) -> Vec<FinalRankEntry> {
        self.applicants
            .iter()
            .enumerate()
            .map(|(index, applicant)| FinalRankEntry {
                final_rank: index + 1,
                applicant: applicant.clone(),
            })
            .collect()
    }
}
