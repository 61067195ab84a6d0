use std::fmt;
use std::io::Read;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::detail::applicant_detail;
use super::domain::{ApplicantDetail, ApplicantRanking, EvaluationTable};
use super::ingest::{EvaluationImporter, IngestError};
use super::ranking::rank_applicants;
use super::reorder::{FinalOrder, ReorderError};

/// Identifies one user's working session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an upload reports back to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSummary {
    pub evaluations: usize,
    pub rows_read: usize,
    pub applicants: usize,
    pub warnings: Vec<String>,
    pub loaded_at: DateTime<Local>,
    pub caption: String,
}

/// Everything one session knows: the loaded export and the hand-adjusted order.
///
/// The computed ranking and per-applicant details are derived from the table on
/// each call. The final order is seeded once at load time.
#[derive(Debug, Clone)]
pub struct SessionContext {
    table: EvaluationTable,
    final_order: FinalOrder,
    loaded_at: DateTime<Local>,
}

impl SessionContext {
    pub fn load<R: Read>(reader: R) -> Result<Self, IngestError> {
        let table = EvaluationImporter::from_reader(reader)?;
        Ok(Self::from_table(table, Local::now()))
    }

    pub fn from_table(table: EvaluationTable, loaded_at: DateTime<Local>) -> Self {
        let final_order = FinalOrder::from_ranking(&rank_applicants(&table));
        Self {
            table,
            final_order,
            loaded_at,
        }
    }

    pub fn table(&self) -> &EvaluationTable {
        &self.table
    }

    pub fn loaded_at(&self) -> DateTime<Local> {
        self.loaded_at
    }

    pub fn ranking(&self) -> Vec<ApplicantRanking> {
        rank_applicants(&self.table)
    }

    pub fn detail(&self, applicant: &str) -> Option<ApplicantDetail> {
        applicant_detail(&self.table, applicant)
    }

    pub fn final_order(&self) -> &FinalOrder {
        &self.final_order
    }

    pub fn reorder(&mut self, sequence: Vec<String>) -> Result<(), ReorderError> {
        self.final_order.reorder(sequence)
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ReorderError> {
        self.final_order.move_item(from, to)
    }

    pub fn summary(&self) -> LoadSummary {
        let evaluations = self.table.records().len();
        LoadSummary {
            evaluations,
            rows_read: self.table.rows_read(),
            applicants: self.final_order.len(),
            warnings: self
                .table
                .warnings()
                .iter()
                .map(ToString::to_string)
                .collect(),
            loaded_at: self.loaded_at,
            caption: format!(
                "Updated {}  |  {} evaluations",
                self.loaded_at.format("%B %d, %Y \u{b7} %I:%M %p"),
                evaluations
            ),
        }
    }
}
