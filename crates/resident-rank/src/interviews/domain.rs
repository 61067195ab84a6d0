use std::fmt;

use serde::{Deserialize, Serialize};

/// Name the applicant column is exposed under, whatever the export called it.
pub const CANONICAL_APPLICANT_COLUMN: &str = "Applicant Name";

/// Name the coerced total score is exposed under.
pub const CANONICAL_SCORE_COLUMN: &str = "total_score";

/// The three columns the pipeline has to find by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Completion,
    TotalScore,
    Applicant,
}

impl ColumnRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completion => "completion status",
            Self::TotalScore => "total score",
            Self::Applicant => "applicant",
        }
    }

    pub const fn rule(self) -> &'static str {
        match self {
            Self::Completion => "a header containing \"complete\"",
            Self::TotalScore => "a header containing both \"total\" and \"score\"",
            Self::Applicant => "a header containing \"applicant\"",
        }
    }
}

/// Header names the ingestion step settled on for each role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumns {
    pub applicant: String,
    pub total_score: String,
    pub completion: Option<String>,
}

/// Non-fatal conditions noticed while loading an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    MissingCompletionColumn,
    AmbiguousColumn {
        role: ColumnRole,
        chosen: String,
        candidates: Vec<String>,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::MissingCompletionColumn => write!(
                f,
                "no completion status column found; all rows were kept unfiltered"
            ),
            LoadWarning::AmbiguousColumn {
                role,
                chosen,
                candidates,
            } => write!(
                f,
                "{} headers matched the {} column; using '{}'",
                candidates.len(),
                role.label(),
                chosen
            ),
        }
    }
}

/// One completed evaluation after normalization. Question scores line up with
/// [`EvaluationTable::question_columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    pub applicant: String,
    pub completion: Option<String>,
    pub total_score: Option<f64>,
    pub question_scores: Vec<Option<f64>>,
}

/// Normalized export: completed rows only, with the canonical columns resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationTable {
    pub(crate) headers: Vec<String>,
    pub(crate) columns: ResolvedColumns,
    pub(crate) question_columns: Vec<String>,
    pub(crate) records: Vec<EvaluationRecord>,
    pub(crate) rows_read: usize,
    pub(crate) warnings: Vec<LoadWarning>,
}

impl EvaluationTable {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &ResolvedColumns {
        &self.columns
    }

    /// Columns that may hold per-question scores. Whether one actually does is
    /// decided per applicant.
    pub fn question_columns(&self) -> &[String] {
        &self.question_columns
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    /// Rows in the export before the completion filter.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn records_for<'a>(
        &'a self,
        applicant: &'a str,
    ) -> impl Iterator<Item = &'a EvaluationRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| record.applicant == applicant)
    }
}

/// One line of the computed rank list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRanking {
    pub rank: usize,
    pub applicant: String,
    pub average_score: Option<f64>,
    pub evaluations: usize,
}

impl ApplicantRanking {
    pub fn average_label(&self) -> String {
        match self.average_score {
            Some(average) => format!("{average:.1}"),
            None => NO_DATA.to_string(),
        }
    }
}

/// Rendered in place of a statistic that has no values behind it.
pub const NO_DATA: &str = "no data";

/// Rendered in place of a min/max range that has no values behind it.
pub const NO_RANGE: &str = "(\u{2014})";

/// Mean, min and max of one question for one applicant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStat {
    pub column: String,
    pub label: String,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl QuestionStat {
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        let (mean, min, max) = if values.is_empty() {
            (None, None, None)
        } else {
            let sum: f64 = values.iter().sum();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (
                Some(round1(sum / values.len() as f64)),
                Some(round1(min)),
                Some(round1(max)),
            )
        };

        Self {
            column: column.to_string(),
            label: question_label(column),
            mean,
            min,
            max,
        }
    }

    /// `"4.5  (4–5)"`, `"4.5  (—)"` without a range, `"no data"` without a mean.
    pub fn display(&self) -> String {
        match (self.mean, self.min, self.max) {
            (None, _, _) => NO_DATA.to_string(),
            (Some(mean), Some(min), Some(max)) => format!(
                "{mean:.1}  ({}\u{2013}{})",
                min.trunc() as i64,
                max.trunc() as i64
            ),
            (Some(mean), _, _) => format!("{mean:.1}  {NO_RANGE}"),
        }
    }
}

/// Per-question breakdown for the selected applicant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantDetail {
    pub applicant: String,
    pub evaluations: usize,
    pub questions: Vec<QuestionStat>,
}

/// Display label for a question header: everything before the first `?`,
/// followed by a `?`. Exports already in circulation use this exact form.
pub fn question_label(header: &str) -> String {
    let stem = header.split('?').next().unwrap_or(header);
    format!("{stem}?")
}

/// Rounds to one decimal, halves away from zero. Rankings exported by the
/// earlier pandas tool rounded halves to even, so an exact `.x5` average
/// (84.25) reads 84.3 here where those files show 84.2.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
