use crate::interviews::domain::{ColumnRole, CANONICAL_SCORE_COLUMN};

/// REDCap bookkeeping columns that never hold question scores.
const METADATA_COLUMNS: &[&str] = &[
    "record id",
    "record_id",
    "repeat instrument",
    "repeat instance",
    "redcap_repeat_instrument",
    "redcap_repeat_instance",
    "survey timestamp",
    "timestamp",
    CANONICAL_SCORE_COLUMN,
];

/// Outcome of looking a column up by name fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnMatch {
    Resolved(String),
    /// Several headers matched. `chosen` is the first one in header order.
    Ambiguous {
        chosen: String,
        candidates: Vec<String>,
    },
    NotFound,
}

impl ColumnMatch {
    pub fn column(&self) -> Option<&str> {
        match self {
            ColumnMatch::Resolved(name) => Some(name),
            ColumnMatch::Ambiguous { chosen, .. } => Some(chosen),
            ColumnMatch::NotFound => None,
        }
    }
}

/// Finds the header for `role` by case-insensitive substring match.
pub fn resolve_column(headers: &[String], role: ColumnRole) -> ColumnMatch {
    let mut candidates: Vec<String> = headers
        .iter()
        .filter(|header| matches_role(header, role))
        .cloned()
        .collect();

    match candidates.len() {
        0 => ColumnMatch::NotFound,
        1 => ColumnMatch::Resolved(candidates.remove(0)),
        _ => ColumnMatch::Ambiguous {
            chosen: candidates[0].clone(),
            candidates,
        },
    }
}

pub(crate) fn matches_role(header: &str, role: ColumnRole) -> bool {
    let lowered = header.to_lowercase();
    match role {
        ColumnRole::Completion => lowered.contains("complete"),
        ColumnRole::TotalScore => lowered.contains("total") && lowered.contains("score"),
        ColumnRole::Applicant => lowered.contains("applicant"),
    }
}

pub(crate) fn is_metadata_column(header: &str) -> bool {
    let lowered = header.trim().to_lowercase();
    METADATA_COLUMNS.contains(&lowered.as_str())
}

#[cfg(test)]
pub(crate) fn headers_for_tests(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
