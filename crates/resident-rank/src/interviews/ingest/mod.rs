//! Turns a raw REDCap interview export into an [`EvaluationTable`].

mod columns;
mod normalizer;
mod parser;

pub use columns::{resolve_column, ColumnMatch};
pub use normalizer::coerce_numeric;

use std::io::Read;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::interviews::domain::{
    ColumnRole, EvaluationRecord, EvaluationTable, LoadWarning, ResolvedColumns,
    CANONICAL_APPLICANT_COLUMN,
};
use normalizer::CompletionRule;
use parser::RawTable;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read evaluation export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid evaluation CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required {} column: expected {}", .role.label(), .role.rule())]
    MissingColumn { role: ColumnRole },
}

pub struct EvaluationImporter;

impl EvaluationImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<EvaluationTable, IngestError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<EvaluationTable, IngestError> {
        let raw = parser::parse_table(reader)?;
        normalize(raw)
    }
}

fn normalize(raw: RawTable) -> Result<EvaluationTable, IngestError> {
    let mut warnings = Vec::new();

    let total_score = required_column(&raw.headers, ColumnRole::TotalScore, &mut warnings)?;
    let applicant = required_column(&raw.headers, ColumnRole::Applicant, &mut warnings)?;
    let completion = match resolve_column(&raw.headers, ColumnRole::Completion) {
        ColumnMatch::NotFound => {
            warn!("no completion column found; keeping every row");
            warnings.push(LoadWarning::MissingCompletionColumn);
            None
        }
        found => {
            note_ambiguity(ColumnRole::Completion, &found, &mut warnings);
            found.column().map(str::to_string)
        }
    };

    let score_idx = header_index(&raw.headers, &total_score);
    let applicant_idx = header_index(&raw.headers, &applicant);
    let completion_idx = completion
        .as_deref()
        .map(|name| header_index(&raw.headers, name));
    let completion_rule = completion_idx.map(|idx| CompletionRule::detect(raw.column(idx)));
    debug!(?completion_rule, "completion column interpreted");

    let question_idx: Vec<usize> = raw
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, header)| {
            *idx != score_idx
                && *idx != applicant_idx
                && Some(*idx) != completion_idx
                && !columns::is_metadata_column(header)
        })
        .map(|(idx, _)| idx)
        .collect();
    let question_columns = question_idx
        .iter()
        .map(|&idx| raw.headers[idx].clone())
        .collect();

    let rows_read = raw.rows.len();
    let records: Vec<EvaluationRecord> = raw
        .rows
        .iter()
        .filter(|row| match (completion_idx, completion_rule) {
            (Some(idx), Some(rule)) => rule.is_complete(&row[idx]),
            _ => true,
        })
        .map(|row| EvaluationRecord {
            applicant: row[applicant_idx].clone(),
            completion: completion_idx.map(|idx| row[idx].clone()),
            total_score: coerce_numeric(&row[score_idx]),
            question_scores: question_idx
                .iter()
                .map(|&idx| coerce_numeric(&row[idx]))
                .collect(),
        })
        .collect();

    let mut headers = raw.headers;
    headers[applicant_idx] = CANONICAL_APPLICANT_COLUMN.to_string();

    info!(
        rows_read,
        evaluations = records.len(),
        score_column = %total_score,
        applicant_column = %applicant,
        "evaluation export normalized"
    );

    Ok(EvaluationTable {
        headers,
        columns: ResolvedColumns {
            applicant,
            total_score,
            completion,
        },
        question_columns,
        records,
        rows_read,
        warnings,
    })
}

fn required_column(
    headers: &[String],
    role: ColumnRole,
    warnings: &mut Vec<LoadWarning>,
) -> Result<String, IngestError> {
    let found = resolve_column(headers, role);
    note_ambiguity(role, &found, warnings);
    found
        .column()
        .map(str::to_string)
        .ok_or(IngestError::MissingColumn { role })
}

fn note_ambiguity(role: ColumnRole, found: &ColumnMatch, warnings: &mut Vec<LoadWarning>) {
    if let ColumnMatch::Ambiguous { chosen, candidates } = found {
        warn!(role = role.label(), %chosen, ?candidates, "ambiguous column match");
        warnings.push(LoadWarning::AmbiguousColumn {
            role,
            chosen: chosen.clone(),
            candidates: candidates.clone(),
        });
    }
}

// Resolved names always come from `headers`, so the first position is the match.
fn header_index(headers: &[String], name: &str) -> usize {
    headers
        .iter()
        .position(|header| header == name)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(csv: &str) -> EvaluationTable {
        EvaluationImporter::from_reader(Cursor::new(csv.to_string())).expect("import succeeds")
    }

    #[test]
    fn filters_labelled_completion_and_coerces_scores() {
        let table = load(
            "Applicant Name,Total score,Complete?\n\
Alice,90,Complete\n\
Alice,n/a,Complete\n\
Bob,70,Incomplete\n",
        );

        assert_eq!(table.rows_read(), 3);
        assert_eq!(table.records().len(), 2);
        assert_eq!(table.records()[0].total_score, Some(90.0));
        assert_eq!(table.records()[1].total_score, None);
        assert!(table.warnings().is_empty());
        assert_eq!(table.columns().completion.as_deref(), Some("Complete?"));
    }

    #[test]
    fn numeric_completion_codes_keep_only_twos() {
        let table = load(
            "applicant,total_score_raw,interview_complete\n\
Alice,90,2\n\
Bob,70,1\n\
Cara,60,0\n",
        );
        let applicants: Vec<&str> = table
            .records()
            .iter()
            .map(|record| record.applicant.as_str())
            .collect();
        assert_eq!(applicants, vec!["Alice"]);
        assert_eq!(table.headers()[0], CANONICAL_APPLICANT_COLUMN);
        assert_eq!(table.columns().applicant, "applicant");
    }

    #[test]
    fn missing_completion_column_warns_and_keeps_rows() {
        let table = load("Applicant,Total Score\nAlice,90\nBob,70\n");
        assert_eq!(table.records().len(), 2);
        assert_eq!(table.warnings(), &[LoadWarning::MissingCompletionColumn]);
        assert!(table.columns().completion.is_none());
    }

    #[test]
    fn missing_total_score_is_fatal() {
        let error = EvaluationImporter::from_reader(Cursor::new("Applicant,Score\nAlice,90\n"))
            .expect_err("score column required");
        match error {
            IngestError::MissingColumn { role } => assert_eq!(role, ColumnRole::TotalScore),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn missing_applicant_is_fatal() {
        let error = EvaluationImporter::from_reader(Cursor::new("Name,Total Score\nAlice,90\n"))
            .expect_err("applicant column required");
        assert!(matches!(
            error,
            IngestError::MissingColumn {
                role: ColumnRole::Applicant
            }
        ));
        assert!(error.to_string().contains("applicant"));
    }

    #[test]
    fn zero_completed_rows_is_not_an_error() {
        let table = load("Applicant,Total Score,Complete?\nAlice,90,Incomplete\n");
        assert!(table.records().is_empty());
        assert_eq!(table.rows_read(), 1);
    }

    #[test]
    fn question_columns_exclude_metadata_and_resolved_columns() {
        let table = load(
            "Record ID,Survey Timestamp,Applicant Name,Communication?,Comments,Total score,Complete?\n\
1,2025-11-03 09:00,Alice,5,Great,23,Complete\n",
        );
        assert_eq!(table.question_columns(), &["Communication?", "Comments"]);
        assert_eq!(table.records()[0].question_scores, vec![Some(5.0), None]);
    }

    #[test]
    fn applicant_column_resolution_reports_ambiguity() {
        let table = load(
            "Applicant Name,How well did the applicant respond?,Total score\nAlice,4,20\n",
        );
        assert_eq!(table.columns().applicant, CANONICAL_APPLICANT_COLUMN);
        assert!(table.warnings().iter().any(|warning| matches!(
            warning,
            LoadWarning::AmbiguousColumn {
                role: ColumnRole::Applicant,
                ..
            }
        )));
        assert_eq!(
            table.question_columns(),
            &["How well did the applicant respond?"]
        );
    }

    #[test]
    fn path_errors_surface_as_io() {
        let error = EvaluationImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");
        match error {
            IngestError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
