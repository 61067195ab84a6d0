use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::ApplicantRanking;
use super::reorder::FinalRankEntry;

/// Which of the two downloads is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Ranking,
    FinalOrder,
}

/// A rendered CSV download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV export: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV export is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct RankingRow {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Applicant")]
    applicant: String,
    #[serde(rename = "Average Score")]
    average_score: Option<f64>,
    #[serde(rename = "# Evaluations")]
    evaluations: usize,
}

#[derive(Debug, Serialize)]
struct FinalOrderRow<'a> {
    #[serde(rename = "Final Rank")]
    final_rank: usize,
    #[serde(rename = "Applicant")]
    applicant: &'a str,
}

/// `Rank,Applicant,Average Score,# Evaluations`; a missing average is an empty cell.
pub fn write_ranking_csv(rankings: &[ApplicantRanking]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rankings {
        writer.serialize(RankingRow {
            rank: row.rank,
            applicant: row.applicant.clone(),
            average_score: row.average_score,
            evaluations: row.evaluations,
        })?;
    }
    if rankings.is_empty() {
        writer.write_record(["Rank", "Applicant", "Average Score", "# Evaluations"])?;
    }
    finish(writer)
}

/// `Final Rank,Applicant`.
pub fn write_final_order_csv(entries: &[FinalRankEntry]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        writer.serialize(FinalOrderRow {
            final_rank: entry.final_rank,
            applicant: &entry.applicant,
        })?;
    }
    if entries.is_empty() {
        writer.write_record(["Final Rank", "Applicant"])?;
    }
    finish(writer)
}

/// Reads a scored ranking back from its export form.
pub fn read_ranking_csv<R: Read>(reader: R) -> Result<Vec<ApplicantRanking>, ExportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rankings = Vec::new();
    for row in csv_reader.deserialize::<RankingRow>() {
        let row = row?;
        rankings.push(ApplicantRanking {
            rank: row.rank,
            applicant: row.applicant,
            average_score: row.average_score,
            evaluations: row.evaluations,
        });
    }
    Ok(rankings)
}

pub fn export_file_name(prefix: &str, kind: ExportKind, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    match kind {
        ExportKind::Ranking => format!("{prefix}_{date}.csv"),
        ExportKind::FinalOrder => format!("{prefix}_Final_{date}.csv"),
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
