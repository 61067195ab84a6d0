use serde::{Deserialize, Serialize};

use super::domain::{ApplicantDetail, ApplicantRanking};
use super::reorder::FinalRankEntry;
use super::session::LoadSummary;

/// Ranked table as shown after an upload.
#[derive(Debug, Clone, Serialize)]
pub struct RankingView {
    pub summary: LoadSummary,
    pub applicants: Vec<RankingRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingRowView {
    pub rank: usize,
    pub applicant: String,
    pub average_score: Option<f64>,
    /// One decimal, or "no data".
    pub average_label: String,
    pub evaluations: usize,
}

impl From<ApplicantRanking> for RankingRowView {
    fn from(row: ApplicantRanking) -> Self {
        Self {
            average_label: row.average_label(),
            rank: row.rank,
            applicant: row.applicant,
            average_score: row.average_score,
            evaluations: row.evaluations,
        }
    }
}

impl RankingView {
    pub fn new(summary: LoadSummary, ranking: Vec<ApplicantRanking>) -> Self {
        Self {
            summary,
            applicants: ranking.into_iter().map(RankingRowView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub applicant: String,
    pub evaluations: usize,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub question: String,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// `mean  (min–max)`
    pub display: String,
}

impl From<ApplicantDetail> for DetailView {
    fn from(detail: ApplicantDetail) -> Self {
        let questions = detail
            .questions
            .into_iter()
            .map(|stat| QuestionView {
                display: stat.display(),
                question: stat.label,
                mean: stat.mean,
                min: stat.min,
                max: stat.max,
            })
            .collect();

        Self {
            applicant: detail.applicant,
            evaluations: detail.evaluations,
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalOrderView {
    pub entries: Vec<FinalRankEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MoveRequest {
    pub from: usize,
    pub to: usize,
}
