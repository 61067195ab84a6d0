//! Resident interview ranking: loads a REDCap evaluation export, ranks
//! applicants by average total score, breaks scores down per question and keeps
//! the committee's hand-adjusted final order for export.

pub mod detail;
pub mod domain;
pub mod export;
pub mod ingest;
pub mod ranking;
pub mod reorder;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;
pub mod views;

#[cfg(test)]
mod tests;

pub use detail::applicant_detail;
pub use domain::{
    question_label, ApplicantDetail, ApplicantRanking, ColumnRole, EvaluationRecord,
    EvaluationTable, LoadWarning, QuestionStat, ResolvedColumns,
};
pub use export::{
    export_file_name, read_ranking_csv, write_final_order_csv, write_ranking_csv, CsvExport,
    ExportError, ExportKind,
};
pub use ingest::{coerce_numeric, resolve_column, ColumnMatch, EvaluationImporter, IngestError};
pub use ranking::rank_applicants;
pub use reorder::{FinalOrder, FinalRankEntry, ReorderError};
pub use repository::{SessionStore, StoreError};
pub use router::interview_router;
pub use service::{InterviewService, SessionError};
pub use session::{LoadSummary, SessionContext, SessionId};
