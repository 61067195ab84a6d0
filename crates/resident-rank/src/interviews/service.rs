use std::io::Read;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::domain::{ApplicantDetail, ApplicantRanking};
use super::export::{
    export_file_name, write_final_order_csv, write_ranking_csv, CsvExport, ExportError,
    ExportKind,
};
use super::ingest::IngestError;
use super::reorder::{FinalRankEntry, ReorderError};
use super::repository::{SessionStore, StoreError};
use super::session::{LoadSummary, SessionContext, SessionId};
use crate::config::ExportConfig;

/// Runs every user interaction against the session held in the store.
pub struct InterviewService<S> {
    store: Arc<S>,
    export: ExportConfig,
}

impl<S> InterviewService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, export: ExportConfig) -> Self {
        Self { store, export }
    }

    /// Loads an export into the session, replacing whatever was there. A
    /// failed load leaves the previous session as it was.
    pub fn upload<R: Read>(&self, id: &SessionId, reader: R) -> Result<LoadSummary, SessionError> {
        let context = SessionContext::load(reader)?;
        let summary = context.summary();
        self.store.store(id, context)?;
        info!(
            session = %id,
            evaluations = summary.evaluations,
            applicants = summary.applicants,
            "evaluation export loaded"
        );
        Ok(summary)
    }

    /// Load summary and ranking rows, both taken from the same load.
    pub fn overview(
        &self,
        id: &SessionId,
    ) -> Result<(LoadSummary, Vec<ApplicantRanking>), SessionError> {
        let context = self.context(id)?;
        Ok((context.summary(), context.ranking()))
    }

    pub fn ranking(&self, id: &SessionId) -> Result<Vec<ApplicantRanking>, SessionError> {
        Ok(self.context(id)?.ranking())
    }

    pub fn detail(&self, id: &SessionId, applicant: &str) -> Result<ApplicantDetail, SessionError> {
        self.context(id)?
            .detail(applicant)
            .ok_or_else(|| SessionError::UnknownApplicant {
                applicant: applicant.to_string(),
            })
    }

    pub fn final_order(&self, id: &SessionId) -> Result<Vec<FinalRankEntry>, SessionError> {
        Ok(self.context(id)?.final_order().numbered())
    }

    pub fn reorder(
        &self,
        id: &SessionId,
        sequence: Vec<String>,
    ) -> Result<Vec<FinalRankEntry>, SessionError> {
        self.commit(id, |context| context.reorder(sequence))
    }

    pub fn move_item(
        &self,
        id: &SessionId,
        from: usize,
        to: usize,
    ) -> Result<Vec<FinalRankEntry>, SessionError> {
        self.commit(id, |context| context.move_item(from, to))
    }

    pub fn export_ranking(&self, id: &SessionId, on: NaiveDate) -> Result<CsvExport, SessionError> {
        let ranking = self.context(id)?.ranking();
        Ok(CsvExport {
            file_name: export_file_name(self.export.file_prefix(), ExportKind::Ranking, on),
            body: write_ranking_csv(&ranking)?,
        })
    }

    pub fn export_final_order(
        &self,
        id: &SessionId,
        on: NaiveDate,
    ) -> Result<CsvExport, SessionError> {
        let entries = self.context(id)?.final_order().numbered();
        Ok(CsvExport {
            file_name: export_file_name(self.export.file_prefix(), ExportKind::FinalOrder, on),
            body: write_final_order_csv(&entries)?,
        })
    }

    /// Drops the session; afterwards every read reports "no data loaded".
    pub fn reset(&self, id: &SessionId) -> Result<bool, SessionError> {
        let removed = self.store.remove(id)?;
        info!(session = %id, removed, "session reset");
        Ok(removed)
    }

    fn context(&self, id: &SessionId) -> Result<SessionContext, SessionError> {
        self.store
            .fetch(id)?
            .ok_or_else(|| SessionError::NotLoaded(id.clone()))
    }

    fn commit<F>(&self, id: &SessionId, change: F) -> Result<Vec<FinalRankEntry>, SessionError>
    where
        F: FnOnce(&mut SessionContext) -> Result<(), ReorderError>,
    {
        let outcome = self.store.update(id, |context| match change(context) {
            Ok(()) => Ok(context.final_order().numbered()),
            Err(source) => Err(SessionError::Reorder {
                source,
                current: context.final_order().numbered(),
            }),
        })?;
        outcome.unwrap_or_else(|| Err(SessionError::NotLoaded(id.clone())))
    }
}

/// Error raised by the interview service.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("no data loaded")]
    NotLoaded(SessionId),
    #[error("no completed evaluations for applicant '{applicant}'")]
    UnknownApplicant { applicant: String },
    #[error("{source}")]
    Reorder {
        source: ReorderError,
        current: Vec<FinalRankEntry>,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
