use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use resident_rank::interviews::{SessionContext, SessionId, SessionStore, StoreError};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session state. Nothing survives a restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, SessionContext>>>,
}

impl SessionStore for InMemorySessionStore {
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionContext>, StoreError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn store(&self, id: &SessionId, context: SessionContext) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(id.clone(), context);
        Ok(())
    }

    fn update<T, F>(&self, id: &SessionId, change: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut SessionContext) -> T,
    {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get_mut(id).map(change))
    }

    fn remove(&self, id: &SessionId) -> Result<bool, StoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
