use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::config::ExportConfig;
use crate::interviews::repository::{SessionStore, StoreError};
use crate::interviews::session::{SessionContext, SessionId};
use crate::interviews::{interview_router, InterviewService};

pub(super) const EXPORT: &str = "Record ID,Applicant Name,Interviewer,Communication? (1-5),Professionalism? (1-5),Comments,Total score,Complete?\n\
1,Alice Park,Dr. Ng,4,5,Strong,90,Complete\n\
2,Alice Park,Dr. Ito,5,4,,80,Complete\n\
3,Bob Stone,Dr. Ng,3,3,Quiet,70,Complete\n\
4,Cara West,Dr. Ray,5,5,,95,Incomplete\n\
5,Dev Shah,Dr. Ito,,,No show,,Complete\n";

pub(super) fn session_id() -> SessionId {
    SessionId("committee-a".to_string())
}

pub(super) fn build_service() -> (InterviewService<MemorySessions>, Arc<MemorySessions>) {
    let store = Arc::new(MemorySessions::default());
    let service = InterviewService::new(store.clone(), ExportConfig::default());
    (service, store)
}

pub(super) fn loaded_service() -> (InterviewService<MemorySessions>, Arc<MemorySessions>) {
    let (service, store) = build_service();
    service
        .upload(&session_id(), Cursor::new(EXPORT))
        .expect("fixture export loads");
    (service, store)
}

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, SessionContext>>>,
}

impl SessionStore for MemorySessions {
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

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionContext>, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn store(&self, _id: &SessionId, _context: SessionContext) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn update<T, F>(&self, _id: &SessionId, _change: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut SessionContext) -> T,
    {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }
}

/// Memory store that stalls every read and write and counts fetches.
#[derive(Default)]
pub(super) struct SlowSessions {
    pub(super) inner: MemorySessions,
    pub(super) fetches: AtomicUsize,
}

impl SlowSessions {
    const DELAY: Duration = Duration::from_millis(50);
}

impl SessionStore for SlowSessions {
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionContext>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Self::DELAY);
        self.inner.fetch(id)
    }

    fn store(&self, id: &SessionId, context: SessionContext) -> Result<(), StoreError> {
        thread::sleep(Self::DELAY);
        self.inner.store(id, context)
    }

    fn update<T, F>(&self, id: &SessionId, change: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut SessionContext) -> T,
    {
        self.inner.update(id, |context| {
            thread::sleep(Self::DELAY);
            change(context)
        })
    }

    fn remove(&self, id: &SessionId) -> Result<bool, StoreError> {
        self.inner.remove(id)
    }
}

pub(super) fn router_with_service(service: InterviewService<MemorySessions>) -> axum::Router {
    interview_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
