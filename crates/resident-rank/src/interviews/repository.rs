use super::session::{SessionContext, SessionId};

/// Storage abstraction for per-user session state so the service can be
/// exercised against in-memory fakes.
pub trait SessionStore: Send + Sync {
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionContext>, StoreError>;
    /// Inserts or replaces the session.
    fn store(&self, id: &SessionId, context: SessionContext) -> Result<(), StoreError>;
    /// Applies `change` to the stored session in place. Concurrent calls for
    /// the same id must not interleave, and a concurrent `store` lands either
    /// before or after the change, never in the middle. Returns `None` when
    /// no session is stored under `id`.
    fn update<T, F>(&self, id: &SessionId, change: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut SessionContext) -> T;
    /// Returns whether a session was present.
    fn remove(&self, id: &SessionId) -> Result<bool, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
