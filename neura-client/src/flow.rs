//! The generate flow: snapshot the session, call the backend, record the outcome.

use std::sync::{Arc, Mutex, MutexGuard};

use neura_core::{GenerationStatus, Session};

use crate::client::GenerationBackend;

/// A session shared between input handlers and the generate flow.
pub type SharedSession = Arc<Mutex<Session>>;

/// Wrap a session for sharing.
#[must_use]
pub fn shared(session: Session) -> SharedSession {
    Arc::new(Mutex::new(session))
}

fn lock(session: &SharedSession) -> MutexGuard<'_, Session> {
    session
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Drives one generate action at a time against a backend.
///
/// The session lock is never held across the network call, so drawing,
/// tool changes and clear keep working while a request is outstanding.
pub struct GenerationFlow<B> {
    backend: B,
}

impl<B: GenerationBackend> GenerationFlow<B> {
    /// Create a flow over `backend`.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The backend requests are sent to.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the generate action.
    ///
    /// Returns the final status, or `None` if nothing was sent because a
    /// request was already outstanding or the sketch could not be encoded
    /// (the latter is visible as a `Failed` status on the session).
    pub async fn generate(&self, session: &SharedSession) -> Option<GenerationStatus> {
        let pending = lock(session).begin_generation()?;
        let request = pending.into_request();

        let result = self.backend.generate(&request).await;

        let mut guard = lock(session);
        guard.finish_generation(result);
        Some(guard.status().clone())
    }
}
