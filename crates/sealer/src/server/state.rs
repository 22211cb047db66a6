//! Shared application state injected into every Axum handler.

use crate::job::JobRunner;

/// Application state shared across all request handlers.
///
/// Cheaply cloneable: the runner holds only `Arc`-backed collaborators.
#[derive(Clone)]
pub struct AppState {
    /// Executes sealing jobs.
    pub runner: JobRunner,
}

impl AppState {
    /// Create a new [`AppState`] around `runner`.
    pub fn new(runner: JobRunner) -> Self {
        Self { runner }
    }
}
