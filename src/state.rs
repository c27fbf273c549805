//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! is immutable after startup: the backend client, the compiled page
//! templates, and the parsed config. Nothing is cached between requests;
//! the backend owns all data.

use std::sync::Arc;

use crate::baas::Backend;
use crate::config::AppConfig;
use crate::pages::Views;
use crate::services::issues::IssueStore;

/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub views: Arc<Views>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, views: Arc<Views>, config: Arc<AppConfig>) -> Self {
        Self { backend, views, config }
    }

    /// Issue operations against the configured table.
    #[must_use]
    pub fn issues(&self) -> IssueStore<'_> {
        IssueStore::new(self.backend.as_ref(), &self.config.issues_table)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
