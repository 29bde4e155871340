//! Application state and sub-state extractors.
//!
//! AppState is split into domain sub-states so handlers can extract only
//! what they need via Axum's `FromRef`.

use seva_core::SchemeCatalog;
use seva_db::{ApplicationRepository, DocumentRepository, UserRepository};
use seva_services::{AssistantService, DocumentVerifierService};
use seva_storage::Storage;
use std::sync::Arc;

use crate::auth::jwt::JwtService;

/// Repositories over the shared connection pool.
#[derive(Clone)]
pub struct DbState {
    pub users: UserRepository,
    pub documents: DocumentRepository,
    pub applications: ApplicationRepository,
}

/// Upload limits, file storage, and the verification dispatcher.
#[derive(Clone)]
pub struct DocumentConfig {
    pub storage: Arc<dyn Storage>,
    pub max_file_size: usize,
    pub verifier: DocumentVerifierService,
}

/// Main application state: aggregates sub-states for dependency injection.
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub documents: DocumentConfig,
    /// Read-only scheme catalog, loaded once at startup.
    pub catalog: Arc<SchemeCatalog>,
    /// Absent when no assistant backend is configured.
    pub assistant: Option<AssistantService>,
    pub jwt: JwtService,
}

impl axum::extract::FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for DocumentConfig {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.documents.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
