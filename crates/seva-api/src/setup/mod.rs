//! Application setup and initialization
//!
//! All application initialization logic lives here rather than in main.rs.

pub mod database;
pub mod routes;
pub mod server;

use crate::auth::jwt::JwtService;
use crate::state::{AppState, DbState, DocumentConfig};
use anyhow::{Context, Result};
use seva_core::{Config, SchemeCatalog};
use seva_db::{ApplicationRepository, DocumentRepository, UserRepository};
use seva_services::{AssistantService, DocumentVerifierService};
use seva_storage::LocalStorage;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry();

    // Fail fast on misconfiguration
    config
        .validate()
        .map_err(|e| anyhow::anyhow!(e.to_string()))
        .context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    // Database
    let pool = database::setup_database(&config).await?;

    // Scheme catalog: embedded default, or an operator-provided file
    let catalog = match &config.scheme_catalog_path {
        Some(path) => SchemeCatalog::from_path(path),
        None => SchemeCatalog::load_default(),
    }
    .map_err(|e| anyhow::anyhow!(e.to_string()))
    .context("Failed to load scheme catalog")?;
    tracing::info!(schemes = catalog.len(), "Scheme catalog loaded");

    // Document file storage
    let storage = LocalStorage::new(&config.storage_path, config.storage_base_url.clone())
        .await
        .context("Failed to initialize document storage")?;

    // External collaborators
    let verifier =
        DocumentVerifierService::new(config.verifier_url.clone(), config.verifier_timeout_seconds)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let assistant = match &config.assistant_url {
        Some(url) => Some(
            AssistantService::new(
                url.clone(),
                config.assistant_api_key.clone(),
                config.assistant_timeout_seconds,
            )
            .map_err(|e| anyhow::anyhow!(e.to_string()))?,
        ),
        None => {
            tracing::info!("No assistant backend configured; /api/assistant routes are disabled");
            None
        }
    };

    let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiry_hours);

    let state = Arc::new(AppState {
        db: DbState {
            users: UserRepository::new(pool.clone()),
            documents: DocumentRepository::new(pool.clone()),
            applications: ApplicationRepository::new(pool),
        },
        documents: DocumentConfig {
            storage: Arc::new(storage),
            max_file_size: config.max_document_size_bytes,
            verifier,
        },
        catalog: Arc::new(catalog),
        assistant,
        jwt,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
