//! libris catalog application.
//!
//! Wires the catalog modules, the configured store and the tera views into
//! the HTTP server.

pub mod forms;
pub mod modules;
pub mod seed;
pub mod utils;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use libris_db::Storage;
use libris_http::views::TeraViews;
use libris_kernel::settings::{DatabaseBackend, DatabaseSettings, Settings};
use libris_kernel::{AppState, InitCtx, ModuleRegistry};

/// Registry holding every catalog module
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Open the store selected by the database settings.
pub async fn open_storage(settings: &DatabaseSettings) -> anyhow::Result<Storage> {
    match settings.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("using the in-memory store; records are lost on exit");
            Ok(Storage::memory())
        }
        #[cfg(feature = "mongo")]
        DatabaseBackend::Mongo => {
            let store = libris_db::MongoStore::connect(&settings.uri)
                .await
                .context("failed to connect to MongoDB")?;
            Ok(Storage::new(store))
        }
        #[cfg(not(feature = "mongo"))]
        DatabaseBackend::Mongo => {
            anyhow::bail!("the mongo backend needs the `mongo` feature")
        }
    }
}

/// The full HTTP application for the given state
pub fn build_app(state: AppState) -> Router {
    libris_http::build_router(&registry(), state)
}

/// Run the catalog server until shutdown
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        "libris bootstrap starting"
    );

    let storage = open_storage(&settings.database).await?;
    let views = TeraViews::new()?;
    let registry = registry();

    let ctx = InitCtx {
        settings: &settings,
        storage: &storage,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let state = AppState::new(storage, Arc::new(views), settings);
    let served = libris_http::start_server(&registry, state).await;

    registry.stop_all().await?;
    served
}
