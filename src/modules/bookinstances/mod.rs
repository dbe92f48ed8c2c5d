pub mod handlers;
pub mod models;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_db::Filter;
use libris_kernel::{AppState, InitCtx, Module};

use handlers::*;
use models::BookInstance;

pub struct BookInstancesModule;

impl BookInstancesModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BookInstancesModule {
    fn name(&self) -> &'static str {
        "bookinstances"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let copies = ctx.storage.count::<BookInstance>(Filter::All).await?;
        tracing::info!(module = self.name(), copies, "bookinstances module initialized");
        Ok(())
    }

    fn routes(&self) -> Router<AppState> {
        Router::new()
            .route("/bookinstances", get(bookinstance_list))
            .route(
                "/bookinstance/create",
                get(bookinstance_create_get).post(bookinstance_create_post),
            )
            .route("/bookinstance/{id}", get(bookinstance_detail))
            .route(
                "/bookinstance/{id}/delete",
                get(bookinstance_delete_get).post(bookinstance_delete_post),
            )
            .route(
                "/bookinstance/{id}/update",
                get(bookinstance_update_get).post(bookinstance_update_post),
            )
    }
}
