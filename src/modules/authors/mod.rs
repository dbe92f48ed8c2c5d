pub mod handlers;
pub mod models;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_db::Filter;
use libris_kernel::{AppState, InitCtx, Module};

use handlers::*;
use models::Author;

pub struct AuthorsModule;

impl AuthorsModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let authors = ctx.storage.count::<Author>(Filter::All).await?;
        tracing::info!(module = self.name(), authors, "authors module initialized");
        Ok(())
    }

    fn routes(&self) -> Router<AppState> {
        Router::new()
            .route("/authors", get(author_list))
            .route("/author/create", get(author_create_get).post(author_create_post))
            .route("/author/{id}", get(author_detail))
            .route("/author/{id}/delete", get(author_delete_get).post(author_delete_post))
            .route("/author/{id}/update", get(author_update_get).post(author_update_post))
    }
}
