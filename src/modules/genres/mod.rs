pub mod handlers;
pub mod models;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_db::Filter;
use libris_kernel::{AppState, InitCtx, Module};

use handlers::*;
use models::Genre;

pub struct GenresModule;

impl GenresModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for GenresModule {
    fn name(&self) -> &'static str {
        "genres"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let genres = ctx.storage.count::<Genre>(Filter::All).await?;
        tracing::info!(module = self.name(), genres, "genres module initialized");
        Ok(())
    }

    fn routes(&self) -> Router<AppState> {
        Router::new()
            .route("/genres", get(genre_list))
            .route("/genre/create", get(genre_create_get).post(genre_create_post))
            .route("/genre/{id}", get(genre_detail))
            .route("/genre/{id}/delete", get(genre_delete_get).post(genre_delete_post))
            .route("/genre/{id}/update", get(genre_update_get).post(genre_update_post))
    }
}
