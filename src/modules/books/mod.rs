pub mod handlers;
pub mod models;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_db::Filter;
use libris_kernel::{AppState, InitCtx, Module};

use handlers::*;
use models::Book;

pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = ctx.storage.count::<Book>(Filter::All).await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router<AppState> {
        Router::new()
            .route("/books", get(book_list))
            .route("/book/create", get(book_create_get).post(book_create_post))
            .route("/book/{id}", get(book_detail))
            .route("/book/{id}/delete", get(book_delete_get).post(book_delete_post))
            .route("/book/{id}/update", get(book_update_get).post(book_update_post))
    }
}
