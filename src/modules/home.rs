use async_trait::async_trait;
use axum::extract::State;
use axum::response::Response;
use axum::{routing::get, Router};
use libris_db::Filter;
use libris_http::error::AppResult;
use libris_http::response::render;
use libris_kernel::{AppState, Module};
use serde_json::json;

use super::authors::models::Author;
use super::bookinstances::models::{BookInstance, Status};
use super::books::models::Book;
use super::genres::models::Genre;

/// Catalog landing page with record counts.
pub struct HomeModule;

impl HomeModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for HomeModule {
    fn name(&self) -> &'static str {
        "home"
    }

    fn routes(&self) -> Router<AppState> {
        Router::new().route("/", get(index))
    }
}

pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    let storage = &state.storage;
    let (books, copies, available, authors, genres) = tokio::try_join!(
        storage.count::<Book>(Filter::All),
        storage.count::<BookInstance>(Filter::All),
        storage.count::<BookInstance>(Filter::eq("status", Status::Available.to_string())),
        storage.count::<Author>(Filter::All),
        storage.count::<Genre>(Filter::All),
    )?;

    render(
        &state,
        "index",
        json!({
            "title": "Local Library Home",
            "book_count": books,
            "book_instance_count": copies,
            "book_instance_available_count": available,
            "author_count": authors,
            "genre_count": genres,
        }),
    )
}
