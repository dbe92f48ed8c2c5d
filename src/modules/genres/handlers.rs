use axum::extract::{Path, State};
use axum::response::Response;
use libris_db::{Filter, Id, Order, Query};
use libris_http::error::{AppError, AppResult};
use libris_http::response::{redirect, render};
use libris_kernel::AppState;
use serde_json::{json, Value};

use super::models::Genre;
use crate::forms::{FieldError, FormData};
use crate::modules::books::models::Book;

const LIST_URL: &str = "/catalog/genres";

pub async fn genre_list(State(state): State<AppState>) -> AppResult<Response> {
    let genres: Vec<Genre> = state
        .storage
        .find(Query::all().sort_by("name", Order::Descending))
        .await?;

    render(
        &state,
        "genre_list",
        json!({
            "title": "Genre List",
            "genre_list": genres.iter().map(Genre::present).collect::<Vec<_>>(),
        }),
    )
}

pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<Id<Genre>>,
) -> AppResult<Response> {
    let (genre, books) = tokio::try_join!(
        state.storage.get(&id),
        state.storage.find::<Book>(Filter::eq("genre", id.as_str())),
    )?;
    let genre = genre.ok_or_else(|| AppError::not_found("Genre not found"))?;

    render(
        &state,
        "genre_detail",
        json!({
            "title": "Genre Detail",
            "genre": genre.present(),
            "genre_books": books.iter().map(Book::present).collect::<Vec<_>>(),
        }),
    )
}

pub async fn genre_create_get(State(state): State<AppState>) -> AppResult<Response> {
    render_form(&state, "Create Genre", Value::Null, &[])
}

pub async fn genre_create_post(
    State(state): State<AppState>,
    form: FormData,
) -> AppResult<Response> {
    let validated = Genre::schema().validate(&form);
    let mut genre = Genre::from_form(validated.values());

    if !validated.is_valid() {
        return render_form(&state, "Create Genre", genre.present(), validated.errors());
    }

    if let Some(existing) = state
        .storage
        .find_one::<Genre>(Filter::eq("name", genre.name.as_str()))
        .await?
    {
        tracing::debug!(genre = %existing.id, "genre already exists");
        return Ok(redirect(&existing.url()));
    }

    state.storage.insert(&mut genre).await?;
    tracing::info!(genre = %genre.id, "genre created");
    Ok(redirect(&genre.url()))
}

pub async fn genre_delete_get(
    State(state): State<AppState>,
    Path(id): Path<Id<Genre>>,
) -> AppResult<Response> {
    let (genre, books) = tokio::try_join!(
        state.storage.get(&id),
        state.storage.find::<Book>(Filter::eq("genre", id.as_str())),
    )?;
    let Some(genre) = genre else {
        return Ok(redirect(LIST_URL));
    };

    render(
        &state,
        "genre_delete",
        json!({
            "title": "Delete Genre",
            "genre": genre.present(),
            "genre_books": books.iter().map(Book::present).collect::<Vec<_>>(),
        }),
    )
}

pub async fn genre_delete_post(
    State(state): State<AppState>,
    Path(id): Path<Id<Genre>>,
) -> AppResult<Response> {
    state.storage.remove(&id).await?;
    tracing::info!(genre = %id, "genre deleted");
    Ok(redirect(LIST_URL))
}

pub async fn genre_update_get(
    State(state): State<AppState>,
    Path(id): Path<Id<Genre>>,
) -> AppResult<Response> {
    let genre = state
        .storage
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Genre not found"))?;

    render_form(&state, "Update Genre", genre.present(), &[])
}

pub async fn genre_update_post(
    State(state): State<AppState>,
    Path(id): Path<Id<Genre>>,
    form: FormData,
) -> AppResult<Response> {
    let validated = Genre::schema().validate(&form);
    let mut genre = Genre::from_form(validated.values());
    genre.id = id;

    if !validated.is_valid() {
        return render_form(&state, "Update Genre", genre.present(), validated.errors());
    }

    state.storage.replace(&genre).await?;
    tracing::info!(genre = %genre.id, "genre updated");
    Ok(redirect(&genre.url()))
}

fn render_form(
    state: &AppState,
    title: &str,
    genre: Value,
    errors: &[FieldError],
) -> AppResult<Response> {
    render(
        state,
        "genre_form",
        json!({ "title": title, "genre": genre, "errors": errors }),
    )
}
