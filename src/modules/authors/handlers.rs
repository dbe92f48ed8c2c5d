use axum::extract::{Path, State};
use axum::response::Response;
use libris_db::{Filter, Id, Order, Query};
use libris_http::error::{AppError, AppResult};
use libris_http::response::{redirect, render};
use libris_kernel::AppState;
use serde_json::{json, Value};

use super::models::Author;
use crate::forms::{FieldError, FormData, Validated};
use crate::modules::books::models::Book;

const LIST_URL: &str = "/catalog/authors";

pub async fn author_list(State(state): State<AppState>) -> AppResult<Response> {
    let authors: Vec<Author> = state
        .storage
        .find(Query::all().sort_by("family_name", Order::Ascending))
        .await?;

    render(
        &state,
        "author_list",
        json!({
            "title": "Author List",
            "author_list": authors.iter().map(Author::present).collect::<Vec<_>>(),
        }),
    )
}

pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<Id<Author>>,
) -> AppResult<Response> {
    let (author, books) = tokio::try_join!(
        state.storage.get(&id),
        state.storage.find::<Book>(Filter::eq("author", id.as_str())),
    )?;
    let author = author.ok_or_else(|| AppError::not_found("Author not found"))?;

    render(
        &state,
        "author_detail",
        json!({
            "title": "Author Detail",
            "author": author.present(),
            "author_books": books.iter().map(Book::present).collect::<Vec<_>>(),
        }),
    )
}

pub async fn author_create_get(State(state): State<AppState>) -> AppResult<Response> {
    render_form(&state, "Create Author", Value::Null, &[])
}

pub async fn author_create_post(
    State(state): State<AppState>,
    form: FormData,
) -> AppResult<Response> {
    let validated = Author::schema().validate(&form);
    let mut author = Author::from_form(validated.values());

    if !validated.is_valid() {
        let draft = as_entered(&author, &validated);
        return render_form(&state, "Create Author", draft, validated.errors());
    }

    state.storage.insert(&mut author).await?;
    tracing::info!(author = %author.id, "author created");
    Ok(redirect(&author.url()))
}

pub async fn author_delete_get(
    State(state): State<AppState>,
    Path(id): Path<Id<Author>>,
) -> AppResult<Response> {
    let (author, books) = tokio::try_join!(
        state.storage.get(&id),
        state.storage.find::<Book>(Filter::eq("author", id.as_str())),
    )?;
    let Some(author) = author else {
        return Ok(redirect(LIST_URL));
    };

    render(
        &state,
        "author_delete",
        json!({
            "title": "Delete Author",
            "author": author.present(),
            "author_books": books.iter().map(Book::present).collect::<Vec<_>>(),
        }),
    )
}

pub async fn author_delete_post(
    State(state): State<AppState>,
    Path(id): Path<Id<Author>>,
) -> AppResult<Response> {
    state.storage.remove(&id).await?;
    tracing::info!(author = %id, "author deleted");
    Ok(redirect(LIST_URL))
}

pub async fn author_update_get(
    State(state): State<AppState>,
    Path(id): Path<Id<Author>>,
) -> AppResult<Response> {
    let author = state
        .storage
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Author not found"))?;

    render_form(&state, "Update Author", author.present(), &[])
}

pub async fn author_update_post(
    State(state): State<AppState>,
    Path(id): Path<Id<Author>>,
    form: FormData,
) -> AppResult<Response> {
    let validated = Author::schema().validate(&form);
    let mut author = Author::from_form(validated.values());
    author.id = id;

    if !validated.is_valid() {
        let draft = as_entered(&author, &validated);
        return render_form(&state, "Update Author", draft, validated.errors());
    }

    state.storage.replace(&author).await?;
    tracing::info!(author = %author.id, "author updated");
    Ok(redirect(&author.url()))
}

/// The author as the user typed it, keeping dates that failed to parse.
fn as_entered(author: &Author, validated: &Validated) -> Value {
    let mut draft = author.present();
    for field in ["date_of_birth", "date_of_death"] {
        draft[field] = json!(validated.values().get(field));
    }
    draft
}

fn render_form(
    state: &AppState,
    title: &str,
    author: Value,
    errors: &[FieldError],
) -> AppResult<Response> {
    render(
        state,
        "author_form",
        json!({ "title": title, "author": author, "errors": errors }),
    )
}
