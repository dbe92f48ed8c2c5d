use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::Response;
use libris_db::{Filter, Id, Order, Query, StoreResult};
use libris_http::error::{AppError, AppResult};
use libris_http::response::{redirect, render};
use libris_kernel::AppState;
use serde_json::{json, Value};

use super::models::Book;
use crate::forms::{FieldError, FormData};
use crate::modules::authors::models::Author;
use crate::modules::bookinstances::models::BookInstance;
use crate::modules::genres::models::Genre;

const LIST_URL: &str = "/catalog/books";

pub async fn book_list(State(state): State<AppState>) -> AppResult<Response> {
    let books: Vec<Book> = state
        .storage
        .find(Query::all().sort_by("title", Order::Ascending))
        .await?;
    let authors = state
        .storage
        .populate(books.iter().map(|book| &book.author))
        .await?;

    let book_list: Vec<Value> = books
        .iter()
        .map(|book| book.present_with(authors.get(&book.author), &[]))
        .collect();

    render(
        &state,
        "book_list",
        json!({ "title": "Book List", "book_list": book_list }),
    )
}

pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<Id<Book>>,
) -> AppResult<Response> {
    let (book, copies) = tokio::try_join!(
        state.storage.get(&id),
        state.storage.find::<BookInstance>(Filter::eq("book", id.as_str())),
    )?;
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;
    let view = populated(&state, &book).await?;

    render(
        &state,
        "book_detail",
        json!({
            "title": book.title,
            "book": view,
            "book_instances": copies.iter().map(BookInstance::present).collect::<Vec<_>>(),
        }),
    )
}

pub async fn book_create_get(State(state): State<AppState>) -> AppResult<Response> {
    let choices = load_choices(&state).await?;
    render_form(&state, "Create Book", None, choices, &[])
}

pub async fn book_create_post(
    State(state): State<AppState>,
    form: FormData,
) -> AppResult<Response> {
    let validated = Book::schema().validate(&form);
    let mut book = Book::from_form(validated.values());

    if !validated.is_valid() {
        let choices = load_choices(&state).await?;
        return render_form(&state, "Create Book", Some(&book), choices, validated.errors());
    }

    state.storage.insert(&mut book).await?;
    tracing::info!(book = %book.id, "book created");
    Ok(redirect(&book.url()))
}

pub async fn book_delete_get(
    State(state): State<AppState>,
    Path(id): Path<Id<Book>>,
) -> AppResult<Response> {
    let (book, copies) = tokio::try_join!(
        state.storage.get(&id),
        state.storage.find::<BookInstance>(Filter::eq("book", id.as_str())),
    )?;
    let Some(book) = book else {
        return Ok(redirect(LIST_URL));
    };
    let view = populated(&state, &book).await?;

    render(
        &state,
        "book_delete",
        json!({
            "title": "Delete Book",
            "book": view,
            "book_instances": copies.iter().map(BookInstance::present).collect::<Vec<_>>(),
        }),
    )
}

pub async fn book_delete_post(
    State(state): State<AppState>,
    Path(id): Path<Id<Book>>,
) -> AppResult<Response> {
    state.storage.remove(&id).await?;
    tracing::info!(book = %id, "book deleted");
    Ok(redirect(LIST_URL))
}

pub async fn book_update_get(
    State(state): State<AppState>,
    Path(id): Path<Id<Book>>,
) -> AppResult<Response> {
    let (book, choices) = tokio::try_join!(state.storage.get(&id), load_choices(&state))?;
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;

    render_form(&state, "Update Book", Some(&book), choices, &[])
}

pub async fn book_update_post(
    State(state): State<AppState>,
    Path(id): Path<Id<Book>>,
    form: FormData,
) -> AppResult<Response> {
    let validated = Book::schema().validate(&form);
    let mut book = Book::from_form(validated.values());
    book.id = id;

    if !validated.is_valid() {
        let choices = load_choices(&state).await?;
        return render_form(&state, "Update Book", Some(&book), choices, validated.errors());
    }

    state.storage.replace(&book).await?;
    tracing::info!(book = %book.id, "book updated");
    Ok(redirect(&book.url()))
}

/// Present a book with its author and genres inlined.
async fn populated(state: &AppState, book: &Book) -> StoreResult<Value> {
    let (author, genres) = tokio::try_join!(
        state.storage.get(&book.author),
        state.storage.populate(&book.genre),
    )?;
    let genres = in_order(&book.genre, &genres);
    Ok(book.present_with(author.as_ref(), &genres))
}

fn in_order<'a>(ids: &[Id<Genre>], found: &'a HashMap<Id<Genre>, Genre>) -> Vec<&'a Genre> {
    ids.iter().filter_map(|id| found.get(id)).collect()
}

/// Every author and genre a book can refer to.
async fn load_choices(state: &AppState) -> StoreResult<(Vec<Author>, Vec<Genre>)> {
    tokio::try_join!(
        state
            .storage
            .find::<Author>(Query::all().sort_by("family_name", Order::Ascending)),
        state
            .storage
            .find::<Genre>(Query::all().sort_by("name", Order::Ascending)),
    )
}

/// Render the book form, marking the book's current author and genres.
fn render_form(
    state: &AppState,
    title: &str,
    book: Option<&Book>,
    (authors, genres): (Vec<Author>, Vec<Genre>),
    errors: &[FieldError],
) -> AppResult<Response> {

    let authors: Vec<Value> = authors
        .iter()
        .map(|author| {
            let mut view = author.present();
            view["selected"] = json!(book.is_some_and(|book| book.author == author.id));
            view
        })
        .collect();
    let genres: Vec<Value> = genres
        .iter()
        .map(|genre| {
            let mut view = genre.present();
            view["checked"] = json!(book.is_some_and(|book| book.genre.contains(&genre.id)));
            view
        })
        .collect();

    render(
        state,
        "book_form",
        json!({
            "title": title,
            "book": book.map(Book::present),
            "authors": authors,
            "genres": genres,
            "errors": errors,
        }),
    )
}
