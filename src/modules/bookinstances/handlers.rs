use axum::extract::{Path, State};
use axum::response::Response;
use libris_db::{Id, Order, Query, StoreResult};
use libris_http::error::{AppError, AppResult};
use libris_http::response::{redirect, render};
use libris_kernel::AppState;
use serde_json::{json, Value};
use strum::IntoEnumIterator;

use super::models::{BookInstance, Status};
use crate::forms::{FieldError, FormData, Validated};
use crate::modules::books::models::Book;

const LIST_URL: &str = "/catalog/bookinstances";

pub async fn bookinstance_list(State(state): State<AppState>) -> AppResult<Response> {
    let copies: Vec<BookInstance> = state.storage.find(Query::all()).await?;
    let books = state
        .storage
        .populate(copies.iter().map(|copy| &copy.book))
        .await?;

    let bookinstance_list: Vec<Value> = copies
        .iter()
        .map(|copy| copy.present_with(books.get(&copy.book)))
        .collect();

    render(
        &state,
        "bookinstance_list",
        json!({ "title": "Book Instance List", "bookinstance_list": bookinstance_list }),
    )
}

pub async fn bookinstance_detail(
    State(state): State<AppState>,
    Path(id): Path<Id<BookInstance>>,
) -> AppResult<Response> {
    let copy = state
        .storage
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Book copy not found"))?;
    let book = state.storage.get(&copy.book).await?;

    let title = match &book {
        Some(book) => format!("Copy: {}", book.title),
        None => "Copy".to_string(),
    };

    render(
        &state,
        "bookinstance_detail",
        json!({ "title": title, "bookinstance": copy.present_with(book.as_ref()) }),
    )
}

pub async fn bookinstance_create_get(State(state): State<AppState>) -> AppResult<Response> {
    let form = CopyForm {
        copy: Value::Null,
        selected_book: None,
        status: Status::default(),
        errors: &[],
    };
    let books = book_choices(&state).await?;
    render_form(&state, "Create BookInstance", form, books)
}

pub async fn bookinstance_create_post(
    State(state): State<AppState>,
    form: FormData,
) -> AppResult<Response> {
    let validated = BookInstance::schema().validate(&form);
    let mut copy = BookInstance::from_form(validated.values());

    if !validated.is_valid() {
        let form = CopyForm::as_entered(&copy, &validated);
        let books = book_choices(&state).await?;
        return render_form(&state, "Create BookInstance", form, books);
    }

    state.storage.insert(&mut copy).await?;
    tracing::info!(bookinstance = %copy.id, book = %copy.book, "book copy created");
    Ok(redirect(&copy.url()))
}

pub async fn bookinstance_delete_get(
    State(state): State<AppState>,
    Path(id): Path<Id<BookInstance>>,
) -> AppResult<Response> {
    let Some(copy) = state.storage.get(&id).await? else {
        return Ok(redirect(LIST_URL));
    };
    let book = state.storage.get(&copy.book).await?;

    render(
        &state,
        "bookinstance_delete",
        json!({
            "title": "Delete BookInstance",
            "bookinstance": copy.present_with(book.as_ref()),
        }),
    )
}

pub async fn bookinstance_delete_post(
    State(state): State<AppState>,
    Path(id): Path<Id<BookInstance>>,
) -> AppResult<Response> {
    state.storage.remove(&id).await?;
    tracing::info!(bookinstance = %id, "book copy deleted");
    Ok(redirect(LIST_URL))
}

pub async fn bookinstance_update_get(
    State(state): State<AppState>,
    Path(id): Path<Id<BookInstance>>,
) -> AppResult<Response> {
    let (copy, books) = tokio::try_join!(state.storage.get(&id), book_choices(&state))?;
    let copy = copy.ok_or_else(|| AppError::not_found("Book copy not found"))?;

    let form = CopyForm {
        copy: copy.present(),
        selected_book: Some(copy.book.to_string()),
        status: copy.status,
        errors: &[],
    };
    render_form(&state, "Update BookInstance", form, books)
}

pub async fn bookinstance_update_post(
    State(state): State<AppState>,
    Path(id): Path<Id<BookInstance>>,
    form: FormData,
) -> AppResult<Response> {
    let validated = BookInstance::schema().validate(&form);
    let mut copy = BookInstance::from_form(validated.values());
    copy.id = id;

    if !validated.is_valid() {
        let form = CopyForm::as_entered(&copy, &validated);
        let books = book_choices(&state).await?;
        return render_form(&state, "Update BookInstance", form, books);
    }

    state.storage.replace(&copy).await?;
    tracing::info!(bookinstance = %copy.id, "book copy updated");
    Ok(redirect(&copy.url()))
}

struct CopyForm<'a> {
    copy: Value,
    selected_book: Option<String>,
    status: Status,
    errors: &'a [FieldError],
}

impl<'a> CopyForm<'a> {
    /// The form as submitted, keeping a due date that failed to parse.
    fn as_entered(copy: &BookInstance, validated: &'a Validated) -> Self {
        let mut draft = copy.present();
        draft["due_back"] = json!(validated.values().get("due_back"));
        Self {
            copy: draft,
            selected_book: Some(copy.book.to_string()),
            status: copy.status,
            errors: validated.errors(),
        }
    }
}

/// Every book a copy can belong to, by title.
async fn book_choices(state: &AppState) -> StoreResult<Vec<Book>> {
    state
        .storage
        .find(Query::all().sort_by("title", Order::Ascending))
        .await
}

fn render_form(
    state: &AppState,
    title: &str,
    form: CopyForm<'_>,
    books: Vec<Book>,
) -> AppResult<Response> {
    let statuses: Vec<Value> = Status::iter()
        .map(|status| json!({ "value": status, "selected": status == form.status }))
        .collect();

    render(
        state,
        "bookinstance_form",
        json!({
            "title": title,
            "bookinstance": form.copy,
            "book_list": books.iter().map(Book::present).collect::<Vec<_>>(),
            "selected_book": form.selected_book,
            "statuses": statuses,
            "errors": form.errors,
        }),
    )
}
