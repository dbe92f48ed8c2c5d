//! Error handling for the libris HTTP layer
//!
//! Handlers return [`AppError`]; its response carries an [`ErrorPage`]
//! extension which [`render_error_pages`] turns into the `error` view.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use libris_db::StoreError;
use libris_kernel::AppState;
use serde_json::json;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

/// What the error view gets to show, attached to the error response.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub detail: Option<String>,
    pub error_id: Uuid,
    pub timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();

        let (status, code, message, detail) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, "not_found", message, None),
            AppError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "bad_request", message, None)
            }
            AppError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                e.to_string(),
                Some(format!("{e:?}")),
            ),
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = code,
                status_code = %status.as_u16(),
                detail = detail.as_deref().unwrap_or_default(),
                "Request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = code,
                status_code = %status.as_u16(),
                "Request error"
            );
        }

        let mut response = (status, message.clone()).into_response();
        response.extensions_mut().insert(ErrorPage {
            status,
            code,
            message,
            detail,
            error_id,
            timestamp,
        });
        response
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> AppError {
    AppError::not_found("Not Found")
}

/// Middleware rendering the `error` view for responses produced by [`AppError`].
/// Full detail is only shown where the settings allow it.
pub async fn render_error_pages(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(page) = response.extensions_mut().remove::<ErrorPage>() else {
        return response;
    };

    let detail = page
        .detail
        .filter(|_| state.settings.exposes_error_detail());
    let data = json!({
        "title": page.status.canonical_reason().unwrap_or("Error"),
        "status": page.status.as_u16(),
        "code": page.code,
        "message": page.message,
        "detail": detail,
        "error_id": page.error_id.to_string(),
        "timestamp": page.timestamp,
    });

    let body = match state.views.render("error", &data) {
        Ok(body) => body,
        Err(err) => {
            tracing::error!(error_id = %page.error_id, error = ?err, "failed to render error view");
            fallback_page(page.status, &page.message)
        }
    };

    (page.status, Html(body)).into_response()
}

fn fallback_page(status: StatusCode, message: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>{code}</title></head>\
         <body><h1>{code}</h1><p>{message}</p></body></html>",
        code = status.as_u16(),
        message = tera::escape_html(message),
    )
}
