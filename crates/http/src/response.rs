//! Response helpers shared by the catalog controllers.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use libris_kernel::AppState;
use serde_json::Value;

use crate::error::AppResult;

/// Render a view with named data as an HTML page.
pub fn render(state: &AppState, view: &str, data: Value) -> AppResult<Response> {
    let html = state.views.render(view, &data)?;
    Ok(Html(html).into_response())
}

/// `302 Found` redirect, the status browsers follow after a form post.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
