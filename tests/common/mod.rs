#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use libris_db::{
    Document, Filter, MemoryStore, Query, Storage, Store, StoreError, StoreResult,
};
use libris_kernel::{AppState, Settings, Views};
use serde_json::{json, Value};
use tokio::sync::Semaphore;
use tower::ServiceExt;

/// Returns what it was asked to render as JSON, so tests assert on named
/// data instead of markup.
pub struct RecordingViews;

impl Views for RecordingViews {
    fn render(&self, view: &str, data: &Value) -> anyhow::Result<String> {
        Ok(json!({ "view": view, "data": data }).to_string())
    }
}

/// A store whose every call fails, standing in for a lost database.
pub struct UnavailableStore;

#[async_trait]
impl Store for UnavailableStore {
    async fn find(&self, _: &'static str, _: Query) -> StoreResult<Vec<Document>> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _: &'static str, _: &str) -> StoreResult<Option<Document>> {
        Err(unavailable())
    }

    async fn find_one(&self, _: &'static str, _: Filter) -> StoreResult<Option<Document>> {
        Err(unavailable())
    }

    async fn count(&self, _: &'static str, _: Filter) -> StoreResult<u64> {
        Err(unavailable())
    }

    async fn insert(&self, _: &'static str, _: Document) -> StoreResult<String> {
        Err(unavailable())
    }

    async fn replace(&self, _: &'static str, _: &str, _: Document) -> StoreResult<()> {
        Err(unavailable())
    }

    async fn remove(&self, _: &'static str, _: &str) -> StoreResult<()> {
        Err(unavailable())
    }
}

fn unavailable() -> StoreError {
    StoreError::backend("database unavailable")
}

/// An in-memory store whose lookups by id stay pending until a listing has
/// started. A handler that awaits the lookup before listing never finishes.
pub struct ListingFirstStore {
    inner: MemoryStore,
    listed: Semaphore,
}

impl ListingFirstStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            listed: Semaphore::new(0),
        }
    }
}

#[async_trait]
impl Store for ListingFirstStore {
    async fn find(&self, collection: &'static str, query: Query) -> StoreResult<Vec<Document>> {
        self.listed.add_permits(1);
        self.inner.find(collection, query).await
    }

    async fn find_by_id(
        &self,
        collection: &'static str,
        id: &str,
    ) -> StoreResult<Option<Document>> {
        let _permit = self.listed.acquire().await;
        self.inner.find_by_id(collection, id).await
    }

    async fn find_one(
        &self,
        collection: &'static str,
        filter: Filter,
    ) -> StoreResult<Option<Document>> {
        self.inner.find_one(collection, filter).await
    }

    async fn count(&self, collection: &'static str, filter: Filter) -> StoreResult<u64> {
        self.inner.count(collection, filter).await
    }

    async fn insert(&self, collection: &'static str, doc: Document) -> StoreResult<String> {
        self.inner.insert(collection, doc).await
    }

    async fn replace(&self, collection: &'static str, id: &str, doc: Document) -> StoreResult<()> {
        self.inner.replace(collection, id, doc).await
    }

    async fn remove(&self, collection: &'static str, id: &str) -> StoreResult<()> {
        self.inner.remove(collection, id).await
    }
}

pub struct TestApp {
    pub storage: Storage,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_storage(Storage::memory())
    }

    pub fn with_storage(storage: Storage) -> Self {
        let state = AppState::new(storage.clone(), Arc::new(RecordingViews), Settings::default());
        Self {
            storage,
            router: libris_app::build_app(state),
        }
    }

    pub fn unavailable() -> Self {
        Self::with_storage(Storage::new(UnavailableStore))
    }

    pub fn listing_first() -> Self {
        Self::with_storage(Storage::new(ListingFirstStore::new()))
    }

    /// Like [`TestApp::get`], but fails instead of hanging.
    pub async fn get_within(&self, uri: &str, limit: Duration) -> TestResponse {
        tokio::time::timeout(limit, self.get(uri))
            .await
            .unwrap_or_else(|_| panic!("GET {uri} did not finish within {limit:?}"))
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(serde_urlencoded::to_string(form).unwrap()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let request_id = response
            .headers()
            .get("x-request-id")
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            location,
            request_id,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub request_id: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Asserts a 302 and returns its target.
    pub fn redirect_target(&self) -> &str {
        assert_eq!(self.status, StatusCode::FOUND, "body: {}", self.body);
        self.location.as_deref().unwrap()
    }

    /// The last path segment of the redirect target.
    pub fn redirected_id(&self) -> String {
        self.redirect_target().rsplit('/').next().unwrap().to_string()
    }

    pub fn view(&self) -> String {
        self.page()["view"].as_str().unwrap().to_string()
    }

    pub fn data(&self) -> Value {
        self.page()["data"].clone()
    }

    /// Validation messages carried by a re-rendered form.
    pub fn error_messages(&self) -> Vec<String> {
        self.data()["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|error| error["message"].as_str().unwrap().to_string())
            .collect()
    }

    fn page(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|err| panic!("not a recorded view ({err}): {}", self.body))
    }
}

/// Create a record through its form and return the assigned id.
pub async fn create(app: &TestApp, entity: &str, form: &[(&str, &str)]) -> String {
    app.post(&format!("/catalog/{entity}/create"), form)
        .await
        .redirected_id()
}
