use std::sync::Arc;

use libris_db::Storage;

use crate::settings::Settings;
use crate::views::Views;

/// Dependencies handed to every request handler.
///
/// Constructed once at startup; tests build one around an in-memory store and
/// a recording view layer.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub views: Arc<dyn Views>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(storage: Storage, views: Arc<dyn Views>, settings: Settings) -> Self {
        Self {
            storage,
            views,
            settings: Arc::new(settings),
        }
    }
}
