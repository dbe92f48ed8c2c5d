use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Document, Filter, Query, Store, StoreResult, ID_FIELD};

/// In-process store. Collections keep insertion order, which is the order
/// unsorted queries return.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<&'static str, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_id(doc: &Document, id: &str) -> bool {
    doc.get(ID_FIELD).and_then(Value::as_str) == Some(id)
}

#[async_trait]
impl Store for MemoryStore {
    async fn find(&self, collection: &'static str, query: Query) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut found: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| query.filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some(sort) = &query.sort {
            found.sort_by(|a, b| sort.compare(a, b));
        }
        Ok(found)
    }

    async fn find_by_id(
        &self,
        collection: &'static str,
        id: &str,
    ) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| has_id(doc, id)))
            .cloned())
    }

    async fn find_one(
        &self,
        collection: &'static str,
        filter: Filter,
    ) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn count(&self, collection: &'static str, filter: Filter) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn insert(&self, collection: &'static str, mut doc: Document) -> StoreResult<String> {
        let id = Uuid::now_v7().simple().to_string();
        doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(doc);
        Ok(id)
    }

    async fn replace(&self, collection: &'static str, id: &str, mut doc: Document) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(slot) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| has_id(doc, id)))
        {
            doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
            *slot = doc;
        }
        Ok(())
    }

    async fn remove(&self, collection: &'static str, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|doc| !has_id(doc, id));
        }
        Ok(())
    }
}
