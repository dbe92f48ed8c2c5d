use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{Document, Filter, Id, MemoryStore, Query, StoreError, StoreResult, ID_FIELD};

/// Persistence contract implemented by every backend.
///
/// Removing or replacing an identifier that does not exist is not an error.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find(&self, collection: &'static str, query: Query) -> StoreResult<Vec<Document>>;

    async fn find_by_id(&self, collection: &'static str, id: &str)
        -> StoreResult<Option<Document>>;

    async fn find_one(&self, collection: &'static str, filter: Filter)
        -> StoreResult<Option<Document>>;

    async fn count(&self, collection: &'static str, filter: Filter) -> StoreResult<u64>;

    /// Persist a new document and return the identifier the store assigned.
    async fn insert(&self, collection: &'static str, doc: Document) -> StoreResult<String>;

    async fn replace(&self, collection: &'static str, id: &str, doc: Document) -> StoreResult<()>;

    async fn remove(&self, collection: &'static str, id: &str) -> StoreResult<()>;
}

/// A persisted entity type.
pub trait Model: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> &Id<Self>;

    fn assign_id(&mut self, id: Id<Self>);
}

/// Typed facade over an injected [`Store`].
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn Store>,
}

impl Storage {
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Storage backed by a fresh, empty in-memory store.
    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub async fn find<T: Model>(&self, query: impl Into<Query>) -> StoreResult<Vec<T>> {
        self.store
            .find(T::COLLECTION, query.into())
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn get<T: Model>(&self, id: &Id<T>) -> StoreResult<Option<T>> {
        self.store
            .find_by_id(T::COLLECTION, id.as_str())
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn find_one<T: Model>(&self, filter: Filter) -> StoreResult<Option<T>> {
        self.store
            .find_one(T::COLLECTION, filter)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn count<T: Model>(&self, filter: Filter) -> StoreResult<u64> {
        self.store.count(T::COLLECTION, filter).await
    }

    /// Fetch every referenced document concurrently, keyed by identifier.
    /// Dangling references are simply absent from the result.
    pub async fn populate<'a, T: Model>(
        &self,
        ids: impl IntoIterator<Item = &'a Id<T>>,
    ) -> StoreResult<HashMap<Id<T>, T>> {
        let mut unique: Vec<&Id<T>> = Vec::new();
        for id in ids {
            if !id.is_unassigned() && !unique.contains(&id) {
                unique.push(id);
            }
        }
        let found = try_join_all(unique.into_iter().map(|id| self.get::<T>(id))).await?;
        Ok(found
            .into_iter()
            .flatten()
            .map(|model| (model.id().clone(), model))
            .collect())
    }

    /// Persist a new model and write the assigned identifier back into it.
    pub async fn insert<T: Model>(&self, model: &mut T) -> StoreResult<Id<T>> {
        let mut doc = encode(model)?;
        doc.remove(ID_FIELD);
        let id = Id::new(self.store.insert(T::COLLECTION, doc).await?);
        model.assign_id(id.clone());
        tracing::debug!(collection = T::COLLECTION, %id, "document inserted");
        Ok(id)
    }

    /// Replace the whole stored document carrying the model's identifier.
    pub async fn replace<T: Model>(&self, model: &T) -> StoreResult<()> {
        let mut doc = encode(model)?;
        doc.remove(ID_FIELD);
        self.store
            .replace(T::COLLECTION, model.id().as_str(), doc)
            .await?;
        tracing::debug!(collection = T::COLLECTION, id = %model.id(), "document replaced");
        Ok(())
    }

    pub async fn remove<T: Model>(&self, id: &Id<T>) -> StoreResult<()> {
        self.store.remove(T::COLLECTION, id.as_str()).await?;
        tracing::debug!(collection = T::COLLECTION, %id, "document removed");
        Ok(())
    }
}

fn encode<T: Model>(model: &T) -> StoreResult<Document> {
    match serde_json::to_value(model) {
        Ok(Value::Object(doc)) => Ok(doc),
        Ok(_) => Err(StoreError::Encode {
            collection: T::COLLECTION,
            source: serde::ser::Error::custom("model did not serialize to an object"),
        }),
        Err(source) => Err(StoreError::Encode {
            collection: T::COLLECTION,
            source,
        }),
    }
}

fn decode<T: Model>(doc: Document) -> StoreResult<T> {
    serde_json::from_value(Value::Object(doc)).map_err(|source| StoreError::Decode {
        collection: T::COLLECTION,
        source,
    })
}
