use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson};
use mongodb::options::FindOptions;
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{Document, Filter, Order, Query, Store, StoreError, StoreResult, ID_FIELD};

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::backend(err)
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        StoreError::backend(err)
    }
}

/// MongoDB-backed store. Identifiers are ObjectId hex strings kept as string `_id`.
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect using a URI that names the default database.
    #[instrument(skip(uri))]
    pub async fn connect(uri: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        client.warm_connection_pool().await;
        let database = match client.default_database() {
            Some(x) => x,
            None => {
                return Err(StoreError::Config(
                    "no database specified in connection string".to_string(),
                ))
            }
        };
        info!("successfully connected to db {}", database.name());
        Ok(MongoStore { database })
    }

    fn access(&self, collection: &'static str) -> Collection<bson::Document> {
        self.database.collection(collection)
    }
}

fn to_bson(doc: Document) -> StoreResult<bson::Document> {
    Ok(bson::to_document(&doc)?)
}

fn from_bson(doc: bson::Document) -> Document {
    match Bson::Document(doc).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

fn filter_doc(filter: Filter) -> StoreResult<bson::Document> {
    let mut selector = bson::Document::new();
    if let Filter::Eq(field, value) = filter {
        selector.insert(field, bson::to_bson(&value)?);
    }
    Ok(selector)
}

fn find_options(query: &Query) -> FindOptions {
    let sort = query.sort.as_ref().map(|sort| {
        let mut spec = bson::Document::new();
        let direction = match sort.order {
            Order::Ascending => 1,
            Order::Descending => -1,
        };
        spec.insert(sort.field.clone(), direction);
        spec
    });
    FindOptions::builder().sort(sort).build()
}

#[async_trait]
impl Store for MongoStore {
    async fn find(&self, collection: &'static str, query: Query) -> StoreResult<Vec<Document>> {
        let options = find_options(&query);
        let docs: Vec<bson::Document> = self
            .access(collection)
            .find(filter_doc(query.filter)?, options)
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(from_bson).collect())
    }

    async fn find_by_id(
        &self,
        collection: &'static str,
        id: &str,
    ) -> StoreResult<Option<Document>> {
        Ok(self
            .access(collection)
            .find_one(doc! { "_id": id }, None)
            .await?
            .map(from_bson))
    }

    async fn find_one(
        &self,
        collection: &'static str,
        filter: Filter,
    ) -> StoreResult<Option<Document>> {
        Ok(self
            .access(collection)
            .find_one(filter_doc(filter)?, None)
            .await?
            .map(from_bson))
    }

    async fn count(&self, collection: &'static str, filter: Filter) -> StoreResult<u64> {
        Ok(self
            .access(collection)
            .count_documents(filter_doc(filter)?, None)
            .await?)
    }

    async fn insert(&self, collection: &'static str, doc: Document) -> StoreResult<String> {
        let id = ObjectId::new().to_hex();
        let mut doc = to_bson(doc)?;
        doc.insert(ID_FIELD, id.clone());
        self.access(collection).insert_one(doc, None).await?;
        Ok(id)
    }

    async fn replace(&self, collection: &'static str, id: &str, doc: Document) -> StoreResult<()> {
        let mut doc = to_bson(doc)?;
        doc.insert(ID_FIELD, id);
        self.access(collection)
            .replace_one(doc! { "_id": id }, doc, None)
            .await?;
        Ok(())
    }

    async fn remove(&self, collection: &'static str, id: &str) -> StoreResult<()> {
        self.access(collection)
            .delete_one(doc! { "_id": id }, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_filter_becomes_equality_selector() {
        let selector = filter_doc(Filter::eq("genre", "g1")).unwrap();
        assert_eq!(selector, doc! { "genre": "g1" });
        assert!(filter_doc(Filter::All).unwrap().is_empty());
    }

    #[test]
    fn descending_sort_maps_to_minus_one() {
        let options = find_options(&Query::all().sort_by("name", Order::Descending));
        assert_eq!(options.sort, Some(doc! { "name": -1 }));
    }

    #[test]
    fn documents_round_trip_through_bson() {
        let original = json!({"name": "Fantasy", "genre": ["a", "b"], "due_back": null});
        let doc = original.as_object().cloned().unwrap();
        let back = from_bson(to_bson(doc.clone()).unwrap());
        assert_eq!(back, doc);
    }
}
