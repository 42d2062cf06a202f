//! Generic MongoDB-backed repository, used everywhere a processor or
//! service needs plain CRUD-by-filter over a typed collection.
//!
//! The original codebase has one bespoke `*Repository` struct per model
//! (`RouterRepository`, `OLTRepository`, ...) each hand-rolling the same
//! find/insert/update-by-filter methods. Rust expresses that once as a
//! generic `Repository<T>` over any `Serialize + DeserializeOwned`, per the
//! design note calling out this duplication.

use bson::Document;
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

#[derive(Clone)]
pub struct Repository<T> {
    collection: Collection<T>,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Unpin,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Repository {
            collection: db.collection(collection_name),
        }
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, StorageError> {
        self.collection.find_one(filter).await.map_err(StorageError::Operation)
    }

    pub async fn find(&self, filter: Document) -> Result<Vec<T>, StorageError> {
        let cursor = self.collection.find(filter).await.map_err(StorageError::Operation)?;
        cursor.try_collect().await.map_err(StorageError::Operation)
    }

    pub async fn insert_one(&self, doc: &T) -> Result<(), StorageError> {
        self.collection.insert_one(doc).await.map_err(StorageError::Operation)?;
        Ok(())
    }

    /// Updates the first document matching `filter` with a raw update
    /// document (`$set`/`$inc`/...), optionally upserting, and returns the
    /// post-update document. This is the shape every bucketed-metric upsert
    /// and rolling-series update in this crate goes through.
    pub async fn update_by_filter(
        &self,
        filter: Document,
        update: Document,
        upsert: bool,
    ) -> Result<Option<T>, StorageError> {
        self.collection
            .find_one_and_update(filter, update)
            .with_options(
                FindOneAndUpdateOptions::builder()
                    .upsert(upsert)
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await
            .map_err(StorageError::Operation)
    }
}
