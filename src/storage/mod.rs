//! Persistence layer: MongoDB-backed repositories plus the bucketing helper
//! shared by every flow-derived metric processor.

pub mod bucket;
pub mod device_repo;
pub mod repository;

pub use device_repo::DeviceRepository;
pub use repository::Repository;

use crate::error::StorageError;

pub async fn connect(uri: &str, database: &str) -> Result<mongodb::Database, StorageError> {
    let client = mongodb::Client::with_uri_str(uri).await.map_err(StorageError::Connect)?;
    Ok(client.database(database))
}
