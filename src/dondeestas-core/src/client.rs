use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{DatabaseConfig, DbKind};
use crate::couchdb::CouchDb;
use crate::error::{DbError, Result};
use crate::models::Person;

/// DbClient stores and retrieves people, independent of the backend
#[async_trait]
pub trait DbClient: Send + Sync {
    /// Store a person, overwriting any document with the same id
    async fn create(&self, person: &Person) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Person>;

    /// Same contract as `create`; a missing person is created
    async fn update(&self, person: &Person) -> Result<()>;

    async fn remove(&self, id: &str) -> Result<()>;

    /// `false` when the person is absent or the backend cannot be reached
    async fn exists(&self, id: &str) -> bool;
}

/// Build and initialize the client for the configured backend
pub async fn new_db_client(config: &DatabaseConfig) -> Result<Arc<dyn DbClient>> {
    if config.name.is_empty() {
        return Err(DbError::Validation("database name is required".to_string()));
    }

    match config.kind {
        DbKind::CouchDb => {
            let db = CouchDb::init(config).await?;
            tracing::info!(db = %db.dbname(), url = %db.url(), "Connected to CouchDB");
            Ok(Arc::new(db))
        }
    }
}
