//! Dondeestas Core Library
//!
//! This crate provides the storage side of Dondeestas, including:
//! - The `Person` location-sharing record
//! - Configuration for the service and its database backend
//! - The backend-agnostic `DbClient` abstraction and its factory
//! - A CouchDB-style REST client speaking plain HTTP + JSON

pub mod client;
pub mod config;
pub mod couchdb;
pub mod error;
pub mod models;
pub mod request;

// Re-export commonly used types
pub use client::{new_db_client, DbClient};
pub use config::{Config, DatabaseConfig, DbKind, LoggingConfig};
pub use couchdb::CouchDb;
pub use error::{DbError, Result};
pub use models::*;
