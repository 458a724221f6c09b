//! dondeestas - location sharing on top of a document database
//!
//! This crate provides both a library and binary for running the service.
//!
//! # Embedded Usage
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpServer};
//! use dondeestas_core::{new_db_client, DatabaseConfig};
//! use dondeestas_server::api;
//!
//! #[actix_web::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = new_db_client(&DatabaseConfig::default()).await?;
//!     let state = web::Data::new(api::AppState { db });
//!     HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
//!         .bind("0.0.0.0:8080")?
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! # Server Usage
//!
//! Run the binary to start the REST API server, it reads `config.json` from
//! the working directory:
//! ```bash
//! dondeestas-server
//! ```

pub use dondeestas_core;

pub mod api;
