//! # Subway Service
//!
//! Manages subway lines as ordered chains of sections between stations.
//!
//! ## Architecture
//!
//! - **domain**: the `Line` aggregate, `Station`, repository ports
//! - **application**: use-case services, per-line serialization
//! - **infrastructure**: SeaORM/SQLite and in-memory repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;
