//! User store adapters.
//!
//! This module provides the concrete implementations of the
//! [`UserRepository`](crate::domain::ports::UserRepository) port plus the
//! plumbing needed to reach the store:
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel rows and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and the schema
//!   definition (`schema.rs`) are never exposed to the domain layer.
//! - **Async-safe pooling**: connections are managed via `bb8` pools through
//!   `diesel-async`.
//! - **Lifecycle**: [`StoreConnection`] owns the connect-then-monitor flow
//!   and reports state changes as events.
//!
//! # Example
//!
//! ```ignore
//! use users_api::outbound::persistence::{
//!     DieselUserRepository, PgConnector, PoolConfig, StoreConnection,
//! };
//!
//! let connection = StoreConnection::new(PgConnector::new(PoolConfig::new(url)));
//! let pool = connection.connect().await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod connection;
mod diesel_user_repository;
mod memory_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use connection::{
    ConnectionEvent, ConnectionState, PgConnector, StoreConnection, StoreConnector,
};
pub use diesel_user_repository::DieselUserRepository;
pub use memory_user_repository::InMemoryUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
