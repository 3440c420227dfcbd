//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern. The only adapter
//! family is **persistence**: the PostgreSQL-backed user repository using
//! Diesel ORM, its in-memory twin, and the store connection lifecycle.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod persistence;
