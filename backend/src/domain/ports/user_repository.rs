//! Port abstraction for user persistence adapters and their errors.
//!
//! The store owns durable user state: it assigns identifiers on insert and
//! enforces email uniqueness. Adapters report a uniqueness clash as
//! [`UserPersistenceError::DuplicateEmail`] so the service can surface it as a
//! validation failure.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the email address.
        DuplicateEmail { email: String } => "email address already registered: {email}",
    }
}

/// Driven port over the user collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return every stored user, oldest first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Persist a new user, returning it with its store-assigned identifier.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Write back an existing user and return the stored record.
    async fn save(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Remove a user, returning the deleted record when one matched.
    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
