//! Driving port for user reads.
//!
//! HTTP handlers use this port to fetch users without importing outbound
//! persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return every stored user.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Return the user with the given id, or `None` when no user matches.
    ///
    /// An absent user is a valid empty result, not an error.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
