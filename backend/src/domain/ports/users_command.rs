//! Driving port for user mutations.

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, User, UserId};

/// Raw creation request as received from a client.
///
/// Fields stay optional so a missing field surfaces as the same validation
/// failure as a blank one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Requested name.
    #[schema(example = "Ada")]
    pub name: Option<String>,
    /// Requested email address.
    #[schema(example = "ada@x.com")]
    pub email: Option<String>,
}

/// Raw email update request as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct UpdateEmailRequest {
    /// Replacement email address.
    #[schema(example = "ada2@x.com")]
    pub email: Option<String>,
}

/// Domain use-case port for creating, updating and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate and store a new user.
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error>;

    /// Replace the email of an existing user.
    async fn update_email(&self, id: &UserId, request: UpdateEmailRequest) -> Result<User, Error>;

    /// Delete a user, returning the removed record when one matched.
    async fn delete_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
