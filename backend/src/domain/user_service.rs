//! User domain service.
//!
//! Implements the [`UsersQuery`] and [`UsersCommand`] driving ports on top of
//! a [`UserRepository`]. Input validation happens here; email uniqueness is
//! left to the store and reported back as a validation failure.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    CreateUserRequest, UpdateEmailRequest, UserPersistenceError, UserRepository, UsersCommand,
    UsersQuery,
};
use crate::domain::{EmailAddress, Error, NewUser, User, UserId, UserValidationError};

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            debug!(%email, "rejected duplicate email");
            Error::invalid_request("email address already registered")
                .with_details(json!({ "field": "email", "code": "duplicate_email" }))
        }
    }
}

/// Map a field validation failure to an `InvalidRequest` error.
pub fn map_validation_error(error: UserValidationError) -> Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": error.field(), "code": error.code() }))
}

/// User service implementing the user driving ports.
pub struct UserService<R: ?Sized> {
    user_repo: Arc<R>,
}

impl<R: ?Sized> UserService<R> {
    /// Create a new service over the user repository.
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }
}

impl<R: ?Sized> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            user_repo: Arc::clone(&self.user_repo),
        }
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.user_repo.list().await.map_err(map_repository_error)
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        let CreateUserRequest { name, email } = request;
        let draft = NewUser::try_from_strings(name.unwrap_or_default(), email.unwrap_or_default())
            .map_err(map_validation_error)?;

        self.user_repo
            .insert(&draft)
            .await
            .map_err(map_repository_error)
    }

    async fn update_email(&self, id: &UserId, request: UpdateEmailRequest) -> Result<User, Error> {
        let mut user = self
            .user_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("user {id} not found"))
                    .with_details(json!({ "field": "userId", "code": "not_found" }))
            })?;

        let email = EmailAddress::new(request.email.unwrap_or_default())
            .map_err(map_validation_error)?;
        user.set_email(email);

        self.user_repo
            .save(&user)
            .await
            .map_err(map_repository_error)
    }

    async fn delete_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.user_repo
            .delete_by_id(id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
