//! In-memory `UserRepository` used for local runs without PostgreSQL and for
//! HTTP tests.
//!
//! Mirrors the PostgreSQL adapter's contract: the repository assigns ids,
//! rejects duplicate emails, and lists users in insertion order.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId};

/// User repository holding records in process memory.
///
/// # Example
///
/// ```
/// use users_api::domain::NewUser;
/// use users_api::domain::ports::UserRepository;
/// use users_api::outbound::persistence::InMemoryUserRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = InMemoryUserRepository::new();
/// let draft = NewUser::try_from_strings("Ada", "ada@x.com").expect("valid draft");
/// let user = repo.insert(&draft).await.expect("insert succeeds");
/// assert_eq!(repo.find_by_id(user.id()).await.expect("lookup"), Some(user));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &[User], email: &str, except: Option<&UserId>) -> bool {
    users
        .iter()
        .any(|user| user.email().as_ref() == email && Some(user.id()) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().await;
        if email_taken(&users, user.email().as_ref(), None) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        let stored = user.clone().into_user(UserId::random());
        users.push(stored.clone());
        Ok(stored)
    }

    async fn save(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().await;
        if email_taken(&users, user.email().as_ref(), Some(user.id())) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        let slot = users
            .iter_mut()
            .find(|existing| existing.id() == user.id())
            .ok_or_else(|| UserPersistenceError::query("record not found"))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.users.write().await;
        let position = users.iter().position(|user| user.id() == id);
        Ok(position.map(|index| users.remove(index)))
    }
}
