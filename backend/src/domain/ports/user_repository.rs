//! Driven port for user persistence adapters and their errors.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewUser, User, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// Another user already holds this email address.
    #[error("email already registered: {email}")]
    DuplicateEmail { email: String },
}

impl UserPersistenceError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Storage for registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return its stored state, including the assigned id.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email is
    /// already taken; nothing is written in that case.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;
}

/// In-memory repository used when no database is wired, and by HTTP tests.
///
/// Mirrors the storage contract: identifiers start at 1 and increase, and the
/// email column is unique.
#[derive(Debug, Default)]
pub struct FixtureUserRepository {
    users: Mutex<Vec<User>>,
}

impl FixtureUserRepository {
    /// Snapshot of every stored user, in insertion order.
    pub fn users(&self) -> Vec<User> {
        self.users
            .lock()
            .map(|users| users.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| UserPersistenceError::connection("fixture store poisoned"))?;

        if users.iter().any(|stored| stored.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }

        let next_id = users
            .iter()
            .map(|stored| stored.id().as_i32())
            .max()
            .unwrap_or(0)
            + 1;
        let stored = User::from_new(UserId::new(next_id), user.clone());
        users.push(stored.clone());
        Ok(stored)
    }
}
