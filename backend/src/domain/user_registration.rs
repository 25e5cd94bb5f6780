//! User registration use-case.
//!
//! Applies the business rules to a shape-checked request and, only when they
//! pass, hands the draft to the repository. Rejections never reach storage.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    UserPersistenceError, UserRegistrationCommand, UserRegistrationRequest, UserRepository,
};
use crate::domain::{Error, NewUser, User, UserValidationError};

/// Message returned when the email is already registered.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already registered";

/// Registration service backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UserRegistrationService {
    repository: Arc<dyn UserRepository>,
}

impl UserRegistrationService {
    /// Create a service storing users in `repository`.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

fn map_validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

fn map_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::DuplicateEmail { email } => {
            debug!(%email, "registration rejected: duplicate email");
            Error::conflict(DUPLICATE_EMAIL_MESSAGE)
        }
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::service_unavailable(message)
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(message)
        }
    }
}

#[async_trait]
impl UserRegistrationCommand for UserRegistrationService {
    async fn register(&self, request: UserRegistrationRequest) -> Result<User, Error> {
        let draft = NewUser::try_from_parts(&request.name, &request.email).map_err(|err| {
            warn!(email = %request.email, reason = %err, "registration rejected");
            map_validation_error(err)
        })?;

        self.repository
            .create(&draft)
            .await
            .map_err(map_persistence_error)
    }
}
