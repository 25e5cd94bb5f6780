//! Driving port for the user registration use-case.
//!
//! Inbound adapters hand over a shape-checked request and get back either the
//! stored user or a domain [`Error`]; they never see persistence types.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// A registration request whose fields are known to be present strings.
///
/// Business rules have not been applied yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistrationRequest {
    pub name: String,
    pub email: String,
}

/// Domain use-case port for registering users.
#[async_trait]
pub trait UserRegistrationCommand: Send + Sync {
    /// Apply business rules and persist the user.
    async fn register(&self, request: UserRegistrationRequest) -> Result<User, Error>;
}
