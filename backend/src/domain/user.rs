//! User data model.
//!
//! A user is created exactly once through registration and never mutated
//! afterwards. The value types here carry the only two rules a user record
//! must satisfy: a non-empty name and an email inside the accepted domain.

use std::fmt;

/// The only email domain accepted for registration. Matched as a literal,
/// case-sensitive suffix.
pub const ALLOWED_EMAIL_DOMAIN: &str = "@test.com";

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmailDomainNotAllowed,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmailDomainNotAllowed => {
                write!(f, "Email must be from {ALLOWED_EMAIL_DOMAIN} domain")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Storage-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier handed out by storage.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User name; any non-empty text, whitespace included. Stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    ///
    /// # Examples
    /// ```
    /// use roster::domain::{UserName, UserValidationError};
    ///
    /// assert!(UserName::new("Ada").is_ok());
    /// assert!(UserName::new("  ").is_ok());
    /// assert_eq!(UserName::new(""), Err(UserValidationError::EmptyName));
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

/// Email address inside [`ALLOWED_EMAIL_DOMAIN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// # Examples
    /// ```
    /// use roster::domain::{EmailAddress, UserValidationError};
    ///
    /// assert!(EmailAddress::new("ada@test.com").is_ok());
    /// assert_eq!(
    ///     EmailAddress::new("ada@TEST.com"),
    ///     Err(UserValidationError::EmailDomainNotAllowed)
    /// );
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if !email.ends_with(ALLOWED_EMAIL_DOMAIN) {
            return Err(UserValidationError::EmailDomainNotAllowed);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// A validated user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: UserName,
    email: EmailAddress,
}

impl NewUser {
    /// Build a draft from already validated parts.
    #[must_use]
    pub fn new(name: UserName, email: EmailAddress) -> Self {
        Self { name, email }
    }

    /// Validate raw strings and build a draft.
    ///
    /// The name is checked first, so a request with both an empty name and a
    /// foreign email reports [`UserValidationError::EmptyName`].
    pub fn try_from_parts(name: &str, email: &str) -> Result<Self, UserValidationError> {
        Ok(Self::new(UserName::new(name)?, EmailAddress::new(email)?))
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
}

impl User {
    /// Build a user from its stored state.
    #[must_use]
    pub fn new(id: UserId, name: UserName, email: EmailAddress) -> Self {
        Self { id, name, email }
    }

    /// Attach a storage identifier to a draft.
    #[must_use]
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        let NewUser { name, email } = new_user;
        Self { id, name, email }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}
