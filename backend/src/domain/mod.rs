//! Domain primitives, ports and use-cases.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, independent of HTTP and of the database driver.
//!
//! Public surface:
//! - Error / ErrorCode — transport agnostic failure payload.
//! - TraceId — request-scoped correlation identifier.
//! - User, NewUser, UserName, EmailAddress, UserId — the user model.
//! - UserRegistrationService — the registration use-case.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_registration;

pub use self::error::{Error, ErrorCode};
pub use self::trace_id::TraceId;
pub use self::user::{
    ALLOWED_EMAIL_DOMAIN, EmailAddress, NewUser, User, UserId, UserName, UserValidationError,
};
pub use self::user_registration::{DUPLICATE_EMAIL_MESSAGE, UserRegistrationService};

/// HTTP header carrying the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
