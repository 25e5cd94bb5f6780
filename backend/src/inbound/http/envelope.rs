//! JSON envelopes shared by every response.
//!
//! Successful responses wrap their payload as `{"success": true, "data": …}`.
//! Shape-validation failures use `{"success": false, "message", "errors"}`
//! (see [`super::validation`]); business-rule and storage failures use the
//! bare `{"detail": …}` body produced by [`super::error`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::FieldViolation;

/// Successful response envelope.
///
/// # Examples
/// ```
/// use roster::inbound::http::envelope::Envelope;
/// use serde_json::json;
///
/// let body = serde_json::to_value(Envelope::ok(json!({ "status": "ok" }))).unwrap();
/// assert_eq!(body, json!({ "success": true, "data": { "status": "ok" } }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    /// Always `true`.
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap `data` in a successful envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope returned for shape-validation errors.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValidationFailure {
    /// Always `false`.
    pub success: bool,
    #[schema(example = "Validation failed")]
    pub message: String,
    /// One entry per violated field.
    pub errors: Vec<FieldViolation>,
}

/// Body returned for business-rule, conflict and server errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    #[schema(example = "Email must be from @test.com domain")]
    pub detail: String,
}
