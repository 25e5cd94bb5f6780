//! Request shape validation.
//!
//! Every JSON body goes through two checks before a handler runs:
//!
//! 1. decoding, via the application-wide [`json_config`] whose error handler
//!    turns any decode failure into a [`RequestValidationError`];
//! 2. field shape, via the [`ValidatedJson`] extractor and the type's
//!    [`ShapeCheck`] implementation, which reports every violated field at
//!    once.
//!
//! Both paths render the same `422` envelope, so handlers only ever receive
//! payloads of the expected shape.

use std::fmt;

use actix_web::dev::Payload;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;
use utoipa::ToSchema;

use super::envelope::ValidationFailure;

/// Top-level message of every shape-validation failure.
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Largest JSON body accepted, in bytes.
pub const JSON_LIMIT_BYTES: usize = 64 * 1024;

/// Machine-readable category of a [`FieldViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The body is not valid JSON, or could not be read as JSON.
    JsonInvalid,
    /// The body is JSON but not an object.
    ModelAttributesType,
    /// A required field is absent.
    Missing,
    /// A field is present but not a string.
    StringType,
    /// A string field is empty.
    StringTooShort,
}

/// Newtype wrapper for request field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldName(&'static str);

impl FieldName {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A single shape violation.
///
/// `loc` is the path to the offending value, starting at `"body"`; `input` is
/// the value that failed (the whole object when a field is missing).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldViolation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub loc: Vec<String>,
    #[schema(example = "Field required")]
    pub msg: String,
    #[schema(value_type = Object)]
    pub input: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub ctx: Option<Value>,
}

impl FieldViolation {
    fn new(kind: ViolationKind, loc: Vec<String>, msg: &str, input: Value) -> Self {
        Self {
            kind,
            loc,
            msg: msg.to_owned(),
            input,
            ctx: None,
        }
    }

    fn body_loc() -> Vec<String> {
        vec!["body".to_owned()]
    }

    fn field_loc(field: FieldName) -> Vec<String> {
        vec!["body".to_owned(), field.as_str().to_owned()]
    }

    /// The body could not be decoded as JSON.
    pub fn json_invalid(reason: impl fmt::Display) -> Self {
        let mut violation = Self::new(
            ViolationKind::JsonInvalid,
            Self::body_loc(),
            "JSON decode error",
            Value::Object(Map::new()),
        );
        violation.ctx = Some(json!({ "error": reason.to_string() }));
        violation
    }

    /// The body decoded to something other than an object.
    pub fn not_an_object(input: Value) -> Self {
        Self::new(
            ViolationKind::ModelAttributesType,
            Self::body_loc(),
            "Input should be a valid dictionary or object to extract fields from",
            input,
        )
    }

    /// `field` is absent from `object`.
    pub fn missing(field: FieldName, object: Value) -> Self {
        Self::new(
            ViolationKind::Missing,
            Self::field_loc(field),
            "Field required",
            object,
        )
    }

    /// `field` holds `input`, which is not a string.
    pub fn not_a_string(field: FieldName, input: Value) -> Self {
        Self::new(
            ViolationKind::StringType,
            Self::field_loc(field),
            "Input should be a valid string",
            input,
        )
    }

    /// The request carried no body at all.
    pub fn missing_body() -> Self {
        Self::new(
            ViolationKind::Missing,
            Self::body_loc(),
            "Field required",
            Value::Null,
        )
    }

    /// `field` holds an empty string.
    pub fn too_short(field: FieldName, input: Value) -> Self {
        let mut violation = Self::new(
            ViolationKind::StringTooShort,
            Self::field_loc(field),
            "String should have at least 1 character",
            input,
        );
        violation.ctx = Some(json!({ "min_length": 1 }));
        violation
    }
}

/// A request body failed shape validation; rendered as `422`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestValidationError {
    errors: Vec<FieldViolation>,
}

impl RequestValidationError {
    /// Build an error from the collected violations.
    pub fn new(errors: Vec<FieldViolation>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldViolation] {
        &self.errors
    }
}

impl fmt::Display for RequestValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{VALIDATION_FAILED_MESSAGE}: {} violation(s)",
            self.errors.len()
        )
    }
}

impl std::error::Error for RequestValidationError {}

impl ResponseError for RequestValidationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ValidationFailure {
            success: false,
            message: VALIDATION_FAILED_MESSAGE.to_owned(),
            errors: self.errors.clone(),
        })
    }
}

/// An empty payload fails to decode at the very first byte.
fn is_empty_body(err: &JsonPayloadError) -> bool {
    matches!(err, JsonPayloadError::Deserialize(inner) if inner.is_eof() && inner.column() == 0)
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = %req.path(), "request body could not be decoded");
    let violation = if is_empty_body(&err) {
        FieldViolation::missing_body()
    } else {
        FieldViolation::json_invalid(&err)
    };
    RequestValidationError::new(vec![violation]).into()
}

/// Application-wide JSON extractor configuration.
///
/// Register once on the `App`; every `web::Json` and [`ValidatedJson`]
/// extractor then reports decode failures through the `422` envelope.
/// Bodies without a `Content-Type` header are decoded as JSON; an explicit
/// non-JSON type is still rejected.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .content_type_required(false)
        .error_handler(json_error_handler)
}

/// Types that can be built from an arbitrary JSON value after checking its
/// shape.
pub trait ShapeCheck: Sized {
    /// Build `Self` or return every violation found.
    fn from_json(body: Value) -> Result<Self, Vec<FieldViolation>>;
}

/// Read `field` from `object` as a string.
///
/// `object` is only cloned on the failure path, for the violation's `input`.
pub fn required_string(
    object: &Map<String, Value>,
    field: FieldName,
) -> Result<String, FieldViolation> {
    match object.get(field.as_str()) {
        None => Err(FieldViolation::missing(field, Value::Object(object.clone()))),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(FieldViolation::not_a_string(field, other.clone())),
    }
}

/// Reject empty strings; whitespace counts as content.
pub fn non_empty(value: String, field: FieldName) -> Result<String, FieldViolation> {
    if value.is_empty() {
        return Err(FieldViolation::too_short(field, Value::String(value)));
    }
    Ok(value)
}

/// JSON extractor that runs [`ShapeCheck`] before the handler.
///
/// # Examples
/// ```
/// use actix_web::{HttpResponse, post};
/// use roster::inbound::http::users::UserCreate;
/// use roster::inbound::http::validation::ValidatedJson;
///
/// #[post("/echo")]
/// async fn echo(payload: ValidatedJson<UserCreate>) -> HttpResponse {
///     HttpResponse::Ok().body(payload.into_inner().name)
/// }
/// ```
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    /// Unwrap the validated payload.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: ShapeCheck + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);
        Box::pin(async move {
            let web::Json(body) = body.await?;
            T::from_json(body)
                .map(ValidatedJson)
                .map_err(|errors| RequestValidationError::new(errors).into())
        })
    }
}
