//! Users API handlers.
//!
//! ```text
//! POST /users {"name":"Ada","email":"ada@test.com"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::User;
use crate::domain::ports::UserRegistrationRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, ErrorDetail, ValidationFailure};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, FieldViolation, ShapeCheck, ValidatedJson, non_empty, required_string,
};

const NAME: FieldName = FieldName::new("name");
const EMAIL: FieldName = FieldName::new("email");

/// Request body for `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserCreate {
    #[schema(example = "Ada Lovelace", min_length = 1)]
    pub name: String,
    #[schema(example = "ada@test.com")]
    pub email: String,
}

impl ShapeCheck for UserCreate {
    fn from_json(body: Value) -> Result<Self, Vec<FieldViolation>> {
        let Value::Object(object) = body else {
            return Err(vec![FieldViolation::not_an_object(body)]);
        };

        let name = required_string(&object, NAME).and_then(|name| non_empty(name, NAME));
        let email = required_string(&object, EMAIL);

        match (name, email) {
            (Ok(name), Ok(email)) => Ok(Self { name, email }),
            (name, email) => Err(name.err().into_iter().chain(email.err()).collect()),
        }
    }
}

impl From<UserCreate> for UserRegistrationRequest {
    fn from(value: UserCreate) -> Self {
        Self {
            name: value.name,
            email: value.email,
        }
    }
}

/// Response payload for a created user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserCreated {
    pub name: String,
    pub email: String,
}

impl From<User> for UserCreated {
    fn from(user: User) -> Self {
        Self {
            name: user.name().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
        }
    }
}

/// Register a user.
///
/// Shape failures never reach this handler; they are rendered by the
/// application-wide validation handler.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = Envelope<UserCreated>),
        (status = 400, description = "Email domain not allowed", body = ErrorDetail),
        (status = 409, description = "Email already registered", body = ErrorDetail),
        (status = 422, description = "Validation failed", body = ValidationFailure),
        (status = 500, description = "Internal server error", body = ErrorDetail),
        (status = 503, description = "Storage unavailable", body = ErrorDetail)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: ValidatedJson<UserCreate>,
) -> ApiResult<HttpResponse> {
    let user = state.users.register(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(Envelope::ok(UserCreated::from(user))))
}

#[cfg(test)]
mod tests;
