//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer and the
//! envelope schemas they return. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::envelope::{ErrorDetail, ValidationFailure};
use crate::inbound::http::health::ServiceStatus;
use crate::inbound::http::users::{UserCreate, UserCreated};
use crate::inbound::http::validation::{FieldViolation, ViolationKind};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster API",
        description = "User registration backed by SQLite."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::root,
        crate::inbound::http::users::create_user,
    ),
    components(schemas(
        ServiceStatus,
        UserCreate,
        UserCreated,
        ErrorDetail,
        ValidationFailure,
        FieldViolation,
        ViolationKind
    )),
    tags(
        (name = "users", description = "Operations related to users"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;
