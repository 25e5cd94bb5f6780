//! Root status endpoint.

use actix_web::{HttpResponse, get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::envelope::Envelope;

/// Payload of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceStatus {
    #[schema(example = "ok")]
    pub status: String,
}

impl ServiceStatus {
    fn ok() -> Self {
        Self {
            status: "ok".to_owned(),
        }
    }
}

/// Report that the service is up.
///
/// Always answers `200` and touches no dependencies.
#[utoipa::path(
    get,
    path = "/",
    tags = ["health"],
    responses(
        (status = 200, description = "Service is running", body = Envelope<ServiceStatus>)
    ),
    operation_id = "root"
)]
#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(Envelope::ok(ServiceStatus::ok()))
}
