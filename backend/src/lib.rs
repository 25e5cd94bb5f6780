//! Roster service library: a user registration API over SQLite.
//!
//! Layout follows ports and adapters:
//! - [`domain`]: entities, business rules, ports and the registration use-case;
//! - [`inbound`]: the actix-web HTTP adapter;
//! - [`outbound`]: the Diesel persistence adapter;
//! - [`middleware`]: trace correlation and access logging.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI.
pub use doc::ApiDoc;
pub use middleware::Trace;
