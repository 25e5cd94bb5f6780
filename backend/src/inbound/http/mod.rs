//! HTTP inbound adapter exposing REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod state;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the JSON configuration and every endpoint on an application.
///
/// Callers supply [`state::HttpState`] as app data and wrap the app in
/// [`crate::Trace`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use roster::Trace;
/// use roster::domain::UserRegistrationService;
/// use roster::domain::ports::FixtureUserRepository;
/// use roster::inbound::http::{configure, state::HttpState};
///
/// let service = UserRegistrationService::new(Arc::new(FixtureUserRepository::default()));
/// let app = App::new()
///     .app_data(web::Data::new(HttpState::new(Arc::new(service))))
///     .wrap(Trace)
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .service(health::root)
        .service(users::create_user);
}
