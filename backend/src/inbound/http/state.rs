//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::UserRegistrationCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRegistrationCommand>,
}

impl HttpState {
    /// Bundle the ports handlers depend on.
    pub fn new(users: Arc<dyn UserRegistrationCommand>) -> Self {
        Self { users }
    }
}
