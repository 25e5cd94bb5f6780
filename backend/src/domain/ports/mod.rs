//! Domain ports and supporting types for the hexagonal boundary.

mod user_registration_command;
mod user_repository;

pub use user_registration_command::{UserRegistrationCommand, UserRegistrationRequest};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
