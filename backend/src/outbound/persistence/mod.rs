//! SQLite persistence adapters using Diesel ORM.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel rows and domain types. Business rules live in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Pooling**: `bb8` over `diesel-async`'s sync connection wrapper.
//! - **Schema sync**: embedded migrations applied once at startup.
//!
//! # Example
//!
//! ```no_run
//! use roster::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, sync_schema};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! sync_schema("./database.db")?;
//! let pool = DbPool::new(PoolConfig::new("./database.db")).await?;
//! let repository = DieselUserRepository::new(pool);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod diesel_user_repository;
mod models;
mod pool;
mod schema;
mod schema_sync;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError, SqliteAsyncConnection};
pub use schema_sync::{MIGRATIONS, SchemaSyncError, sync_schema, sync_schema_blocking};
