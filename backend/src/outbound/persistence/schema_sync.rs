//! Startup schema synchronisation.
//!
//! Runs the embedded Diesel migrations against the database file before the
//! server binds its listener. The migrations only use `IF NOT EXISTS` DDL and
//! Diesel records what it has applied, so running this on every start is a
//! no-op once the schema is in place.

use std::path::Path;

use diesel::Connection;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations from `backend/migrations`, compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures that prevent the schema from being brought up to date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaSyncError {
    /// The directory holding the database file could not be created.
    #[error("failed to create database directory {path}: {message}")]
    Directory { path: String, message: String },
    /// The database file could not be opened.
    #[error("failed to open database {database_url}: {message}")]
    Connection {
        database_url: String,
        message: String,
    },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Migration { message: String },
}

fn ensure_parent_dir(database_url: &str) -> Result<(), SchemaSyncError> {
    let Some(parent) = Path::new(database_url).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SchemaSyncError::Directory {
        path: parent.display().to_string(),
        message: err.to_string(),
    })
}

/// Bring the schema of the SQLite file at `database_url` up to date.
///
/// Blocks on file I/O; call from a blocking context or through
/// [`sync_schema_blocking`].
///
/// # Errors
///
/// Returns [`SchemaSyncError`] when the file cannot be created or opened, or
/// when a migration fails.
pub fn sync_schema(database_url: &str) -> Result<(), SchemaSyncError> {
    ensure_parent_dir(database_url)?;

    let mut connection =
        SqliteConnection::establish(database_url).map_err(|err| SchemaSyncError::Connection {
            database_url: database_url.to_owned(),
            message: err.to_string(),
        })?;

    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| SchemaSyncError::Migration {
            message: err.to_string(),
        })?;

    info!(
        database = %database_url,
        applied = applied.len(),
        "database schema in sync"
    );
    Ok(())
}

/// Run [`sync_schema`] on Tokio's blocking pool.
///
/// # Errors
///
/// Propagates [`SchemaSyncError`]; a panicked worker is reported as a
/// migration failure.
pub async fn sync_schema_blocking(database_url: String) -> Result<(), SchemaSyncError> {
    tokio::task::spawn_blocking(move || sync_schema(&database_url))
        .await
        .map_err(|err| SchemaSyncError::Migration {
            message: err.to_string(),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn creates_missing_parent_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("data").join("users.db");

        sync_schema(&path.to_string_lossy()).expect("schema sync succeeds");

        assert!(path.exists());
    }

    #[rstest]
    fn unopenable_location_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").expect("write blocker file");
        let path = blocker.join("users.db");

        let err = sync_schema(&path.to_string_lossy()).expect_err("sync fails");

        assert!(matches!(err, SchemaSyncError::Directory { .. }), "{err:?}");
    }
}
