//! Diesel-backed implementation of the `UserRepository` port.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId, UserName};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// User repository storing rows in the SQLite `users` table.
///
/// Each call checks out its own pooled connection and returns it to the
/// pool when the call completes, on success and failure alike.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_insert_error(error: diesel::result::Error, email: &str) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::duplicate_email(email)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Convert a stored row back into a domain user.
///
/// Rows written by this service always satisfy the domain rules; a row that
/// does not was written out of band and is reported as a query failure.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow { id, name, email } = row;
    let name = UserName::new(name).map_err(|err| {
        UserPersistenceError::query(format!("invalid name stored for user {id}: {err}"))
    })?;
    let email = EmailAddress::new(email).map_err(|err| {
        UserPersistenceError::query(format!("invalid email stored for user {id}: {err}"))
    })?;
    Ok(User::new(UserId::new(id), name, email))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let email = user.email().as_ref();
        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                name: user.name().as_ref(),
                email,
            })
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, email))?;

        row_to_user(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("timed out"));

        assert!(matches!(repo_err, UserPersistenceError::Connection { .. }));
        assert!(repo_err.to_string().contains("timed out"));
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_email() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed: users.email".to_owned()),
        );

        let repo_err = map_insert_error(diesel_err, "ada@test.com");

        assert_eq!(
            repo_err,
            UserPersistenceError::duplicate_email("ada@test.com")
        );
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(DieselError::DatabaseError(
        DatabaseErrorKind::Unknown,
        Box::new("database is locked".to_owned()),
    ))]
    fn other_failures_map_to_query_error(#[case] diesel_err: DieselError) {
        let repo_err = map_insert_error(diesel_err, "ada@test.com");

        assert!(matches!(repo_err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn row_outside_allowed_domain_is_a_query_error() {
        let row = UserRow {
            id: 3,
            name: "Legacy".to_owned(),
            email: "legacy@elsewhere.org".to_owned(),
        };

        let err = row_to_user(row).expect_err("row is rejected");

        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
