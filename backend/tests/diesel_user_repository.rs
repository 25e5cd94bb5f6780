//! Integration tests for `DieselUserRepository` against a SQLite file.
//!
//! Each test gets its own temporary directory, so databases never leak
//! between tests and can run in parallel.

use std::path::PathBuf;

use diesel::prelude::*;
use diesel::sql_types::BigInt;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use roster::domain::NewUser;
use roster::domain::ports::{UserPersistenceError, UserRepository};
use roster::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, sync_schema};

struct TestDatabase {
    _dir: TempDir,
    path: PathBuf,
}

impl TestDatabase {
    fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    async fn repository(&self) -> DieselUserRepository {
        sync_schema(&self.url()).expect("schema sync succeeds");
        let pool = DbPool::new(PoolConfig::new(self.url()).with_max_size(2))
            .await
            .expect("pool builds");
        DieselUserRepository::new(pool)
    }

    fn count_users(&self) -> i64 {
        #[derive(QueryableByName)]
        struct Count {
            #[diesel(sql_type = BigInt)]
            count: i64,
        }

        let mut conn = SqliteConnection::establish(&self.url()).expect("open database");
        diesel::sql_query("SELECT COUNT(*) AS count FROM users")
            .get_result::<Count>(&mut conn)
            .expect("count users")
            .count
    }
}

#[fixture]
fn database() -> TestDatabase {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("data").join("database.db");
    TestDatabase { _dir: dir, path }
}

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser::try_from_parts(name, email).expect("valid user")
}

#[rstest]
#[tokio::test]
async fn create_returns_stored_user_with_assigned_id(database: TestDatabase) {
    let repository = database.repository().await;

    let user = repository
        .create(&new_user("Ada Lovelace", "ada@test.com"))
        .await
        .expect("insert succeeds");

    assert!(user.id().as_i32() > 0);
    assert_eq!(user.name().as_ref(), "Ada Lovelace");
    assert_eq!(user.email().as_ref(), "ada@test.com");
    assert_eq!(database.count_users(), 1);
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_reported_and_not_written(database: TestDatabase) {
    let repository = database.repository().await;
    repository
        .create(&new_user("Ada", "ada@test.com"))
        .await
        .expect("first insert succeeds");

    let err = repository
        .create(&new_user("Someone Else", "ada@test.com"))
        .await
        .expect_err("second insert conflicts");

    assert_eq!(err, UserPersistenceError::duplicate_email("ada@test.com"));
    assert_eq!(database.count_users(), 1);
}

#[rstest]
#[tokio::test]
async fn distinct_emails_receive_distinct_ids(database: TestDatabase) {
    let repository = database.repository().await;

    let first = repository
        .create(&new_user("Same Name", "one@test.com"))
        .await
        .expect("first insert");
    let second = repository
        .create(&new_user("Same Name", "two@test.com"))
        .await
        .expect("second insert");

    assert_ne!(first.id(), second.id());
    assert_eq!(database.count_users(), 2);
}

#[rstest]
#[tokio::test]
async fn schema_sync_is_idempotent_and_keeps_rows(database: TestDatabase) {
    let repository = database.repository().await;
    repository
        .create(&new_user("Ada", "ada@test.com"))
        .await
        .expect("insert succeeds");

    sync_schema(&database.url()).expect("second sync succeeds");
    sync_schema(&database.url()).expect("third sync succeeds");

    assert_eq!(database.count_users(), 1);
}
