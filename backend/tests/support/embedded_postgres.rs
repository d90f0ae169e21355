//! Shared embedded PostgreSQL helpers for integration tests.
//!
//! - Database creation uses `postgres` so Diesel transactions never wrap
//!   `CREATE DATABASE`.
//! - Schema setup runs the crate's embedded migrations once per migration
//!   hash into a template database; each test clones that template.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use questionnaire_backend::domain::ports::RepositoryError;
use questionnaire_backend::outbound::persistence::MIGRATIONS;
use uuid::Uuid;

use super::format_postgres_error;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "questionnaire_template";
const TEMPLATE_PROVISION_RETRIES: usize = 5;
const TEMPLATE_PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, RepositoryError> {
    let hash = hash_directory(migrations_dir())
        .map_err(|err| RepositoryError::query(format!("hash migrations: {err}")))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn new_test_database_name() -> String {
    format!("test_{}", Uuid::new_v4().simple())
}

fn provision_template_database_attempt(
    cluster: &ClusterHandle,
    attempt: usize,
) -> Result<TemporaryDatabase, RepositoryError> {
    let template_name = ensure_template_database(cluster).map_err(|error| {
        RepositoryError::query(format!(
            "template check: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error}"
        ))
    })?;
    let db_name = new_test_database_name();
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|error| {
            RepositoryError::query(format!(
                "create database from template: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error:?}"
            ))
        })
}

/// Creates or reuses a template database with the latest migrations applied.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, RepositoryError> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| RepositoryError::query(format!("template check: {err:?}")))?;

    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| RepositoryError::query(format!("create template: {err:?}")))?;

        let url = cluster.connection().database_url(&template_name);
        migrate_schema(&url)?;
    }

    Ok(template_name)
}

/// Provisions a temporary database cloned from the migration template.
pub fn provision_template_database(
    cluster: &ClusterHandle,
) -> Result<TemporaryDatabase, RepositoryError> {
    let mut last_error = None;
    for attempt in 1..=TEMPLATE_PROVISION_RETRIES {
        match provision_template_database_attempt(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(error) => last_error = Some(error),
        };
        if attempt < TEMPLATE_PROVISION_RETRIES {
            std::thread::sleep(TEMPLATE_PROVISION_RETRY_DELAY);
        }
    }

    Err(last_error.unwrap_or_else(|| {
        RepositoryError::query("create database from template: exhausted retries")
    }))
}

/// Runs all pending Diesel migrations against the test database.
pub fn migrate_schema(url: &str) -> Result<(), RepositoryError> {
    let mut conn = PgConnection::establish(url)
        .map_err(|err| RepositoryError::connection(format!("{err:?}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| RepositoryError::query(format!("migration: {err:?}")))?;
    Ok(())
}

/// Seeds a user row directly, bypassing the repositories and their audit.
pub fn insert_user(url: &str, username: &str, email: &str) -> Result<i32, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, 'hash') \
             RETURNING user_id",
            &[&username, &email],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

/// Counts rows in `table`, optionally restricted by a raw `WHERE` clause.
pub fn count_rows(url: &str, table: &str, predicate: Option<&str>) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let escaped = table.replace('"', "\"\"");
    let sql = match predicate {
        Some(clause) => format!(r#"SELECT COUNT(*) FROM "{escaped}" WHERE {clause}"#),
        None => format!(r#"SELECT COUNT(*) FROM "{escaped}""#),
    };
    let row = client
        .query_one(sql.as_str(), &[])
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}
