//! Idempotent, self-healing schema bootstrap.
//!
//! Runs once per process start, before the listener binds. Converges the
//! database to the expected schema regardless of how many partial or
//! complete runs came before it, and seeds a single default administrator
//! on a fresh database. Nothing in here may abort server startup: every
//! failure is classified, logged and skipped.

use anyhow::Result;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use tracing::{debug, error, info, warn};

use crate::config::SecurityConfig;
use crate::db::Store;

const SCHEMA_SQL: &str = include_str!("schema.sql");

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Well-known seed password; rotate it immediately after first deployment.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Additive column migrations, run on every start in this order. Each one
/// only adds, never drops or renames, so re-running is always safe.
const COLUMN_MIGRATIONS: &[(&str, &str, &str)] = &[
    ("courses", "course_link", "TEXT"),
    ("courses", "category", "VARCHAR(100)"),
    ("courses", "course_type", "VARCHAR(50)"),
];

/// Closed classification of schema-statement failures, so the tolerance
/// logic below never has to reason about driver-specific message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// The target object already exists; treated as success.
    AlreadyExists,
    /// A connection/lock-class failure that a later run may not hit.
    Transient,
    /// Anything else.
    Fatal,
}

/// Map a driver error to a [`SchemaOutcome`]. Covers the sqlite and
/// postgres spellings of the duplicate-object class (postgres reports
/// SQLSTATE 42P07/42710/42701 for duplicate table/object/column).
#[must_use]
pub fn classify_schema_error(err: &DbErr) -> SchemaOutcome {
    let msg = err.to_string();

    if msg.contains("already exists")
        || msg.contains("duplicate column")
        || msg.contains("42P07")
        || msg.contains("42710")
        || msg.contains("42701")
    {
        SchemaOutcome::AlreadyExists
    } else if msg.contains("timed out")
        || msg.contains("connection")
        || msg.contains("database is locked")
    {
        SchemaOutcome::Transient
    } else {
        SchemaOutcome::Fatal
    }
}

/// Best-effort top level: an unexpected error is logged and swallowed so
/// the server still starts. Persistent schema drift shows up in the logs,
/// not as a refused boot.
pub async fn auto_initialize(store: &Store, security: &SecurityConfig) {
    if let Err(e) = initialize(store, security).await {
        error!("Database bootstrap failed: {e:#}; continuing startup anyway");
    }
}

async fn initialize(store: &Store, security: &SecurityConfig) -> Result<()> {
    let conn = &store.conn;

    let initialized = accounts_table_exists(conn).await.unwrap_or_else(|e| {
        warn!("Could not check schema state: {e}; assuming uninitialized");
        false
    });

    if initialized {
        debug!("Database already initialized, converging schema");
    } else {
        info!("Initializing database schema");
    }

    // The script is already-exists tolerant and the seed is
    // insert-if-absent, so both run on every boot; a table added to the
    // script after a deployment still gets created on the next start.
    apply_schema(conn).await;
    seed_default_admin(store, security).await?;

    run_column_migrations(conn).await;

    Ok(())
}

/// One catalog query gates the heavy path.
async fn accounts_table_exists(conn: &DatabaseConnection) -> Result<bool, DbErr> {
    let backend = conn.get_database_backend();

    let sql = match backend {
        DatabaseBackend::Sqlite => {
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'accounts'"
        }
        DatabaseBackend::Postgres => {
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name = 'accounts'"
        }
        DatabaseBackend::MySql => {
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_name = 'accounts'"
        }
    };

    let row = conn
        .query_one(Statement::from_string(backend, sql.to_string()))
        .await?;

    Ok(row.is_some())
}

/// Execute the schema script one statement at a time. A failing statement
/// never blocks the rest of the script from being applied.
async fn apply_schema(conn: &DatabaseConnection) {
    let backend = conn.get_database_backend();

    for stmt in split_statements(SCHEMA_SQL) {
        let result = conn
            .execute(Statement::from_string(backend, stmt.clone()))
            .await;

        match result {
            Ok(_) => {}
            Err(e) => match classify_schema_error(&e) {
                SchemaOutcome::AlreadyExists => {
                    debug!("Schema object already exists, skipping statement");
                }
                SchemaOutcome::Transient | SchemaOutcome::Fatal => {
                    warn!("Schema statement failed: {e}");
                }
            },
        }
    }
}

/// Insert-if-absent semantics: a second run finds the username taken and
/// does nothing.
async fn seed_default_admin(store: &Store, security: &SecurityConfig) -> Result<()> {
    let created = store
        .create_account(
            DEFAULT_ADMIN_USERNAME,
            DEFAULT_ADMIN_PASSWORD,
            Some("admin@infinityx.com"),
            Some("Administrator"),
            security,
        )
        .await?;

    if created.is_some() {
        info!(
            "Seeded default admin account '{DEFAULT_ADMIN_USERNAME}'; \
             change its password immediately after first login"
        );
    }

    Ok(())
}

async fn run_column_migrations(conn: &DatabaseConnection) {
    let backend = conn.get_database_backend();

    for (table, column, column_type) in COLUMN_MIGRATIONS {
        let sql = format!("ALTER TABLE {table} ADD COLUMN {column} {column_type}");
        let result = conn.execute(Statement::from_string(backend, sql)).await;

        match result {
            Ok(_) => info!("Migration: added column {table}.{column}"),
            Err(e) => match classify_schema_error(&e) {
                SchemaOutcome::AlreadyExists => {
                    debug!("Migration: column {table}.{column} already present");
                }
                SchemaOutcome::Transient | SchemaOutcome::Fatal => {
                    warn!("Migration for {table}.{column} failed: {e}");
                }
            },
        }
    }
}

/// Split a schema script into standalone statements, dropping line comments
/// and blanks. No statement in the script may contain an embedded ';'
/// (which rules out trigger bodies; those would need a real migration tool).
fn split_statements(script: &str) -> Vec<String> {
    let without_comments: String = script
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
