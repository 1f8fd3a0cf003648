use color_eyre::Result;
use sqlx::{migrate::MigrateDatabase, query, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use tracing::{debug, error, info};

use crate::config::AppConfig;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS teachers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        contact_phone TEXT,
        specialization TEXT NOT NULL DEFAULT '',
        photo_url TEXT
    )",
    "CREATE TABLE IF NOT EXISTS batches (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        batch_type TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        primary_teacher_id INTEGER REFERENCES teachers(id) ON DELETE SET NULL,
        secondary_teacher_id INTEGER REFERENCES teachers(id) ON DELETE SET NULL,
        room TEXT
    )",
    "CREATE TABLE IF NOT EXISTS students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        age INTEGER,
        gender TEXT,
        contact_phone TEXT,
        guardian_name TEXT,
        guardian_phone TEXT,
        address TEXT,
        aadhaar_number TEXT NOT NULL,
        course_enrolled TEXT NOT NULL DEFAULT 'coding',
        batch_id INTEGER REFERENCES batches(id) ON DELETE SET NULL,
        admission_date TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )",
    "CREATE TABLE IF NOT EXISTS attendance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        batch_id INTEGER REFERENCES batches(id) ON DELETE SET NULL,
        date TEXT NOT NULL,
        status TEXT NOT NULL,
        notes TEXT,
        marked_by TEXT,
        UNIQUE(student_id, date)
    )",
    "CREATE TABLE IF NOT EXISTS daily_reports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        task_type TEXT NOT NULL DEFAULT '',
        report_date TEXT NOT NULL,
        created_by TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )",
    "CREATE TABLE IF NOT EXISTS export_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL,
        file_name TEXT NOT NULL,
        record_count INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )",
];

/// Sets up the database by creating the necessary tables if they don't exist
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Creates a database connection pool for the configured database file
pub async fn create_database_pool(config: &AppConfig) -> Result<SqlitePool> {
    info!(url = %config.database_url, "initializing database");

    if let Some(parent) = config.database_path.parent() {
        if !parent.exists() {
            debug!(dir = %parent.display(), "creating database directory");
            std::fs::create_dir_all(parent).map_err(|e| {
                error!(error = %e, "failed to create database directory");
                color_eyre::eyre::eyre!("Failed to create database directory: {e}")
            })?;
        }
    }

    if config.database_path.exists() {
        std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.database_path)
            .map_err(|e| {
                error!(error = %e, "database file is not readable and writable");
                color_eyre::eyre::eyre!("Database file permission error: {e}")
            })?;
    }

    create_database_pool_with_url(&config.database_url)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to open database");
            color_eyre::eyre::eyre!("Failed to open SQLite database: {e}")
        })
}

/// Creates a database connection pool with a specified URL
pub async fn create_database_pool_with_url(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("database does not exist, creating it now");
        Sqlite::create_database(database_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA foreign_keys = ON;").await?;
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await?;

    setup_database(&pool).await?;
    info!("database schema ready");

    Ok(pool)
}

/// Single-connection in-memory database with the full schema
#[cfg(test)]
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA foreign_keys = ON;").await?;
                Ok(())
            })
        })
        .connect("sqlite::memory:")
        .await?;

    setup_database(&pool).await?;
    Ok(pool)
}
