use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::{AppError, AppResult};

pub fn get_base_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".lawpilot")
}

pub fn get_db_path() -> PathBuf {
    get_base_dir().join("chat_history.db")
}

pub fn init_db(path: &Path) -> AppResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)
        .map_err(|e| AppError::Database(format!("Failed to open database: {e}")))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .map_err(|e| AppError::Database(format!("Failed to set pragmas: {e}")))?;

    prepare(&conn)?;
    log::debug!("Database ready at {}", path.display());
    Ok(conn)
}

/// Same schema as [`init_db`], nothing written to disk.
pub fn init_in_memory() -> AppResult<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(|e| AppError::Database(format!("Failed to open in-memory database: {e}")))?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> AppResult<()> {
    // Create migration tracking table
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );"
    )
    .map_err(|e| AppError::Database(format!("Failed to create migrations table: {e}")))?;

    run_migrations(conn)
}

fn run_migrations(conn: &Connection) -> AppResult<()> {
    let migrations: Vec<(&str, &str)> = vec![
        ("001_chat_history", include_str!("../../migrations/001_chat_history.sql")),
    ];

    for (name, sql) in migrations {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                rusqlite::params![name],
                |row| row.get(0),
            )
            .map_err(|e| AppError::Database(format!("Failed to check migration '{name}': {e}")))?;

        if !already_applied {
            conn.execute_batch(sql)
                .map_err(|e| AppError::Database(format!("Migration '{name}' failed: {e}")))?;

            conn.execute(
                "INSERT INTO _migrations (name) VALUES (?1)",
                rusqlite::params![name],
            )
            .map_err(|e| AppError::Database(format!("Failed to record migration '{name}': {e}")))?;

            log::info!("Applied migration: {}", name);
        }
    }

    Ok(())
}
