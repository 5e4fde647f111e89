use rusqlite::params;

use crate::error::{AppError, AppResult};
use crate::models::message::{ChatRecord, Role};
use crate::state::AppState;
use crate::timestamps;

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ChatRecord> {
    Ok(ChatRecord {
        id: row.get(0)?,
        role: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        message: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        timestamp: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

/// Append one row stamped with the current IST time. Autocommit, so the row
/// is durable once this returns.
pub fn save_message(state: &AppState, role: Role, message: &str) -> AppResult<ChatRecord> {
    let timestamp = timestamps::now_ist_stamp();
    let db = state.db.lock().map_err(|e| AppError::Database(e.to_string()))?;
    db.execute(
        "INSERT INTO chat_history (role, message, timestamp) VALUES (?1, ?2, ?3)",
        params![role.as_str(), message, timestamp],
    )
    .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(ChatRecord {
        id: db.last_insert_rowid(),
        role: role.as_str().to_string(),
        message: message.to_string(),
        timestamp,
    })
}

/// The newest `limit` rows, oldest first.
pub fn list_recent(state: &AppState, limit: usize) -> AppResult<Vec<ChatRecord>> {
    let db = state.db.lock().map_err(|e| AppError::Database(e.to_string()))?;
    let mut stmt = db
        .prepare(
            "SELECT id, role, message, timestamp FROM (
                SELECT id, role, message, timestamp FROM chat_history ORDER BY id DESC LIMIT ?1
            ) ORDER BY id ASC",
        )
        .map_err(|e| AppError::Database(e.to_string()))?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let records = stmt
        .query_map(params![limit], |row| row_to_record(row))
        .map_err(|e| AppError::Database(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(records)
}

pub fn count(state: &AppState) -> AppResult<i64> {
    let db = state.db.lock().map_err(|e| AppError::Database(e.to_string()))?;
    db.query_row("SELECT COUNT(*) FROM chat_history", [], |row| row.get(0))
        .map_err(|e| AppError::Database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    fn test_state() -> AppState {
        AppState::new(migrations::init_in_memory().unwrap())
    }

    #[test]
    fn test_save_message_assigns_ids_and_ist_stamp() {
        let state = test_state();
        let first = save_message(&state, Role::User, "My landlord won't return my deposit").unwrap();
        let second = save_message(&state, Role::Assistant, "Here is what you can do").unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.role, "user");
        assert_eq!(second.role, "assistant");
        assert!(first.timestamp.ends_with("+0530"));
        assert!(second.timestamp >= first.timestamp);
        assert_eq!(count(&state).unwrap(), 2);
    }

    #[test]
    fn test_list_recent_returns_newest_in_order() {
        let state = test_state();
        for i in 0..5 {
            save_message(&state, Role::User, &format!("m{i}")).unwrap();
        }

        let recent = list_recent(&state, 3).unwrap();
        let bodies: Vec<_> = recent.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(bodies, vec!["m2", "m3", "m4"]);

        assert_eq!(list_recent(&state, 50).unwrap().len(), 5);
        assert!(list_recent(&state, 0).unwrap().is_empty());
    }

    #[test]
    fn test_null_columns_read_as_empty() {
        let state = test_state();
        {
            let db = state.db.lock().unwrap();
            db.execute("INSERT INTO chat_history (role) VALUES ('user')", [])
                .unwrap();
        }
        let records = list_recent(&state, 10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "");
        assert_eq!(records[0].timestamp, "");
    }

    #[test]
    fn test_save_message_surfaces_storage_errors() {
        let state = test_state();
        {
            let db = state.db.lock().unwrap();
            db.execute_batch("DROP TABLE chat_history;").unwrap();
        }
        let err = save_message(&state, Role::User, "hello").unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
