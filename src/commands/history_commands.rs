use crate::db::history_repo;
use crate::error::{AppError, AppResult};
use crate::models::message::ChatRecord;
use crate::state::AppState;
use crate::timestamps;

/// Recent log entries, oldest first, with timestamps in IST display form.
pub async fn list_history(state: &AppState, limit: usize) -> AppResult<Vec<ChatRecord>> {
    let state = state.clone();
    let records = tokio::task::spawn_blocking(move || history_repo::list_recent(&state, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(records
        .into_iter()
        .map(|record| ChatRecord {
            timestamp: timestamps::normalize_to_ist(&record.timestamp),
            ..record
        })
        .collect())
}

/// Total number of logged messages.
pub async fn count_history(state: &AppState) -> AppResult<i64> {
    let state = state.clone();
    tokio::task::spawn_blocking(move || history_repo::count(&state))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}
