use crate::db::history_repo;
use crate::error::{AppError, AppResult};
use crate::inference::{self, ChatBackend, Completion};
use crate::models::message::{ChatMessage, Role};
use crate::models::session::{ChatSession, CONTEXT_WINDOW};
use crate::prompt;
use crate::state::AppState;

pub const UNAVAILABLE_NOTICE: &str = "❌ Unable to generate response at the moment. Please try again in a few moments or rephrase your question.";

const ERROR_PREFIX: &str = "❌ An error occurred: ";

/// Longest error text shown to the user.
const ERROR_DETAIL_LIMIT: usize = 100;

/// What a turn did, for the caller's logging and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input, nothing happened.
    Ignored,
    Answered {
        model: String,
        /// False when the exchange was shown but could not be written to the log.
        persisted: bool,
    },
    /// Every model failed; the generic notice was shown.
    Unavailable,
    /// Some other error; a truncated notice was shown.
    Failed,
}

/// Options for a single turn.
#[derive(Debug, Clone)]
pub struct TurnOptions<'a> {
    pub models: &'a [String],
    pub max_query_chars: usize,
}

/// Run one user turn to completion.
///
/// Every failure is absorbed here and turned into an assistant-style message
/// in `session`; only a successful exchange reaches the log.
pub async fn send_prompt(
    state: &AppState,
    session: &mut ChatSession,
    backend: &dyn ChatBackend,
    options: &TurnOptions<'_>,
    content: &str,
) -> TurnOutcome {
    let query = content.trim();
    if query.is_empty() {
        return TurnOutcome::Ignored;
    }

    log::info!(
        "send_prompt called: session_id={}, content_len={}",
        session.id,
        query.len()
    );
    session.show(ChatMessage::user(query));

    match run_turn(state, session, backend, options, query).await {
        Ok(outcome) => outcome,
        Err(e) => {
            match &e {
                AppError::InvalidRequest(_) => {
                    log::info!("Rejected turn in session {}: {}", session.id, e)
                }
                _ => log::error!("Turn failed in session {}: {}", session.id, e),
            }
            session.show(ChatMessage::assistant(error_notice(&e)));
            TurnOutcome::Failed
        }
    }
}

async fn run_turn(
    state: &AppState,
    session: &mut ChatSession,
    backend: &dyn ChatBackend,
    options: &TurnOptions<'_>,
    query: &str,
) -> AppResult<TurnOutcome> {
    let query_chars = query.chars().count();
    if query_chars > options.max_query_chars {
        return Err(AppError::InvalidRequest(format!(
            "question is {query_chars} characters long; the limit is {}",
            options.max_query_chars
        )));
    }

    let prompt = prompt::build_prompt(query, &session.recent_context(CONTEXT_WINDOW));

    let (model, answer) = match inference::complete(backend, options.models, &prompt).await {
        Completion::Answered { model, text } => (model, text),
        Completion::Exhausted { failures } => {
            log::info!(
                "No model answered in session {} ({} attempts)",
                session.id,
                failures.len()
            );
            session.show(ChatMessage::assistant(UNAVAILABLE_NOTICE));
            return Ok(TurnOutcome::Unavailable);
        }
    };

    session.record_exchange(query, &answer);

    // The answer is already on screen; a failed write only loses the log entry.
    let persisted = match persist_exchange(state, query, &answer).await {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to persist exchange for session {}: {}", session.id, e);
            false
        }
    };

    Ok(TurnOutcome::Answered { model, persisted })
}

async fn persist_exchange(state: &AppState, query: &str, answer: &str) -> AppResult<()> {
    let state = state.clone();
    let query = query.to_string();
    let answer = answer.to_string();
    tokio::task::spawn_blocking(move || {
        history_repo::save_message(&state, Role::User, &query)?;
        history_repo::save_message(&state, Role::Assistant, &answer)?;
        Ok(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}

fn error_notice(err: &AppError) -> String {
    let detail: String = err.to_string().chars().take(ERROR_DETAIL_LIMIT).collect();
    format!("{ERROR_PREFIX}{detail}")
}
