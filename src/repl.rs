//! Line-oriented terminal front-end.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands::chat_commands::{self, TurnOptions, TurnOutcome};
use crate::config::Settings;
use crate::error::AppResult;
use crate::inference::ChatBackend;
use crate::models::message::Role;
use crate::models::session::ChatSession;
use crate::state::AppState;

const WELCOME: &str = "👋 Welcome to LawPilot, the legal advice assistant for Indian citizens!

Start by asking a legal question. You can:
- Ask about your rights in any situation
- Request step-by-step guidance for legal procedures
- Ask follow-up questions to get more details
- Request document templates or complaint formats

Commands: /clear resets the conversation, /quit exits.
";

const BUSY: &str = "🔍 Analyzing your legal query...";

pub struct Repl<'a> {
    state: AppState,
    backend: &'a dyn ChatBackend,
    settings: &'a Settings,
    session: ChatSession,
    /// Transcript entries already written out
    rendered: usize,
}

impl<'a> Repl<'a> {
    pub fn new(state: AppState, backend: &'a dyn ChatBackend, settings: &'a Settings) -> Self {
        Self {
            state,
            backend,
            settings,
            session: ChatSession::new(),
            rendered: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Read lines from `input` until `/quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        self.prompt(out)?;

        while let Some(line) = lines.next_line().await? {
            match line.trim() {
                "/quit" | "/exit" => break,
                "/clear" => {
                    self.session.clear();
                    self.rendered = 0;
                    log::info!("Conversation cleared for session {}", self.session.id);
                    writeln!(out, "🗑️ Conversation cleared.")?;
                }
                "" => {}
                text => {
                    writeln!(out, "{BUSY}")?;
                    out.flush()?;
                    let options = TurnOptions {
                        models: &self.settings.models,
                        max_query_chars: self.settings.max_query_chars,
                    };
                    let outcome = chat_commands::send_prompt(
                        &self.state,
                        &mut self.session,
                        self.backend,
                        &options,
                        text,
                    )
                    .await;
                    self.render(out)?;
                    if let TurnOutcome::Answered { persisted: false, .. } = outcome {
                        writeln!(out, "(note: this exchange could not be saved to the history log)")?;
                    }
                }
            }
            self.prompt(out)?;
        }

        writeln!(out)?;
        Ok(())
    }

    fn prompt<W: Write>(&self, out: &mut W) -> AppResult<()> {
        if self.session.is_empty() {
            writeln!(out, "{WELCOME}")?;
        }
        write!(out, "> ")?;
        out.flush()?;
        Ok(())
    }

    fn render<W: Write>(&mut self, out: &mut W) -> AppResult<()> {
        // The user's own line is already on the terminal.
        for msg in &self.session.messages()[self.rendered..] {
            if msg.role == Role::Assistant {
                writeln!(out, "\n{}\n", msg.content)?;
            }
        }
        self.rendered = self.session.messages().len();
        Ok(())
    }
}
