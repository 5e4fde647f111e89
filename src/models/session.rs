use crate::models::message::{ChatMessage, Role};

/// Context entries read when building a prompt: the last three exchanges.
pub const CONTEXT_WINDOW: usize = 6;

/// Per-user conversation state.
///
/// `messages` is the transcript as rendered, including pending queries and
/// failure notices. `context` only ever holds completed exchanges and is what
/// the prompt assembler reads from.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: String,
    messages: Vec<ChatMessage>,
    context: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            messages: Vec::new(),
            context: Vec::new(),
        }
    }

    /// Add a message to both the transcript and the context history.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        let msg = ChatMessage {
            role,
            content: content.into(),
        };
        self.context.push(msg.clone());
        self.messages.push(msg);
    }

    /// Add a message to the transcript only.
    pub fn show(&mut self, msg: ChatMessage) {
        self.messages.push(msg);
    }

    /// Record a completed exchange. The query is expected to be on screen
    /// already, so only the answer is added to the transcript.
    pub fn record_exchange(&mut self, query: &str, answer: &str) {
        self.messages.push(ChatMessage::assistant(answer));
        self.context.push(ChatMessage::user(query));
        self.context.push(ChatMessage::assistant(answer));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.context.clear();
    }

    /// The last `n` context entries, oldest first, as `ROLE: content` lines.
    pub fn recent_context(&self, n: usize) -> Vec<String> {
        let start = self.context.len().saturating_sub(n);
        self.context[start..]
            .iter()
            .map(ChatMessage::as_context_line)
            .collect()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn context(&self) -> &[ChatMessage] {
        &self.context
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
