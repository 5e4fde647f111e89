pub mod chat_commands;
pub mod history_commands;
