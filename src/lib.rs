pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod inference;
pub mod models;
pub mod prompt;
pub mod repl;
pub mod state;
pub mod timestamps;

use anyhow::Context;
use clap::Parser;

use cli::{Cli, Commands};
use config::Settings;
use inference::HttpChatBackend;
use state::AppState;

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    if let Some(path) = cli.db.clone() {
        settings.db_path = path;
    }

    // Initialize the database
    let conn = if cli.ephemeral {
        db::migrations::init_in_memory()?
    } else {
        db::migrations::init_db(&settings.db_path)
            .with_context(|| format!("opening chat log at {}", settings.db_path.display()))?
    };
    let state = AppState::new(conn);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let token = settings.require_token()?;
            let backend =
                HttpChatBackend::new(&settings.base_url, token, settings.request_timeout)
                    .map_err(error::AppError::Config)?;
            log::info!(
                "Starting chat with {} candidate model(s) via {}",
                settings.models.len(),
                settings.base_url
            );

            let mut repl = repl::Repl::new(state, &backend, &settings);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            repl.run(stdin, &mut stdout).await?;
        }
        Commands::History { limit } => {
            let records = commands::history_commands::list_history(&state, limit).await?;
            if records.is_empty() {
                println!("No conversations logged yet.");
            } else {
                let total = commands::history_commands::count_history(&state).await?;
                println!("Showing {} of {} logged messages.", records.len(), total);
            }
            for record in records {
                println!("[{}] {}: {}", record.timestamp, record.role, record.message);
            }
        }
    }

    Ok(())
}
