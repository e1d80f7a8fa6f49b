mod cli;
mod commands;

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use scrub_config::Config;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load()?,
    };

    let log_dir = cli.log_dir.as_deref().or(config.run.log_dir.as_deref());
    init_tracing(log_dir)?;

    match cli.command {
        cli::Commands::Run {
            dump,
            table,
            first_tokens,
            db,
        } => commands::run::handle(&config, dump, table, first_tokens, db).await,
        cli::Commands::Redact {
            author,
            text,
            redactions,
            db,
        } => commands::redact::handle(&config, author, text, redactions, db).await,
        cli::Commands::Completions { shell } => {
            commands::completions::handle(shell);
            Ok(())
        }
    }
}

fn init_tracing(log_dir: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let stamp = OffsetDateTime::now_utc().format(format_description!(
                "[year]-[month]-[day]-[hour]-[minute]-[second]"
            ))?;
            let path = dir.join(format!("forum_{}.log", stamp));
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
