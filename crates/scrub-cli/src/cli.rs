use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "forum-scrub")]
#[command(about = "Anonymize forum exports into a relational store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to a timestamped file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Redact a forum export and insert it into the database
    Run {
        /// Export file or directory (mongoexport JSON, one document per line)
        dump: PathBuf,

        /// Destination table (default from config: contents)
        #[arg(long)]
        table: Option<String>,

        /// Dump the first-name token set to this JSON file
        #[arg(long)]
        first_tokens: Option<PathBuf>,

        #[command(flatten)]
        db: DbArgs,
    },

    /// Redact a single post body and print the result
    Redact {
        /// Author id of the post (drives name redaction)
        #[arg(long)]
        author: i64,

        /// Post body (read from stdin if omitted)
        text: Option<String>,

        /// Show redaction details
        #[arg(long)]
        redactions: bool,

        #[command(flatten)]
        db: DbArgs,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct DbArgs {
    /// SQLite database file (default from config: forum.db)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Roster table listing in-the-clear user names (default from config: UserGrade)
    #[arg(long)]
    pub roster_table: Option<String>,

    /// Also remove known first names anywhere in a post
    #[arg(long)]
    pub token_pass: bool,
}
