pub mod completions;
pub mod redact;
pub mod run;

use std::path::PathBuf;

use scrub_config::Config;
use scrub_engine::ScrubOptions;

use crate::cli::DbArgs;

/// Merge command-line overrides into the configured run settings.
pub fn resolve(config: &Config, db: &DbArgs) -> (PathBuf, ScrubOptions) {
    let db_path = db.db.clone().unwrap_or_else(|| config.database.path.clone());
    let options = ScrubOptions {
        forum_table: config.database.forum_table.clone(),
        roster_table: db
            .roster_table
            .clone()
            .unwrap_or_else(|| config.database.roster_table.clone()),
        token_pass: db.token_pass || config.redaction.token_pass,
        progress_interval: config.run.progress_interval,
        first_tokens_path: config.run.first_tokens_path.clone(),
    };
    (db_path, options)
}
