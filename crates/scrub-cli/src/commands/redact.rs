use anyhow::Result;
use scrub_config::Config;
use scrub_engine::Scrubber;
use scrub_storage::Storage;
use tokio::io::AsyncReadExt;

use crate::cli::DbArgs;

pub async fn handle(
    config: &Config,
    author: i64,
    text: Option<String>,
    show_redactions: bool,
    db: DbArgs,
) -> Result<()> {
    let body = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let (db_path, options) = super::resolve(config, &db);
    let storage = Storage::new(&db_path).await?;
    let scrubber = Scrubber::from_roster(&storage, options).await?;

    let (redacted, infos) = scrubber.redactor().redact("stdin", author, body.trim());
    println!("{}", redacted);

    if show_redactions {
        if infos.is_empty() {
            eprintln!("No redactions.");
        }
        for info in infos {
            eprintln!("  {}: {}", info.redaction_type, info.count);
        }
    }

    Ok(())
}
