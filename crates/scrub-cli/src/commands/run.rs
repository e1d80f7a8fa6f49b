use std::path::PathBuf;

use anyhow::Result;
use scrub_config::Config;
use scrub_engine::Scrubber;
use scrub_sources::ExportSource;
use scrub_storage::Storage;

use crate::cli::DbArgs;

pub async fn handle(
    config: &Config,
    dump: PathBuf,
    table: Option<String>,
    first_tokens: Option<PathBuf>,
    db: DbArgs,
) -> Result<()> {
    let (db_path, mut options) = super::resolve(config, &db);
    if let Some(table) = table {
        options.forum_table = table;
    }
    if first_tokens.is_some() {
        options.first_tokens_path = first_tokens;
    }

    let storage = Storage::new(&db_path).await?;
    storage.prepare_forum_table(&options.forum_table).await?;

    let table = options.forum_table.clone();
    let scrubber = Scrubber::from_roster(&storage, options).await?;
    let mut source = ExportSource::open(&dump)?;
    let summary = scrubber.run(&mut source, &storage).await?;

    println!("✓ Inserted {} records into {}", summary.inserted, table);
    println!("  Database: {}", db_path.display());
    if summary.up_sentinels > 0 {
        println!("  Unreadable up-vote lists: {}", summary.up_sentinels);
    }
    for (redaction_type, count) in &summary.redactions {
        println!("  {}: {}", redaction_type, count);
    }

    Ok(())
}
