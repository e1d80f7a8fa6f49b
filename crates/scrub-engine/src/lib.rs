use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use scrub_core::{PostRecord, VoteIds};
use scrub_redact::{IdentityCache, RedactionType, Redactor};
use scrub_sources::PostSource;
use scrub_storage::{PostSink, RosterSource};

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ScrubOptions {
    pub forum_table: String,
    pub roster_table: String,
    pub token_pass: bool,
    pub progress_interval: usize,
    pub first_tokens_path: Option<PathBuf>,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            forum_table: "contents".to_string(),
            roster_table: "UserGrade".to_string(),
            token_pass: false,
            progress_interval: 100,
            first_tokens_path: None,
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub inserted: usize,
    pub up_sentinels: usize,
    pub redactions: BTreeMap<RedactionType, usize>,
}

/// Load the roster and build the identity cache. Any roster failure aborts.
pub async fn build_identity_cache(
    roster: &dyn RosterSource,
    roster_table: &str,
) -> Result<IdentityCache> {
    tracing::info!("Populating identity cache from {}", roster_table);
    let rows = roster
        .load_roster(roster_table)
        .await
        .context("Failed to load user roster")?;
    let cache = IdentityCache::build(rows).context("Failed to build identity cache")?;
    Ok(cache)
}

/// Write the first-name token set as a sorted JSON array.
pub async fn write_first_tokens(cache: &IdentityCache, path: &Path) -> Result<()> {
    let mut tokens: Vec<&String> = cache.first_tokens().iter().collect();
    tokens.sort();
    let json = serde_json::to_string_pretty(&tokens)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {} first-name tokens to {}", tokens.len(), path.display());
    Ok(())
}

/// Streams posts from a source through the redactor into a sink.
pub struct Scrubber {
    redactor: Redactor,
    options: ScrubOptions,
}

impl Scrubber {
    pub fn new(identities: Arc<IdentityCache>, options: ScrubOptions) -> Self {
        let redactor = Redactor::new(identities).with_token_pass(options.token_pass);
        Self { redactor, options }
    }

    /// Build the identity cache from `roster`, then construct the scrubber.
    pub async fn from_roster(roster: &dyn RosterSource, options: ScrubOptions) -> Result<Self> {
        let cache = build_identity_cache(roster, &options.roster_table).await?;
        if let Some(path) = &options.first_tokens_path {
            write_first_tokens(&cache, path).await?;
        }
        Ok(Self::new(Arc::new(cache), options))
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// Redact one post. Pure: touches neither source nor sink.
    pub fn scrub(&self, record: PostRecord) -> (PostRecord, Vec<scrub_redact::RedactionInfo>) {
        self.redactor.redact_record(record)
    }

    /// Process every post of `source`, one at a time. The first failed insert
    /// stops the run and is returned.
    pub async fn run(
        &self,
        source: &mut dyn PostSource,
        sink: &dyn PostSink,
    ) -> Result<RunSummary> {
        let table = &self.options.forum_table;
        let mut summary = RunSummary::default();

        tracing::info!(
            "Inserting posts from {} source into {}",
            source.name(),
            table
        );

        while let Some(raw) = source
            .next_post()
            .await
            .context("Failed to read forum export")?
        {
            let record = PostRecord::from_raw(raw)?;
            let (record, redactions) = self.scrub(record);

            if record
                .votes
                .as_ref()
                .is_some_and(|v| v.up == VoteIds::Sentinel)
            {
                summary.up_sentinels += 1;
            }
            for info in redactions {
                *summary.redactions.entry(info.redaction_type).or_default() += info.count;
            }

            if let Err(e) = sink.insert(table, &record).await {
                tracing::error!(
                    "Insert failed for record {} (author {:?}, created_at {:?}): {}",
                    record.source_id,
                    record.author_username,
                    record.created_at,
                    e
                );
                return Err(e).context(format!(
                    "Aborting after {} inserted records",
                    summary.inserted
                ));
            }

            summary.inserted += 1;
            if self.options.progress_interval > 0
                && summary.inserted % self.options.progress_interval == 0
            {
                tracing::info!("Inserted record {}", summary.inserted);
            }
        }

        tracing::info!(
            "Finished: {} records inserted, {} up lists replaced",
            summary.inserted,
            summary.up_sentinels
        );
        for (redaction_type, count) in &summary.redactions {
            tracing::info!("  {}: {}", redaction_type, count);
        }

        Ok(summary)
    }
}
