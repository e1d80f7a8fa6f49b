//! Roster source and post sink

use async_trait::async_trait;
use scrub_core::{PostRecord, RosterRow};
use sqlx::Row;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::db::Storage;
use crate::schema;
use crate::{Result, StorageError};

/// `created_at` column text, in UTC.
fn format_datetime(ts: OffsetDateTime) -> Result<String> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    Ok(ts.to_offset(UtcOffset::UTC).format(format)?)
}

/// Provides the roster of known forum users.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn load_roster(&self, table: &str) -> Result<Vec<RosterRow>>;
}

/// Receives redacted records, one insert per call.
#[async_trait]
pub trait PostSink: Send + Sync {
    async fn insert(&self, table: &str, record: &PostRecord) -> Result<()>;
}

#[async_trait]
impl RosterSource for Storage {
    async fn load_roster(&self, table: &str) -> Result<Vec<RosterRow>> {
        let quoted = schema::quote_table(table)?;
        let sql = format!(
            "SELECT CAST(user_int_id AS TEXT), name, screen_name, anon_screen_name FROM {}",
            quoted
        );

        let rows = sqlx::query(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(|source| StorageError::Roster {
                table: table.to_string(),
                source,
            })?;

        rows.iter()
            .map(|row| {
                let roster_row = RosterRow {
                    author_id: row.try_get::<Option<String>, _>(0)?.unwrap_or_default(),
                    full_name: row.try_get(1)?,
                    screen_name: row.try_get(2)?,
                    alias: row.try_get(3)?,
                };
                Ok(roster_row)
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            .map_err(|source| StorageError::Roster {
                table: table.to_string(),
                source,
            })
    }
}

#[async_trait]
impl PostSink for Storage {
    async fn insert(&self, table: &str, record: &PostRecord) -> Result<()> {
        let quoted = schema::quote_table(table)?;
        let sql = schema::insert_forum_sql(&quoted);

        let created_at = record
            .created_at
            .map(format_datetime)
            .transpose()?;
        let votes = record.votes.as_ref();

        sqlx::query(&sql)
            .bind(&record.kind)
            .bind(&record.anonymous)
            .bind(&record.anonymous_to_peers)
            .bind(&record.at_position_list)
            .bind(record.author_id)
            .bind(&record.body)
            .bind(&record.course_id)
            .bind(created_at)
            .bind(&record.votes_text)
            .bind(votes.and_then(|v| v.count))
            .bind(votes.and_then(|v| v.down_count))
            .bind(votes.and_then(|v| v.up_count))
            .bind(votes.map(|v| v.up.render()))
            .bind(votes.map(|v| v.down.render()))
            .bind(&record.comment_thread_id)
            .bind(&record.parent_id)
            .bind(&record.parent_ids)
            .bind(&record.sk)
            .execute(self.pool())
            .await
            .map_err(|source| StorageError::Insert {
                table: table.to_string(),
                record: record.source_id.clone(),
                author_id: record.author_id,
                source,
            })?;

        Ok(())
    }
}
