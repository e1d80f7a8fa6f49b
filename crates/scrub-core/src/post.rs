//! Forum post domain model

use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::legacy;
use crate::{CoreError, Result};

/// A forum document as exported from the document store.
///
/// Every field is optional; shape checks happen when converting into a
/// [`PostRecord`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
    #[serde(rename = "_type", default)]
    pub kind: Option<Value>,
    #[serde(default)]
    pub anonymous: Option<Value>,
    #[serde(default)]
    pub anonymous_to_peers: Option<Value>,
    #[serde(default)]
    pub at_position_list: Option<Value>,
    #[serde(default)]
    pub author_id: Option<Value>,
    #[serde(default)]
    pub author_username: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub course_id: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub votes: Option<Value>,
    #[serde(default)]
    pub comment_thread_id: Option<Value>,
    #[serde(default)]
    pub parent_id: Option<Value>,
    #[serde(default)]
    pub parent_ids: Option<Value>,
    #[serde(default)]
    pub sk: Option<Value>,
}

impl RawPost {
    pub fn from_json(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Identifier used in log lines.
    pub fn display_id(&self) -> String {
        self.id
            .as_ref()
            .map(legacy::render)
            .unwrap_or_else(|| legacy::NONE.to_string())
    }
}

/// Up/down voter id list.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteIds {
    /// Readable list of voter ids.
    List(Vec<String>),
    /// Value present but not a list of ids, kept as its legacy rendering.
    Unreadable(String),
    /// Written in place of an unreadable list.
    Sentinel,
}

impl VoteIds {
    pub const SENTINEL: &'static str = "-1";

    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Self::Unreadable(legacy::NONE.to_string());
        };
        match value.as_array() {
            Some(items) => {
                let ids: Option<Vec<String>> = items.iter().map(legacy::as_id).collect();
                match ids {
                    Some(ids) => Self::List(ids),
                    None => Self::Unreadable(legacy::render(value)),
                }
            }
            None => Self::Unreadable(legacy::render(value)),
        }
    }

    /// Column text.
    pub fn render(&self) -> String {
        match self {
            Self::List(ids) => legacy::render_id_list(ids),
            Self::Unreadable(text) => text.clone(),
            Self::Sentinel => Self::SENTINEL.to_string(),
        }
    }
}

/// Vote aggregates of a post.
#[derive(Debug, Clone, PartialEq)]
pub struct Votes {
    pub count: Option<i64>,
    pub up_count: Option<i64>,
    pub down_count: Option<i64>,
    pub up: VoteIds,
    pub down: VoteIds,
}

impl Votes {
    fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name);
        Self {
            count: field("count").and_then(legacy::as_i64),
            up_count: field("up_count").and_then(legacy::as_i64),
            down_count: field("down_count").and_then(legacy::as_i64),
            up: VoteIds::from_value(field("up")),
            down: VoteIds::from_value(field("down")),
        }
    }
}

/// A forum post ready for redaction and insertion.
///
/// Text columns hold their legacy rendering; see [`crate::legacy`].
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    /// Document id, for logging only.
    pub source_id: String,
    /// In-the-clear author name, for logging only.
    pub author_username: Option<String>,
    pub kind: String,
    pub anonymous: String,
    pub anonymous_to_peers: String,
    pub at_position_list: String,
    pub author_id: i64,
    pub body: String,
    pub course_id: String,
    pub created_at: Option<OffsetDateTime>,
    /// Rendering of the whole votes document.
    pub votes_text: String,
    pub votes: Option<Votes>,
    pub comment_thread_id: Option<String>,
    pub parent_id: Option<String>,
    pub parent_ids: Option<String>,
    pub sk: Option<String>,
}

impl PostRecord {
    pub fn from_raw(raw: RawPost) -> Result<Self> {
        let source_id = raw.display_id();

        let author_id = match raw.author_id.as_ref() {
            None | Some(Value::Null) => {
                return Err(CoreError::MissingAuthorId { record: source_id });
            }
            Some(value) => legacy::as_i64(value).ok_or_else(|| CoreError::InvalidAuthorId {
                record: source_id.clone(),
                value: legacy::render(value),
            })?,
        };

        let created_at = match raw.created_at.as_ref() {
            None | Some(Value::Null) => None,
            Some(value) => Some(parse_timestamp(value).ok_or_else(|| {
                CoreError::InvalidTimestamp {
                    record: source_id.clone(),
                    value: legacy::render(value),
                }
            })?),
        };

        let optional = |value: Option<&Value>| value.filter(|v| !v.is_null()).map(legacy::render);

        Ok(Self {
            kind: legacy::render_opt(raw.kind.as_ref()),
            anonymous: legacy::render_opt(raw.anonymous.as_ref()),
            anonymous_to_peers: legacy::render_opt(raw.anonymous_to_peers.as_ref()),
            at_position_list: legacy::render_opt(raw.at_position_list.as_ref()),
            author_id,
            body: raw.body.as_deref().unwrap_or_default().trim().to_string(),
            course_id: legacy::render_opt(raw.course_id.as_ref()),
            created_at,
            votes_text: legacy::render_opt(raw.votes.as_ref()),
            votes: raw.votes.as_ref().map(Votes::from_value),
            comment_thread_id: optional(raw.comment_thread_id.as_ref()),
            parent_id: optional(raw.parent_id.as_ref()),
            parent_ids: optional(raw.parent_ids.as_ref()),
            sk: optional(raw.sk.as_ref()),
            author_username: raw.author_username,
            source_id,
        })
    }
}

/// `$date` as RFC 3339 text or epoch milliseconds; bare strings and numbers too.
fn parse_timestamp(value: &Value) -> Option<OffsetDateTime> {
    let inner = legacy::unwrap_extended(value).unwrap_or(value);
    if let Value::String(s) = inner {
        if let Ok(ts) = OffsetDateTime::parse(s, &Rfc3339) {
            return Some(ts);
        }
    }
    let millis = legacy::as_i64(inner)?;
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}
