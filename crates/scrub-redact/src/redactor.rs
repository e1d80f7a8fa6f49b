//! Redaction pipeline for forum post bodies

use std::fmt;
use std::sync::Arc;

use scrub_core::{PostRecord, VoteIds};

use crate::identity::IdentityCache;
use crate::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RedactionType {
    Phone,
    Zip,
    Email,
    Name,
    ScreenName,
    TokenName,
}

impl fmt::Display for RedactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Phone => "phone",
            Self::Zip => "zip",
            Self::Email => "email",
            Self::Name => "name",
            Self::ScreenName => "screen_name",
            Self::TokenName => "token_name",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct RedactionInfo {
    pub record_id: String,
    pub redaction_type: RedactionType,
    pub count: usize,
}

/// Applies the ordered redaction passes to post bodies.
///
/// Pure given its identity cache: no store access happens here.
pub struct Redactor {
    identities: Arc<IdentityCache>,
    token_pass: bool,
}

impl Redactor {
    pub fn new(identities: Arc<IdentityCache>) -> Self {
        Self {
            identities,
            token_pass: false,
        }
    }

    /// Enable the supplementary first-token pass (off by default: too many
    /// first names are ordinary words).
    pub fn with_token_pass(mut self, enabled: bool) -> Self {
        self.token_pass = enabled;
        self
    }

    /// Redact the body of a record and normalize its `up` voter list.
    pub fn redact_record(&self, mut record: PostRecord) -> (PostRecord, Vec<RedactionInfo>) {
        let (body, redactions) = self.redact(&record.source_id, record.author_id, &record.body);
        record.body = body;

        if let Some(votes) = record.votes.as_mut() {
            if let VoteIds::Unreadable(raw) = &votes.up {
                tracing::warn!(
                    "Record {}: up votes {} are not an id list, storing {}",
                    record.source_id,
                    raw,
                    VoteIds::SENTINEL
                );
                votes.up = VoteIds::Sentinel;
            }
        }

        (record, redactions)
    }

    /// Run every pass over one body, in order:
    /// phone, zip, email, author name, screen name, first tokens.
    pub fn redact(
        &self,
        record_id: &str,
        author_id: i64,
        body: &str,
    ) -> (String, Vec<RedactionInfo>) {
        let mut redactions = Vec::new();
        let mut note = |redaction_type: RedactionType, count: usize| {
            if count > 0 {
                redactions.push(RedactionInfo {
                    record_id: record_id.to_string(),
                    redaction_type,
                    count,
                });
            }
        };

        let (result, count) = rules::redact_phones(body);
        note(RedactionType::Phone, count);

        let (result, count) = rules::redact_zips(&result);
        note(RedactionType::Zip, count);

        let (result, count) = rules::redact_emails(&result);
        note(RedactionType::Email, count);

        let (full_name, screen_name) = self.identities.names_for(author_id);

        let (result, count) = self.redact_full_name(record_id, full_name, &result);
        note(RedactionType::Name, count);

        let (result, count) = self.redact_screen_name(record_id, screen_name, &result);
        note(RedactionType::ScreenName, count);

        let (result, count) = self.redact_first_tokens(record_id, &result);
        note(RedactionType::TokenName, count);

        (result, redactions)
    }

    fn redact_full_name(&self, record_id: &str, full_name: &str, body: &str) -> (String, usize) {
        let mut result = body.to_string();
        let mut total = 0;

        for token in full_name.split_whitespace() {
            if token.chars().count() < 3 {
                continue;
            }
            if !result.to_lowercase().contains(&token.to_lowercase()) {
                continue;
            }
            match rules::literal_matcher(token) {
                Ok(matcher) => {
                    let (redacted, count) =
                        rules::substitute_outside_tokens(&matcher, &result, rules::NAME_TOKEN);
                    result = redacted;
                    total += count;
                }
                Err(e) => {
                    tracing::warn!(
                        "Record {}: cannot redact name token {:?}: {}",
                        record_id,
                        token,
                        e
                    );
                }
            }
        }

        (result, total)
    }

    fn redact_screen_name(&self, record_id: &str, screen_name: &str, body: &str) -> (String, usize) {
        if screen_name.is_empty() {
            return (body.to_string(), 0);
        }
        match rules::literal_matcher(screen_name) {
            Ok(matcher) => rules::substitute_outside_tokens(&matcher, body, rules::NAME_TOKEN),
            Err(e) => {
                tracing::warn!(
                    "Record {}: cannot redact screen name {:?}: {}",
                    record_id,
                    screen_name,
                    e
                );
                (body.to_string(), 0)
            }
        }
    }

    fn redact_first_tokens(&self, record_id: &str, body: &str) -> (String, usize) {
        if !self.token_pass {
            return (body.to_string(), 0);
        }

        let known = self.identities.first_tokens();
        let mut words: Vec<&str> = body
            .split_whitespace()
            .filter(|w| known.contains(*w))
            .filter(|w| w.chars().count() > 1 && w.chars().next().is_some_and(char::is_uppercase))
            .collect();
        words.sort_unstable();
        words.dedup();

        let mut result = body.to_string();
        let mut total = 0;
        for word in words {
            match rules::word_matcher(word) {
                Ok(matcher) => {
                    total += matcher.find_iter(&result).count();
                    result = matcher
                        .replace_all(&result, rules::TOKEN_NAME_REPLACEMENT)
                        .into_owned();
                }
                Err(e) => {
                    tracing::warn!("Record {}: cannot redact word {:?}: {}", record_id, word, e);
                }
            }
        }

        (result, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_core::{RosterRow, Votes};

    fn redactor() -> Redactor {
        let cache = IdentityCache::build(vec![
            RosterRow {
                author_id: "1".to_string(),
                full_name: Some("Jane Smith".to_string()),
                screen_name: Some("jdoe99".to_string()),
                alias: Some("f00dfeed".to_string()),
            },
            RosterRow {
                author_id: "2".to_string(),
                full_name: Some("Al Ng".to_string()),
                screen_name: Some(String::new()),
                alias: None,
            },
            RosterRow {
                author_id: "3".to_string(),
                full_name: Some("Carlos Ruiz".to_string()),
                screen_name: Some("cruiz".to_string()),
                alias: None,
            },
        ])
        .unwrap();
        Redactor::new(Arc::new(cache))
    }

    fn body(redactor: &Redactor, author_id: i64, text: &str) -> String {
        redactor.redact("r", author_id, text).0
    }

    #[test]
    fn test_full_name_tokens() {
        let r = redactor();
        assert_eq!(
            body(&r, 1, "jane smith here. JANE says Smith is a surname."),
            "<nameRedac_> <nameRedac_> here. <nameRedac_> says <nameRedac_> is a surname."
        );
    }

    #[test]
    fn test_short_name_tokens_are_kept() {
        let r = redactor();
        assert_eq!(body(&r, 2, "Al and Ng wrote this"), "Al and Ng wrote this");
    }

    #[test]
    fn test_screen_name() {
        let r = redactor();
        assert_eq!(
            body(&r, 1, "JDoe99 posted; see jdoe99"),
            "<nameRedac_> posted; see <nameRedac_>"
        );
    }

    #[test]
    fn test_empty_screen_name_leaves_body() {
        let r = redactor();
        let text = "nothing to see";
        assert_eq!(body(&r, 2, text), text);
    }

    #[test]
    fn test_unknown_author_uses_placeholder() {
        let r = redactor();
        // The placeholder is an ordinary name and is redacted like one.
        assert_eq!(body(&r, 404, "Jane wrote xxxx"), "Jane wrote <nameRedac_>");
    }

    #[test]
    fn test_name_token_alias_is_empty() {
        // The roster carries an alias ("f00dfeed") but name
        // tokens are written with an empty alias segment. Pinned until the
        // intended format is settled.
        let r = redactor();
        let out = body(&r, 1, "Thanks, Jane");
        assert_eq!(out, "Thanks, <nameRedac_>");
        assert!(!out.contains("f00dfeed"));
    }

    #[test]
    fn test_pass_order_and_counts() {
        let r = redactor();
        let (out, info) = r.redact(
            "rec-1",
            1,
            "Reach Jane at 650-555-1234 in 94305 or mail jane@school.edu today",
        );
        assert_eq!(
            out,
            " Reach <nameRedac_> at <phoneRedac> in <zipRedac> or mail <emailRedac> today"
        );
        let types: Vec<RedactionType> = info.iter().map(|i| i.redaction_type).collect();
        assert_eq!(
            types,
            vec![
                RedactionType::Phone,
                RedactionType::Zip,
                RedactionType::Email,
                RedactionType::Name
            ]
        );
        assert!(info.iter().all(|i| i.record_id == "rec-1"));
    }

    #[test]
    fn test_idempotent() {
        let r = redactor();
        let inputs = [
            "Reach Jane at 650-555-1234 in 94305 or mail jane@school.edu today",
            "jdoe99 here, (415) 555-9876 ext 12",
            "Smith, Smith and smith",
        ];
        for input in inputs {
            let once = body(&r, 1, input);
            let twice = body(&r, 1, &once);
            assert_eq!(once, twice, "{input}");
        }
    }

    #[test]
    fn test_name_matching_token_text_keeps_tokens() {
        let cache = IdentityCache::build(vec![RosterRow {
            author_id: "5".to_string(),
            full_name: Some("Reda Phone".to_string()),
            screen_name: Some("zip".to_string()),
            alias: None,
        }])
        .unwrap();
        let r = Redactor::new(Arc::new(cache));
        let once = body(&r, 5, "Reda: 650-555-1234, 94305");
        assert_eq!(once, "<nameRedac_>: <phoneRedac>, <zipRedac>");
        assert_eq!(body(&r, 5, &once), once);
    }

    #[test]
    fn test_token_pass_disabled_by_default() {
        let r = redactor();
        assert_eq!(body(&r, 404, "Carlos asked"), "Carlos asked");
    }

    #[test]
    fn test_token_pass_enabled() {
        let r = redactor().with_token_pass(true);
        assert_eq!(
            body(&r, 404, "Carlos asked carlos and Carlosito"),
            "NAME_REMOVED asked carlos and Carlosito"
        );
    }

    #[test]
    fn test_redact_record_sets_up_sentinel() {
        let r = redactor();
        let record = PostRecord {
            source_id: "abc".to_string(),
            author_username: None,
            kind: "Comment".to_string(),
            anonymous: "False".to_string(),
            anonymous_to_peers: "False".to_string(),
            at_position_list: "[]".to_string(),
            author_id: 1,
            body: "hi from jdoe99".to_string(),
            course_id: "c".to_string(),
            created_at: None,
            votes_text: "{'up': 5}".to_string(),
            votes: Some(Votes {
                count: Some(0),
                up_count: Some(0),
                down_count: Some(0),
                up: VoteIds::Unreadable("5".to_string()),
                down: VoteIds::List(Vec::new()),
            }),
            comment_thread_id: None,
            parent_id: None,
            parent_ids: None,
            sk: None,
        };

        let (out, info) = r.redact_record(record.clone());
        assert_eq!(out.body, "hi from <nameRedac_>");
        let votes = out.votes.as_ref().unwrap();
        assert_eq!(votes.up, VoteIds::Sentinel);
        assert_eq!(votes.down, VoteIds::List(Vec::new()));
        assert_eq!(out.kind, record.kind);
        assert_eq!(out.votes_text, record.votes_text);
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].redaction_type, RedactionType::ScreenName);
    }
}
