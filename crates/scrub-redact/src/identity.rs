//! Identity cache: known forum users keyed by author id

use std::collections::{HashMap, HashSet};

use scrub_core::RosterRow;

use crate::{RedactError, Result};

/// Placeholder identity for authors missing from the roster.
pub const PLACEHOLDER_NAME: &str = "xxxx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityEntry {
    pub full_name: String,
    pub screen_name: String,
    pub alias: String,
}

/// Author id -> identity, plus the first tokens of every full name.
///
/// Built once before redaction starts and never mutated afterwards.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: HashMap<i64, IdentityEntry>,
    first_tokens: HashSet<String>,
}

impl IdentityCache {
    /// Build the cache from roster rows. A row whose author id is not an
    /// integer aborts the build.
    pub fn build<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = RosterRow>,
    {
        let mut cache = Self::default();

        for row in rows {
            let author_id: i64 = row
                .author_id
                .trim()
                .parse()
                .map_err(|_| RedactError::InvalidAuthorId(row.author_id.clone()))?;

            let full_name = row.full_name.unwrap_or_default();
            if let Some(first) = full_name.split_whitespace().next() {
                cache.first_tokens.insert(first.to_string());
            }

            cache.entries.insert(
                author_id,
                IdentityEntry {
                    full_name,
                    screen_name: row.screen_name.unwrap_or_default(),
                    alias: row.alias.unwrap_or_default(),
                },
            );
        }

        tracing::info!("Loaded {} users into identity cache", cache.entries.len());
        Ok(cache)
    }

    pub fn get(&self, author_id: i64) -> Option<&IdentityEntry> {
        self.entries.get(&author_id)
    }

    /// `(full_name, screen_name)` for an author, or the placeholder pair.
    pub fn names_for(&self, author_id: i64) -> (&str, &str) {
        match self.get(author_id) {
            Some(entry) => (entry.full_name.as_str(), entry.screen_name.as_str()),
            None => (PLACEHOLDER_NAME, PLACEHOLDER_NAME),
        }
    }

    /// First whitespace token of every known full name.
    pub fn first_tokens(&self) -> &HashSet<String> {
        &self.first_tokens
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, screen: &str, alias: Option<&str>) -> RosterRow {
        RosterRow {
            author_id: id.to_string(),
            full_name: Some(name.to_string()),
            screen_name: Some(screen.to_string()),
            alias: alias.map(String::from),
        }
    }

    #[test]
    fn test_build_and_lookup() {
        let cache = IdentityCache::build(vec![
            row("1", "Jane Smith", "jdoe99", Some("a1b2")),
            row(" 2 ", "Bob", "bobby", None),
        ])
        .unwrap();

        assert_eq!(cache.len(), 2);
        let jane = cache.get(1).unwrap();
        assert_eq!(jane.full_name, "Jane Smith");
        assert_eq!(jane.alias, "a1b2");
        assert_eq!(cache.get(2).unwrap().alias, "");
        assert_eq!(cache.names_for(2), ("Bob", "bobby"));
    }

    #[test]
    fn test_missing_author_gets_placeholder() {
        let cache = IdentityCache::build(Vec::new()).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.names_for(99), ("xxxx", "xxxx"));
    }

    #[test]
    fn test_non_integer_id_aborts() {
        let err = IdentityCache::build(vec![
            row("1", "Jane Smith", "jdoe99", None),
            row("abc", "Bob", "bobby", None),
        ])
        .unwrap_err();
        assert!(matches!(err, RedactError::InvalidAuthorId(id) if id == "abc"));
    }

    #[test]
    fn test_first_tokens() {
        let cache = IdentityCache::build(vec![
            row("1", "Jane Smith", "j", None),
            row("2", "Jane Doe", "d", None),
            row("3", "  Carlos Ruiz", "c", None),
            row("4", "", "e", None),
        ])
        .unwrap();

        let tokens = cache.first_tokens();
        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains("Jane"));
        assert!(tokens.contains("Carlos"));
    }
}
