//! Destination schema

use crate::{Result, StorageError};

/// Forum table columns, in insert order.
pub const FORUM_COLUMNS: [&str; 18] = [
    "type",
    "anonymous",
    "anonymous_to_peers",
    "at_position_list",
    "user_int_id",
    "body",
    "course_display_name",
    "created_at",
    "votes",
    "count",
    "down_count",
    "up_count",
    "up",
    "down",
    "comment_thread_id",
    "parent_id",
    "parent_ids",
    "sk",
];

/// Validate a `table` or `schema.table` name and return it quoted.
pub fn quote_table(name: &str) -> Result<String> {
    let parts: Vec<&str> = name.split('.').collect();
    let valid = parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if !valid {
        return Err(StorageError::InvalidTableName(name.to_string()));
    }

    Ok(parts
        .iter()
        .map(|part| format!("\"{}\"", part))
        .collect::<Vec<_>>()
        .join("."))
}

pub fn create_forum_table_sql(quoted_table: &str) -> String {
    format!(
        "CREATE TABLE {quoted_table} (
            type VARCHAR(20) NOT NULL,
            anonymous VARCHAR(10) NOT NULL,
            anonymous_to_peers VARCHAR(10) NOT NULL,
            at_position_list VARCHAR(200) NOT NULL,
            user_int_id INTEGER NOT NULL,
            body VARCHAR(2500) NOT NULL,
            course_display_name VARCHAR(100) NOT NULL,
            created_at DATETIME NOT NULL,
            votes VARCHAR(200) NOT NULL,
            count INTEGER NOT NULL,
            down_count INTEGER NOT NULL,
            up_count INTEGER NOT NULL,
            up VARCHAR(200) DEFAULT NULL,
            down VARCHAR(200) DEFAULT NULL,
            comment_thread_id VARCHAR(255) DEFAULT NULL,
            parent_id VARCHAR(255) DEFAULT NULL,
            parent_ids VARCHAR(255) DEFAULT NULL,
            sk VARCHAR(255) DEFAULT NULL
        )"
    )
}

pub fn insert_forum_sql(quoted_table: &str) -> String {
    let placeholders = vec!["?"; FORUM_COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted_table,
        FORUM_COLUMNS.join(", "),
        placeholders
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_table() {
        assert_eq!(quote_table("contents").unwrap(), "\"contents\"");
        assert_eq!(
            quote_table("main.UserGrade").unwrap(),
            "\"main\".\"UserGrade\""
        );
    }

    #[test]
    fn test_reject_bad_table_names() {
        for name in ["", "a.b.c", "1abc", "contents; DROP TABLE x", "con\"tents", "a."] {
            assert!(
                matches!(quote_table(name), Err(StorageError::InvalidTableName(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn test_insert_sql() {
        let sql = insert_forum_sql("\"contents\"");
        assert!(sql.starts_with("INSERT INTO \"contents\" (type, anonymous,"));
        assert!(sql.ends_with("?, ?)"));
        assert_eq!(sql.matches('?').count(), 18);
    }
}
