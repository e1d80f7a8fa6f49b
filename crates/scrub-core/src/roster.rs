//! Roster rows: the in-the-clear identities of forum participants

use serde::{Deserialize, Serialize};

/// One row of the user roster. The author id is kept as read; it is
/// validated when the identity cache is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterRow {
    pub author_id: String,
    pub full_name: Option<String>,
    pub screen_name: Option<String>,
    pub alias: Option<String>,
}
