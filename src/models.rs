use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const DEFAULT_TITLE: &str = "Untitled Paste";
pub const DEFAULT_SYNTAX: &str = "none";
pub const DEFAULT_EXPIRES: &str = "never";
pub const DEFAULT_VISIBILITY: &str = "public";

/// A stored paste. Records are written once and never modified.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Paste {
    pub id: String,
    pub content: String,
    pub title: String,
    pub syntax: String,
    /// Expiry policy label, stored as given and never enforced.
    pub expires: String,
    /// Visibility label, stored as given and never used to filter listings.
    pub visibility: String,
    pub created_at: DateTime<Utc>,
}

impl Paste {
    /// Path under which the paste is viewable.
    pub fn path(&self) -> String {
        format!("/paste/{}", self.id)
    }
}

/// Listing projection of a paste.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct PasteSummary {
    pub id: String,
    pub title: String,
}
