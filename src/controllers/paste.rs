use chrono::{DurationRound, Utc};
use tracing::{info, warn};

use crate::models::{
    Paste, PasteSummary, DEFAULT_EXPIRES, DEFAULT_SYNTAX, DEFAULT_TITLE, DEFAULT_VISIBILITY,
};
use crate::types::api::{NewPaste, Status};
use crate::{ApiError, App};

/// Number of entries in each listing.
pub const LISTING_LIMIT: u32 = 10;

/// Create a paste from submitted fields, filling in defaults.
///
/// A colliding id is replaced with a fresh one up to `limits.key_attempts`
/// times before giving up. At least one id is always tried.
pub async fn create(app: &App, new: NewPaste) -> crate::ApiResult<Paste> {
    let content = new
        .content
        .filter(|content| !content.trim().is_empty())
        .ok_or(ApiError::EmptyContent)?;

    // postgres keeps microseconds, so store exactly that everywhere
    let now = Utc::now();
    let created_at = now
        .duration_trunc(chrono::Duration::microseconds(1))
        .unwrap_or(now);

    let mut paste = Paste {
        id: String::new(),
        content,
        title: or_default(new.title, DEFAULT_TITLE),
        syntax: or_default(new.syntax, DEFAULT_SYNTAX),
        expires: or_default(new.expires, DEFAULT_EXPIRES),
        visibility: or_default(new.visibility, DEFAULT_VISIBILITY),
        created_at,
    };

    for attempt in 1..=app.config.limits.key_attempts.max(1) {
        paste.id = app.keys.generate();
        match app.database.insert_paste(&paste).await {
            Ok(()) => {
                info!(
                    "new paste: id='{id}', title='{title}', syntax='{syntax}', size={size}",
                    id = paste.id,
                    title = paste.title,
                    syntax = paste.syntax,
                    size = paste.content.len()
                );
                return Ok(paste);
            }
            Err(ApiError::Conflict) => {
                warn!("paste id '{}' already taken (attempt {attempt})", paste.id);
            }
            Err(err) => return Err(err),
        }
    }

    Err(ApiError::KeysExhausted)
}

pub async fn fetch(app: &App, id: &str) -> crate::ApiResult<Option<Paste>> {
    app.database.get_paste(id).await
}

pub async fn top(app: &App, limit: u32) -> crate::ApiResult<Vec<PasteSummary>> {
    app.database.top_pastes(limit).await
}

pub async fn recent(app: &App, limit: u32) -> crate::ApiResult<Vec<PasteSummary>> {
    app.database.recent_pastes(limit).await
}

/// Liveness only; does not touch the database.
pub fn healthcheck() -> Status {
    Status {
        status: "alive".to_owned(),
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}
