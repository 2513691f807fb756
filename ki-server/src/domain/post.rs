use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::error::DomainError;

pub(crate) const TITLE_MAX_CHARS: usize = 64;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) is_published: bool,
    pub(crate) published_at: Option<DateTime<Utc>>,
    pub(crate) expires_at: Option<DateTime<Utc>>,
    pub(crate) content: String,
    pub(crate) is_comments_enabled: bool,
    pub(crate) published_by: Uuid,
}

#[derive(Debug, Clone)]
pub(crate) struct PostRecord {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) is_published: bool,
    pub(crate) published_at: Option<DateTime<Utc>>,
    pub(crate) expires_at: Option<DateTime<Utc>>,
    pub(crate) content: String,
    pub(crate) is_comments_enabled: bool,
    pub(crate) published_by: Uuid,
}

impl Post {
    pub(crate) fn new(record: PostRecord) -> Result<Self, DomainError> {
        if record.id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let title = normalize_title(&record.title)?;

        if let (Some(published_at), Some(expires_at)) = (record.published_at, record.expires_at)
            && expires_at < published_at
        {
            return Err(DomainError::Validation {
                field: "expires_at",
                message: "must be >= published_at",
            });
        }

        Ok(Self {
            id: record.id,
            title,
            is_published: record.is_published,
            published_at: record.published_at,
            expires_at: record.expires_at,
            content: record.content,
            is_comments_enabled: record.is_comments_enabled,
            published_by: record.published_by,
        })
    }

    pub(crate) fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.is_published
            && self.published_at.is_none_or(|at| at <= now)
            && self.expires_at.is_none_or(|at| at > now)
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..64 chars",
        });
    }
    Ok(title.to_string())
}
