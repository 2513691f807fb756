use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct User {
    pub(crate) user_id: Uuid,
    pub(crate) application_id: Uuid,
    pub(crate) user_name: String,
    pub(crate) lowered_user_name: String,
    pub(crate) mobile_alias: Option<String>,
    pub(crate) is_anonymous: bool,
    pub(crate) last_activity_date: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        user_id: Uuid,
        application_id: Uuid,
        user_name: impl Into<String>,
        last_activity_date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let user_name = user_name.into().trim().to_string();
        if user_name.is_empty() || user_name.chars().count() > 256 {
            return Err(DomainError::Validation {
                field: "user_name",
                message: "must be 1..256 chars",
            });
        }

        Ok(Self {
            user_id,
            application_id,
            lowered_user_name: lower_user_name(&user_name),
            user_name,
            mobile_alias: None,
            is_anonymous: false,
            last_activity_date,
        })
    }

    pub(crate) fn with_mobile_alias(mut self, mobile_alias: Option<String>) -> Self {
        self.mobile_alias = mobile_alias.filter(|alias| !alias.is_empty());
        self
    }

    pub(crate) fn anonymous(mut self, is_anonymous: bool) -> Self {
        self.is_anonymous = is_anonymous;
        self
    }
}

pub(crate) fn lower_user_name(user_name: &str) -> String {
    user_name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) user_name: String,
}

impl Identity {
    pub(crate) fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
        }
    }
}
