use thiserror::Error;

use super::membership::MembershipCreateStatus;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("user creation rejected: {0:?}")]
    CreateRejected(MembershipCreateStatus),

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}
