use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionTicket {
    pub(crate) token: String,
    pub(crate) max_age_seconds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionChange {
    SignedIn(SessionTicket),
    SignedOut,
}

pub(crate) trait FormsAuthentication: Send + Sync {
    fn sign_in(&self, username: &str, persistent: bool) -> Result<SessionChange, DomainError>;

    fn sign_out(&self) -> SessionChange;
}
