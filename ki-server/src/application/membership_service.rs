use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::user::User;

/// Credential store behind the account workflows.
#[async_trait]
pub(crate) trait MembershipProvider: Send + Sync {
    fn min_required_password_length(&self) -> usize;

    async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, DomainError>;

    async fn validate_user(&self, username: &str, password: &str) -> Result<bool, DomainError>;

    async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, DomainError>;

    async fn get_user(&self, username: &str) -> Result<Option<User>, DomainError>;
}

#[derive(Clone)]
pub(crate) struct AccountMembershipService {
    provider: Arc<dyn MembershipProvider>,
}

impl AccountMembershipService {
    pub(crate) fn new(provider: Arc<dyn MembershipProvider>) -> Self {
        Self { provider }
    }

    pub(crate) fn min_password_length(&self) -> usize {
        self.provider.min_required_password_length()
    }

    pub(crate) async fn validate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, DomainError> {
        self.provider.validate_user(username, password).await
    }

    pub(crate) async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        self.provider.create_user(username, password, email).await
    }

    pub(crate) async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, DomainError> {
        if self.provider.get_user(username).await?.is_none() {
            debug!(username, "password change requested for unknown user");
            return Ok(false);
        }
        self.provider
            .change_password(username, old_password, new_password)
            .await
    }
}
