use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::application::membership_service::MembershipProvider;
use crate::domain::error::DomainError;
use crate::domain::membership::MembershipCreateStatus;
use crate::domain::user::{User, lower_user_name};
use crate::infrastructure::password::PasswordHasher;

const USER_NAME_UNIQUE: &str = "aspnet_Users_application_lowered_name_key";
const MEMBERSHIP_PKEY: &str = "aspnet_Membership_pkey";
const USERS_PKEY: &str = "aspnet_Users_pkey";

#[derive(Debug, Clone, Copy)]
pub(crate) struct PasswordPolicy {
    pub(crate) min_required_password_length: usize,
    pub(crate) requires_unique_email: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct PostgresMembershipProvider {
    pool: PgPool,
    application_id: Uuid,
    policy: PasswordPolicy,
    hasher: PasswordHasher,
}

impl PostgresMembershipProvider {
    pub(crate) fn new(pool: PgPool, application_id: Uuid, policy: PasswordPolicy) -> Self {
        Self {
            pool,
            application_id,
            policy,
            hasher: PasswordHasher,
        }
    }

    async fn find_password_hash(&self, username: &str) -> Result<Option<String>, DomainError> {
        let hash = sqlx::query_scalar::<_, String>(
            r#"
            SELECT m."Password"
            FROM "aspnet_Membership" m
            JOIN "aspnet_Users" u ON u."UserId" = m."UserId"
            WHERE u."ApplicationId" = $1 AND u."LoweredUserName" = $2
            "#,
        )
        .bind(self.application_id)
        .bind(lower_user_name(username))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(hash)
    }

    async fn check_password(&self, username: &str, password: &str) -> Result<bool, DomainError> {
        match self.find_password_hash(username).await? {
            Some(hash) => self.hasher.verify(password, &hash),
            None => {
                self.hasher.verify_dummy(password)?;
                Ok(false)
            }
        }
    }
}

#[derive(FromRow)]
struct UserRow {
    #[sqlx(rename = "UserId")]
    user_id: Uuid,
    #[sqlx(rename = "ApplicationId")]
    application_id: Uuid,
    #[sqlx(rename = "UserName")]
    user_name: String,
    #[sqlx(rename = "MobileAlias")]
    mobile_alias: Option<String>,
    #[sqlx(rename = "IsAnonymous")]
    is_anonymous: bool,
    #[sqlx(rename = "LastActivityDate")]
    last_activity_date: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user = User::new(
            row.user_id,
            row.application_id,
            row.user_name,
            row.last_activity_date,
        )
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(user
            .with_mobile_alias(row.mobile_alias)
            .anonymous(row.is_anonymous))
    }
}

#[async_trait]
impl MembershipProvider for PostgresMembershipProvider {
    fn min_required_password_length(&self) -> usize {
        self.policy.min_required_password_length
    }

    async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, DomainError> {
        let (username, lowered_user_name) = user_name_keys(username);
        let status = precheck_new_user(username, password, email, self.policy);
        if let Some(status) = status {
            return Err(DomainError::CreateRejected(status));
        }

        let lowered_email = email.trim().to_lowercase();
        let password_hash = self.hasher.hash(password)?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let name_taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM "aspnet_Users"
                WHERE "ApplicationId" = $1 AND "LoweredUserName" = $2
            )
            "#,
        )
        .bind(self.application_id)
        .bind(&lowered_user_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;
        if name_taken {
            return Err(DomainError::CreateRejected(
                MembershipCreateStatus::DuplicateUserName,
            ));
        }

        if self.policy.requires_unique_email {
            let email_taken = sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM "aspnet_Membership"
                    WHERE "ApplicationId" = $1 AND "LoweredEmail" = $2
                )
                "#,
            )
            .bind(self.application_id)
            .bind(&lowered_email)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;
            if email_taken {
                return Err(DomainError::CreateRejected(
                    MembershipCreateStatus::DuplicateEmail,
                ));
            }
        }

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO "aspnet_Users"
                ("UserId", "ApplicationId", "UserName", "LoweredUserName", "IsAnonymous", "LastActivityDate")
            VALUES ($1, $2, $3, $4, FALSE, NOW())
            RETURNING "UserId", "ApplicationId", "UserName", "MobileAlias", "IsAnonymous", "LastActivityDate"
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(self.application_id)
        .bind(username)
        .bind(&lowered_user_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO "aspnet_Membership"
                ("UserId", "ApplicationId", "Password", "Email", "LoweredEmail")
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(row.user_id)
        .bind(self.application_id)
        .bind(&password_hash)
        .bind(email.trim())
        .bind(&lowered_email)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        User::try_from(row)
    }

    async fn validate_user(&self, username: &str, password: &str) -> Result<bool, DomainError> {
        if !self.check_password(username, password).await? {
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE "aspnet_Users"
            SET "LastActivityDate" = NOW()
            WHERE "ApplicationId" = $1 AND "LoweredUserName" = $2
            "#,
        )
        .bind(self.application_id)
        .bind(lower_user_name(username))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(true)
    }

    async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, DomainError> {
        if new_password.chars().count() < self.policy.min_required_password_length {
            debug!(username, "new password shorter than policy allows");
            return Ok(false);
        }
        if !self.check_password(username, old_password).await? {
            return Ok(false);
        }

        let password_hash = self.hasher.hash(new_password)?;
        let result = sqlx::query(
            r#"
            UPDATE "aspnet_Membership" m
            SET "Password" = $3,
                "LastPasswordChangedDate" = NOW()
            FROM "aspnet_Users" u
            WHERE u."UserId" = m."UserId"
              AND u."ApplicationId" = $1
              AND u."LoweredUserName" = $2
            "#,
        )
        .bind(self.application_id)
        .bind(lower_user_name(username))
        .bind(&password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "UserId", "ApplicationId", "UserName", "MobileAlias", "IsAnonymous", "LastActivityDate"
            FROM "aspnet_Users"
            WHERE "ApplicationId" = $1 AND "LoweredUserName" = $2
            "#,
        )
        .bind(self.application_id)
        .bind(lower_user_name(username))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(User::try_from).transpose()
    }
}

fn user_name_keys(username: &str) -> (&str, String) {
    let username = username.trim();
    (username, lower_user_name(username))
}

fn precheck_new_user(
    username: &str,
    password: &str,
    email: &str,
    policy: PasswordPolicy,
) -> Option<MembershipCreateStatus> {
    let username = username.trim();
    if username.is_empty() || username.chars().count() > 256 {
        return Some(MembershipCreateStatus::InvalidUserName);
    }
    if password.chars().count() < policy.min_required_password_length {
        return Some(MembershipCreateStatus::InvalidPassword);
    }
    let email = email.trim();
    if email.is_empty() || email.chars().count() > 256 {
        return Some(MembershipCreateStatus::InvalidEmail);
    }
    None
}

fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23505")
        && let Some(status) = status_for_constraint(db_err.constraint())
    {
        return DomainError::CreateRejected(status);
    }
    DomainError::Unexpected(err.to_string())
}

fn status_for_constraint(constraint: Option<&str>) -> Option<MembershipCreateStatus> {
    match constraint? {
        USER_NAME_UNIQUE => Some(MembershipCreateStatus::DuplicateUserName),
        USERS_PKEY | MEMBERSHIP_PKEY => Some(MembershipCreateStatus::DuplicateProviderUserKey),
        _ => None,
    }
}
