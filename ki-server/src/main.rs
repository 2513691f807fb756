use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;
#[cfg(test)]
mod test_support;

use application::account_controller::AccountController;
use application::membership_service::AccountMembershipService;
use application::post_service::PostService;
use data::repositories::postgres::membership_provider::{PasswordPolicy, PostgresMembershipProvider};
use data::repositories::postgres::post_repository::PostgresPostRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::forms_auth::CookieFormsAuthentication;
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.db_max_connections).await?;
    run_migrations(&pool).await?;

    let jwt = Arc::new(JwtService::new(&settings.session_secret));

    let provider = PostgresMembershipProvider::new(
        pool.clone(),
        settings.membership_application_id,
        PasswordPolicy {
            min_required_password_length: settings.min_required_password_length,
            requires_unique_email: settings.requires_unique_email,
        },
    );
    let forms_auth = CookieFormsAuthentication::new(
        jwt.clone(),
        settings.session_ttl_seconds,
        settings.persistent_session_ttl_seconds,
    );
    let account = AccountController::new(
        Arc::new(forms_auth),
        AccountMembershipService::new(Arc::new(provider)),
    );
    let posts = PostService::new(Arc::new(PostgresPostRepository::new(pool)));

    let state = AppState::new(
        Arc::new(account),
        Arc::new(posts),
        jwt,
        settings.session_cookie_secure,
    );

    info!(
        application_id = %settings.membership_application_id,
        "membership store ready"
    );
    server::run_http(&settings, state).await
}
