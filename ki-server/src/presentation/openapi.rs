use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::account::{ChangePasswordForm, LogOnForm, RegisterForm};
use crate::presentation::action_result::{SESSION_COOKIE_NAME, ViewDto};
use crate::presentation::handlers::home::{ListPostsResponseDto, PaginationQuery, PostDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::home::index,
        crate::presentation::handlers::home::post_details,
        crate::presentation::handlers::account::log_on_form,
        crate::presentation::handlers::account::log_on,
        crate::presentation::handlers::account::log_off,
        crate::presentation::handlers::account::register_form,
        crate::presentation::handlers::account::register,
        crate::presentation::handlers::account::change_password_form,
        crate::presentation::handlers::account::change_password,
        crate::presentation::handlers::account::change_password_success
    ),
    components(
        schemas(
            LogOnForm,
            RegisterForm,
            ChangePasswordForm,
            ViewDto,
            PaginationQuery,
            PostDto,
            ListPostsResponseDto
        )
    ),
    tags(
        (name = "home", description = "Published posts"),
        (name = "account", description = "Log on, registration and password changes")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
        );
        openapi.components = Some(components);
    }
}
