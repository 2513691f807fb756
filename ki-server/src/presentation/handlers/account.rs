use axum::{
    Form,
    extract::{Query, State},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::account::{ChangePasswordForm, LogOnForm, RegisterForm};
use crate::presentation::AppState;
use crate::presentation::action_result::{ActionResponse, ViewDto};
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct ReturnUrlQuery {
    #[serde(rename = "ReturnUrl", alias = "returnUrl")]
    pub(crate) return_url: Option<String>,
}

#[utoipa::path(
    get,
    path = "/Account/LogOn",
    tag = "account",
    responses((status = 200, description = "Log on form", body = ViewDto))
)]
pub(crate) async fn log_on_form(State(state): State<AppState>) -> ActionResponse {
    state.respond(state.account.log_on_form())
}

#[utoipa::path(
    post,
    path = "/Account/LogOn",
    tag = "account",
    params(ReturnUrlQuery),
    request_body(content = LogOnForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed in; redirects to the return URL or home"),
        (status = 422, description = "Form redisplayed with errors", body = ViewDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn log_on(
    State(state): State<AppState>,
    Query(query): Query<ReturnUrlQuery>,
    Form(mut form): Form<LogOnForm>,
) -> AppResult<ActionResponse> {
    if form.return_url.is_none() {
        form.return_url = query.return_url;
    }
    let outcome = state.account.log_on(form).await?;
    Ok(state.respond(outcome))
}

#[utoipa::path(
    get,
    path = "/Account/LogOff",
    tag = "account",
    responses((status = 303, description = "Session cleared; redirects home"))
)]
pub(crate) async fn log_off(State(state): State<AppState>) -> ActionResponse {
    state.respond(state.account.log_off())
}

#[utoipa::path(
    get,
    path = "/Account/Register",
    tag = "account",
    responses((status = 200, description = "Registration form", body = ViewDto))
)]
pub(crate) async fn register_form(State(state): State<AppState>) -> ActionResponse {
    state.respond(state.account.register_form())
}

#[utoipa::path(
    post,
    path = "/Account/Register",
    tag = "account",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered and signed in; redirects home"),
        (status = 422, description = "Form redisplayed with errors", body = ViewDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<ActionResponse> {
    let outcome = state.account.register(form).await?;
    Ok(state.respond(outcome))
}

#[utoipa::path(
    get,
    path = "/Account/ChangePassword",
    tag = "account",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Change password form", body = ViewDto),
        (status = 401, description = "Not signed in")
    )
)]
pub(crate) async fn change_password_form(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> ActionResponse {
    state.respond(state.account.change_password_form(&identity))
}

#[utoipa::path(
    post,
    path = "/Account/ChangePassword",
    tag = "account",
    security(("session_cookie" = [])),
    request_body(content = ChangePasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Password changed; redirects to the confirmation view"),
        (status = 401, description = "Not signed in"),
        (status = 422, description = "Form redisplayed with errors", body = ViewDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn change_password(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Form(form): Form<ChangePasswordForm>,
) -> AppResult<ActionResponse> {
    let outcome = state.account.change_password(&identity, form).await?;
    Ok(state.respond(outcome))
}

#[utoipa::path(
    get,
    path = "/Account/ChangePasswordSuccess",
    tag = "account",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Password change confirmation", body = ViewDto),
        (status = 401, description = "Not signed in")
    )
)]
pub(crate) async fn change_password_success(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> ActionResponse {
    state.respond(state.account.change_password_success(&identity))
}
