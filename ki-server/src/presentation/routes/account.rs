use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::handlers::account::{
    change_password, change_password_form, change_password_success, log_off, log_on,
    log_on_form, register, register_form,
};
use crate::presentation::middleware::auth::session_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/LogOn", get(log_on_form).post(log_on))
        .route("/LogOff", get(log_off))
        .route("/Register", get(register_form).post(register));

    let protected = Router::new()
        .route(
            "/ChangePassword",
            get(change_password_form).post(change_password),
        )
        .route("/ChangePasswordSuccess", get(change_password_success))
        .layer(middleware::from_fn_with_state(
            state,
            session_auth_middleware,
        ));

    public.merge(protected)
}
