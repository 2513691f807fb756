use axum::{Json, Router, routing::get};
use serde::Serialize;

use super::AppState;

pub(crate) mod account;
pub(crate) mod home;

pub(crate) fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .merge(home::router())
        .nest("/Account", account::router(state.clone()))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

async fn healthz() -> Json<Health> {
    Json(Health { status: "ok" })
}
