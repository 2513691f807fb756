use std::sync::Arc;

use crate::application::account_controller::{AccountController, ActionOutcome};
use crate::application::post_service::PostService;
use crate::infrastructure::jwt::JwtService;

use action_result::ActionResponse;

pub(crate) mod action_result;
pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) account: Arc<AccountController>,
    pub(crate) posts: Arc<PostService>,
    pub(crate) jwt: Arc<JwtService>,
    pub(crate) session_cookie_secure: bool,
}

impl AppState {
    pub(crate) fn new(
        account: Arc<AccountController>,
        posts: Arc<PostService>,
        jwt: Arc<JwtService>,
        session_cookie_secure: bool,
    ) -> Self {
        Self {
            account,
            posts,
            jwt,
            session_cookie_secure,
        }
    }

    pub(crate) fn respond(&self, outcome: ActionOutcome) -> ActionResponse {
        ActionResponse::new(outcome, self.session_cookie_secure)
    }
}
