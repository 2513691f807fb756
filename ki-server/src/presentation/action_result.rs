use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::InvalidHeaderValue, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use super::app_error::AppError;
use crate::application::account_controller::{ActionOutcome, ActionResult, ViewResult};
use crate::application::forms_auth::SessionChange;
use crate::domain::model_state::ModelState;

pub(crate) const SESSION_COOKIE_NAME: &str = "ki_auth";

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ViewDto {
    #[schema(value_type = String)]
    pub(crate) view: &'static str,
    #[schema(value_type = std::collections::HashMap<String, Vec<String>>)]
    pub(crate) errors: ModelState,
    pub(crate) password_length: Option<usize>,
}

impl From<ViewResult> for ViewDto {
    fn from(view: ViewResult) -> Self {
        Self {
            view: view.view,
            errors: view.model_state,
            password_length: view.password_length,
        }
    }
}

pub(crate) struct ActionResponse {
    outcome: ActionOutcome,
    secure_cookie: bool,
}

impl ActionResponse {
    pub(crate) fn new(outcome: ActionOutcome, secure_cookie: bool) -> Self {
        Self {
            outcome,
            secure_cookie,
        }
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        let mut response = match self.outcome.result {
            ActionResult::View(view) => {
                let status = if view.model_state.is_valid() {
                    StatusCode::OK
                } else {
                    StatusCode::UNPROCESSABLE_ENTITY
                };
                (status, Json(ViewDto::from(view))).into_response()
            }
            ActionResult::RedirectToRoute(target) => Redirect::to(&target.path()).into_response(),
            ActionResult::Redirect(url) => Redirect::to(&url).into_response(),
        };

        if let Some(change) = self.outcome.session {
            match session_cookie(&change, self.secure_cookie) {
                Ok(cookie) => {
                    response.headers_mut().append(SET_COOKIE, cookie);
                }
                Err(err) => return AppError::Internal(err.to_string()).into_response(),
            }
        }
        response
    }
}

fn session_cookie(
    change: &SessionChange,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = match change {
        SessionChange::SignedIn(ticket) => {
            let mut cookie = format!(
                "{SESSION_COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax",
                ticket.token
            );
            if let Some(max_age) = ticket.max_age_seconds {
                cookie.push_str(&format!("; Max-Age={max_age}"));
            }
            cookie
        }
        SessionChange::SignedOut => {
            format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
        }
    };
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
