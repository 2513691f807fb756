use std::sync::Arc;

use tracing::{info, warn};

use super::forms_auth::{FormsAuthentication, SessionChange};
use super::membership_service::AccountMembershipService;
use crate::domain::account::{ChangePasswordForm, LogOnForm, RegisterForm};
use crate::domain::error::DomainError;
use crate::domain::model_state::ModelState;
use crate::domain::user::Identity;

const INVALID_CREDENTIALS: &str = "The username or password provided is incorrect.";
const CHANGE_PASSWORD_FAILED: &str =
    "The current password is incorrect or the new password is invalid.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RouteTarget {
    pub(crate) controller: &'static str,
    pub(crate) action: &'static str,
}

impl RouteTarget {
    pub(crate) const HOME: Self = Self {
        controller: "Home",
        action: "Index",
    };
    pub(crate) const CHANGE_PASSWORD_SUCCESS: Self = Self {
        controller: "Account",
        action: "ChangePasswordSuccess",
    };

    pub(crate) fn path(&self) -> String {
        if *self == Self::HOME {
            "/".to_string()
        } else {
            format!("/{}/{}", self.controller, self.action)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ViewResult {
    pub(crate) view: &'static str,
    pub(crate) model_state: ModelState,
    pub(crate) password_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ActionResult {
    View(ViewResult),
    RedirectToRoute(RouteTarget),
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ActionOutcome {
    pub(crate) result: ActionResult,
    pub(crate) session: Option<SessionChange>,
}

impl ActionOutcome {
    fn view(view: &'static str, model_state: ModelState, password_length: Option<usize>) -> Self {
        Self {
            result: ActionResult::View(ViewResult {
                view,
                model_state,
                password_length,
            }),
            session: None,
        }
    }

    fn redirect_to_route(target: RouteTarget, session: Option<SessionChange>) -> Self {
        Self {
            result: ActionResult::RedirectToRoute(target),
            session,
        }
    }
}

pub(crate) struct AccountController {
    forms_auth: Arc<dyn FormsAuthentication>,
    membership: AccountMembershipService,
}

impl AccountController {
    pub(crate) fn new(
        forms_auth: Arc<dyn FormsAuthentication>,
        membership: AccountMembershipService,
    ) -> Self {
        Self {
            forms_auth,
            membership,
        }
    }

    pub(crate) fn log_on_form(&self) -> ActionOutcome {
        ActionOutcome::view("LogOn", ModelState::new(), None)
    }

    pub(crate) async fn log_on(&self, form: LogOnForm) -> Result<ActionOutcome, DomainError> {
        let mut model_state = form.validate();
        if !model_state.is_valid() {
            return Ok(ActionOutcome::view("LogOn", model_state, None));
        }

        if !self
            .membership
            .validate_user(&form.username, &form.password)
            .await?
        {
            warn!(username = %form.username, "log on rejected");
            model_state.add_form_error(INVALID_CREDENTIALS);
            return Ok(ActionOutcome::view("LogOn", model_state, None));
        }

        let session = self.forms_auth.sign_in(&form.username, form.remember_me)?;
        info!(username = %form.username, persistent = form.remember_me, "signed in");

        let result = match form.return_url.filter(|url| is_local_url(url)) {
            Some(url) => ActionResult::Redirect(url),
            None => ActionResult::RedirectToRoute(RouteTarget::HOME),
        };
        Ok(ActionOutcome {
            result,
            session: Some(session),
        })
    }

    pub(crate) fn log_off(&self) -> ActionOutcome {
        let session = self.forms_auth.sign_out();
        ActionOutcome::redirect_to_route(RouteTarget::HOME, Some(session))
    }

    pub(crate) fn register_form(&self) -> ActionOutcome {
        ActionOutcome::view(
            "Register",
            ModelState::new(),
            Some(self.membership.min_password_length()),
        )
    }

    pub(crate) async fn register(&self, form: RegisterForm) -> Result<ActionOutcome, DomainError> {
        let password_length = self.membership.min_password_length();
        let mut model_state = form.validate(password_length);
        if !model_state.is_valid() {
            return Ok(ActionOutcome::view(
                "Register",
                model_state,
                Some(password_length),
            ));
        }

        match self
            .membership
            .create_user(&form.username, &form.email, &form.password)
            .await
        {
            Ok(user) => {
                info!(user_id = %user.user_id, username = %user.user_name, "user registered");
                let session = self.forms_auth.sign_in(&form.username, false)?;
                Ok(ActionOutcome::redirect_to_route(
                    RouteTarget::HOME,
                    Some(session),
                ))
            }
            Err(DomainError::CreateRejected(status)) => {
                warn!(username = %form.username, %status, "registration rejected");
                model_state.add_form_error(status.message());
                Ok(ActionOutcome::view(
                    "Register",
                    model_state,
                    Some(password_length),
                ))
            }
            Err(err) => Err(err),
        }
    }

    pub(crate) fn change_password_form(&self, _identity: &Identity) -> ActionOutcome {
        ActionOutcome::view(
            "ChangePassword",
            ModelState::new(),
            Some(self.membership.min_password_length()),
        )
    }

    pub(crate) async fn change_password(
        &self,
        identity: &Identity,
        form: ChangePasswordForm,
    ) -> Result<ActionOutcome, DomainError> {
        let password_length = self.membership.min_password_length();
        let mut model_state = form.validate(password_length);
        if !model_state.is_valid() {
            return Ok(ActionOutcome::view(
                "ChangePassword",
                model_state,
                Some(password_length),
            ));
        }

        let changed = self
            .membership
            .change_password(
                &identity.user_name,
                &form.current_password,
                &form.new_password,
            )
            .await?;
        if !changed {
            warn!(username = %identity.user_name, "password change rejected");
            model_state.add_form_error(CHANGE_PASSWORD_FAILED);
            return Ok(ActionOutcome::view(
                "ChangePassword",
                model_state,
                Some(password_length),
            ));
        }

        info!(username = %identity.user_name, "password changed");
        Ok(ActionOutcome::redirect_to_route(
            RouteTarget::CHANGE_PASSWORD_SUCCESS,
            None,
        ))
    }

    pub(crate) fn change_password_success(&self, _identity: &Identity) -> ActionOutcome {
        ActionOutcome::view("ChangePasswordSuccess", ModelState::new(), None)
    }
}

/// Whether `url` stays on this site: relative paths only, no scheme,
/// authority or protocol-relative prefix.
pub(crate) fn is_local_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    if url.starts_with("//") || url.starts_with("/\\") || url.starts_with('\\') {
        return false;
    }
    if url.chars().any(char::is_control) {
        return false;
    }
    let before_path = url.split(['/', '?', '#']).next().unwrap_or_default();
    !before_path.contains(':')
}
