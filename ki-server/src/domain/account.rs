use serde::Deserialize;
use utoipa::ToSchema;

use super::model_state::ModelState;

pub(crate) const PASSWORD_MISMATCH: &str =
    "The new password and confirmation password do not match.";

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogOnForm {
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) password: String,
    #[serde(default)]
    pub(crate) remember_me: bool,
    #[serde(default)]
    pub(crate) return_url: Option<String>,
}

impl LogOnForm {
    pub(crate) fn validate(&self) -> ModelState {
        let mut state = ModelState::new();
        if self.username.is_empty() {
            state.add_error("username", "You must specify a username.");
        }
        if self.password.is_empty() {
            state.add_error("password", "You must specify a password.");
        }
        state
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterForm {
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) password: String,
    #[serde(default)]
    pub(crate) confirm_password: String,
}

impl RegisterForm {
    pub(crate) fn validate(&self, min_password_length: usize) -> ModelState {
        let mut state = ModelState::new();
        if self.username.is_empty() {
            state.add_error("username", "You must specify a username.");
        }
        if self.email.is_empty() {
            state.add_error("email", "You must specify an email address.");
        }
        if is_too_short(&self.password, min_password_length) {
            state.add_error(
                "password",
                format!("You must specify a password of {min_password_length} or more characters."),
            );
        } else if self.password != self.confirm_password {
            state.add_form_error(PASSWORD_MISMATCH);
        }
        state
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordForm {
    #[serde(default)]
    pub(crate) current_password: String,
    #[serde(default)]
    pub(crate) new_password: String,
    #[serde(default)]
    pub(crate) confirm_password: String,
}

impl ChangePasswordForm {
    pub(crate) fn validate(&self, min_password_length: usize) -> ModelState {
        let mut state = ModelState::new();
        if self.current_password.is_empty() {
            state.add_error("currentPassword", "You must specify a current password.");
        }
        if is_too_short(&self.new_password, min_password_length) {
            state.add_error(
                "newPassword",
                format!(
                    "You must specify a new password of {min_password_length} or more characters."
                ),
            );
        } else if self.new_password != self.confirm_password {
            state.add_form_error(PASSWORD_MISMATCH);
        }
        state
    }
}

fn is_too_short(password: &str, min_length: usize) -> bool {
    password.is_empty() || password.chars().count() < min_length
}
