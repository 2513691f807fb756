use std::fmt;

/// Reasons a membership provider refuses to create a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MembershipCreateStatus {
    InvalidUserName,
    InvalidPassword,
    InvalidQuestion,
    InvalidAnswer,
    InvalidEmail,
    DuplicateUserName,
    DuplicateEmail,
    UserRejected,
    InvalidProviderUserKey,
    DuplicateProviderUserKey,
    ProviderError,
}

impl MembershipCreateStatus {
    #[cfg(test)]
    pub(crate) const ALL: [Self; 11] = [
        Self::InvalidUserName,
        Self::InvalidPassword,
        Self::InvalidQuestion,
        Self::InvalidAnswer,
        Self::InvalidEmail,
        Self::DuplicateUserName,
        Self::DuplicateEmail,
        Self::UserRejected,
        Self::InvalidProviderUserKey,
        Self::DuplicateProviderUserKey,
        Self::ProviderError,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUserName => "InvalidUserName",
            Self::InvalidPassword => "InvalidPassword",
            Self::InvalidQuestion => "InvalidQuestion",
            Self::InvalidAnswer => "InvalidAnswer",
            Self::InvalidEmail => "InvalidEmail",
            Self::DuplicateUserName => "DuplicateUserName",
            Self::DuplicateEmail => "DuplicateEmail",
            Self::UserRejected => "UserRejected",
            Self::InvalidProviderUserKey => "InvalidProviderUserKey",
            Self::DuplicateProviderUserKey => "DuplicateProviderUserKey",
            Self::ProviderError => "ProviderError",
        }
    }

    pub(crate) fn message(self) -> &'static str {
        match self {
            Self::DuplicateUserName => {
                "Username already exists. Please enter a different user name."
            }
            Self::DuplicateEmail => {
                "A username for that e-mail address already exists. Please enter a different e-mail address."
            }
            Self::InvalidPassword => {
                "The password provided is invalid. Please enter a valid password value."
            }
            Self::InvalidEmail => {
                "The e-mail address provided is invalid. Please check the value and try again."
            }
            Self::InvalidAnswer => {
                "The password retrieval answer provided is invalid. Please check the value and try again."
            }
            Self::InvalidQuestion => {
                "The password retrieval question provided is invalid. Please check the value and try again."
            }
            Self::InvalidUserName => {
                "The user name provided is invalid. Please check the value and try again."
            }
            Self::ProviderError => {
                "The authentication provider returned an error. Please verify your entry and try again. If the problem persists, please contact your system administrator."
            }
            Self::UserRejected => {
                "The user creation request has been canceled. Please verify your entry and try again. If the problem persists, please contact your system administrator."
            }
            Self::InvalidProviderUserKey => {
                "The user key provided is invalid. Please verify your entry and try again. If the problem persists, please contact your system administrator."
            }
            Self::DuplicateProviderUserKey => {
                "The user key provided is already in use. Please verify your entry and try again. If the problem persists, please contact your system administrator."
            }
        }
    }
}

impl fmt::Display for MembershipCreateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
