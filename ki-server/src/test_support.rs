use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::forms_auth::{FormsAuthentication, SessionChange, SessionTicket};
use crate::application::membership_service::MembershipProvider;
use crate::data::post_repository::{Pagination, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::membership::MembershipCreateStatus;
use crate::domain::post::Post;
use crate::domain::user::User;

/// Accepts `someUser`/`goodPass`, creates only `someUser`/`goodPass`/`email`
/// (any other e-mail names the status to reject with) and changes a
/// password only to `newPass`.
#[derive(Clone)]
pub(crate) struct FakeMembershipProvider {
    create_calls: Arc<Mutex<Vec<(String, String, String)>>>,
    change_password_calls: Arc<Mutex<usize>>,
    knows_users: bool,
    failing: bool,
}

impl FakeMembershipProvider {
    pub(crate) fn new() -> Self {
        Self {
            create_calls: Arc::new(Mutex::new(Vec::new())),
            change_password_calls: Arc::new(Mutex::new(0)),
            knows_users: true,
            failing: false,
        }
    }

    pub(crate) fn without_users(mut self) -> Self {
        self.knows_users = false;
        self
    }

    pub(crate) fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub(crate) fn create_calls(&self) -> Vec<(String, String, String)> {
        self.create_calls
            .lock()
            .expect("create_calls mutex poisoned")
            .clone()
    }

    pub(crate) fn change_password_calls(&self) -> usize {
        *self
            .change_password_calls
            .lock()
            .expect("change_password_calls mutex poisoned")
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.failing {
            return Err(DomainError::Unexpected("membership store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipProvider for FakeMembershipProvider {
    fn min_required_password_length(&self) -> usize {
        6
    }

    async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, DomainError> {
        self.check_available()?;
        self.create_calls
            .lock()
            .expect("create_calls mutex poisoned")
            .push((username.to_string(), password.to_string(), email.to_string()));

        if username == "someUser" && password == "goodPass" && email == "email" {
            return Ok(sample_user(username));
        }
        let status = status_named(email).unwrap_or(MembershipCreateStatus::ProviderError);
        Err(DomainError::CreateRejected(status))
    }

    async fn validate_user(&self, username: &str, password: &str) -> Result<bool, DomainError> {
        self.check_available()?;
        Ok(username == "someUser" && password == "goodPass")
    }

    async fn change_password(
        &self,
        _username: &str,
        _old_password: &str,
        new_password: &str,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        *self
            .change_password_calls
            .lock()
            .expect("change_password_calls mutex poisoned") += 1;
        Ok(new_password == "newPass")
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.check_available()?;
        Ok(self.knows_users.then(|| sample_user(username)))
    }
}

#[derive(Default)]
pub(crate) struct RecordingFormsAuth {
    sign_ins: Mutex<Vec<(String, bool)>>,
    sign_outs: Mutex<usize>,
}

impl RecordingFormsAuth {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn sign_ins(&self) -> Vec<(String, bool)> {
        self.sign_ins
            .lock()
            .expect("sign_ins mutex poisoned")
            .clone()
    }

    pub(crate) fn sign_outs(&self) -> usize {
        *self.sign_outs.lock().expect("sign_outs mutex poisoned")
    }
}

impl FormsAuthentication for RecordingFormsAuth {
    fn sign_in(&self, username: &str, persistent: bool) -> Result<SessionChange, DomainError> {
        self.sign_ins
            .lock()
            .expect("sign_ins mutex poisoned")
            .push((username.to_string(), persistent));
        Ok(SessionChange::SignedIn(SessionTicket {
            token: format!("ticket-{username}"),
            max_age_seconds: persistent.then_some(3600),
        }))
    }

    fn sign_out(&self) -> SessionChange {
        *self.sign_outs.lock().expect("sign_outs mutex poisoned") += 1;
        SessionChange::SignedOut
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakePostRepository {
    posts: Arc<Mutex<Vec<Post>>>,
}

impl FakePostRepository {
    pub(crate) fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Arc::new(Mutex::new(posts)),
        }
    }

    fn visible(&self, now: DateTime<Utc>) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .filter(|post| post.is_visible_at(now))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(b.id.cmp(&a.id)));
        posts
    }
}

#[async_trait]
impl PostRepository for FakePostRepository {
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self
            .posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    async fn list_published(
        &self,
        now: DateTime<Utc>,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError> {
        Ok(self
            .visible(now)
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect())
    }

    async fn total_published(&self, now: DateTime<Utc>) -> Result<i64, DomainError> {
        Ok(self.visible(now).len() as i64)
    }
}

pub(crate) fn sample_user(username: &str) -> User {
    User::new(Uuid::new_v4(), Uuid::nil(), username, Utc::now()).expect("sample user must be valid")
}

pub(crate) fn status_named(name: &str) -> Option<MembershipCreateStatus> {
    MembershipCreateStatus::ALL
        .into_iter()
        .find(|status| status.as_str() == name)
}
