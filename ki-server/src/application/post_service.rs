use std::sync::Arc;

use chrono::Utc;

use crate::data::post_repository::{Pagination, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<Post>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

pub(crate) struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub(crate) fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .get_post(id)
            .await?
            .filter(|post| post.is_visible_at(Utc::now()))
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))
    }

    pub(crate) async fn list_published(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<ListPostsResult, DomainError> {
        let now = Utc::now();
        let posts = self
            .repo
            .list_published(now, Pagination { limit, offset })
            .await?;
        let total = self.repo.total_published(now).await?;

        Ok(ListPostsResult {
            posts,
            limit,
            offset,
            total,
        })
    }
}
