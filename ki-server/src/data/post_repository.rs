use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pagination {
    pub(crate) limit: u32,
    pub(crate) offset: u32,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn list_published(
        &self,
        now: DateTime<Utc>,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError>;
    async fn total_published(&self, now: DateTime<Utc>) -> Result<i64, DomainError>;
}
