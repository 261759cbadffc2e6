use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag};
use crate::error::RepoError;
use crate::query::PostQuery;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository. Deleting a post also deletes its comments.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts matching `query`, newest first, with their tags loaded.
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `query`, ignoring offset and limit.
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    async fn find_one(&self, query: &PostQuery) -> Result<Option<Post>, RepoError> {
        let mut posts = self.find(&query.clone().limit(1)).await?;
        Ok(posts.pop())
    }
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Active comments of a post, oldest first.
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Total comment count (active or not) per post. Posts without comments
    /// are absent from the map.
    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Return the tag with this name's slug, creating it when missing.
    async fn find_or_create(&self, name: &str) -> Result<Tag, RepoError>;
}
