//! In-memory content store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use journey_core::domain::{Comment, Post, Tag, slugify};
use journey_core::error::RepoError;
use journey_core::ports::{BaseRepository, CommentRepository, PostRepository, TagRepository};
use journey_core::query::PostQuery;

#[derive(Default)]
struct Tables {
    posts: RwLock<HashMap<Uuid, Post>>,
    comments: RwLock<HashMap<Uuid, Comment>>,
    tags: RwLock<HashMap<Uuid, Tag>>,
}

/// Posts, comments and tags held in process memory behind async RwLocks.
///
/// The repositories handed out share the same tables.
/// Note: Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    tables: Arc<Tables>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn tags(&self) -> InMemoryTagRepository {
        InMemoryTagRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryPostRepository {
    tables: Arc<Tables>,
}

impl InMemoryPostRepository {
    async fn matching(&self, query: &PostQuery) -> Vec<Post> {
        let posts = self.tables.posts.read().await;
        let mut found: Vec<Post> = posts
            .values()
            .filter(|post| query.matches(post))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.publish.cmp(&a.publish));
        found
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.posts.read().await.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.tables.posts.write().await;
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // posts before comments, the same order comment saves take
        let mut posts = self.tables.posts.write().await;
        if posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        let mut comments = self.tables.comments.write().await;
        drop(posts);
        let before = comments.len();
        comments.retain(|_, c| c.post_id != id);
        tracing::debug!(post_id = %id, removed_comments = before - comments.len(), "Post deleted");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let found = self.matching(query).await;
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(found.into_iter().skip(query.offset).take(limit).collect())
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        Ok(self.matching(&query.unbounded()).await.len() as u64)
    }
}

pub struct InMemoryCommentRepository {
    tables: Arc<Tables>,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.comments.read().await.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        // the post must not go away before the comment is in
        let posts = self.tables.posts.read().await;
        if !posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "comment references missing post {}",
                comment.post_id
            )));
        }
        self.tables
            .comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        drop(posts);
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.tables.comments.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let comments = self.tables.comments.read().await;
        let mut active: Vec<Comment> = comments
            .values()
            .filter(|c| c.post_id == post_id && c.is_visible())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(active)
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        let comments = self.tables.comments.read().await;
        let mut counts = HashMap::new();
        for comment in comments.values().filter(|c| post_ids.contains(&c.post_id)) {
            *counts.entry(comment.post_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

pub struct InMemoryTagRepository {
    tables: Arc<Tables>,
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.tags.read().await.get(&id).cloned())
    }

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tags = self.tables.tags.write().await;
        if tags.values().any(|t| t.slug == tag.slug && t.id != tag.id) {
            return Err(RepoError::Constraint(format!("tag slug '{}' taken", tag.slug)));
        }
        tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if self.tables.tags.write().await.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        let mut posts = self.tables.posts.write().await;
        for post in posts.values_mut() {
            post.tags.retain(|t| t.id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let tags = self.tables.tags.read().await;
        Ok(tags.values().find(|t| t.slug == slug).cloned())
    }

    async fn find_or_create(&self, name: &str) -> Result<Tag, RepoError> {
        let slug = slugify(name);
        let mut tags = self.tables.tags.write().await;
        if let Some(existing) = tags.values().find(|t| t.slug == slug) {
            return Ok(existing.clone());
        }
        let tag = Tag::new(name);
        tags.insert(tag.id, tag.clone());
        Ok(tag)
    }
}
