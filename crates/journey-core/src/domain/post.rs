use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Tag, slugify};
use crate::error::DomainError;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PostStatus {
    #[default]
    #[serde(rename = "DF")]
    Draft,
    #[serde(rename = "PB")]
    Published,
}

impl PostStatus {
    pub fn code(self) -> &'static str {
        match self {
            PostStatus::Draft => "DF",
            PostStatus::Published => "PB",
        }
    }
}

/// Post entity - a blog article written by an author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    /// Unique among posts published on the same date.
    pub slug: String,
    /// Markdown source.
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: PostStatus,
    pub tags: Vec<Tag>,
}

impl Post {
    /// Create a new draft post. The slug is derived from the title.
    pub fn new(author_id: Uuid, title: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            slug: slugify(&title),
            title,
            body,
            publish: now,
            created_at: now,
            updated_at: now,
            status: PostStatus::Draft,
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Move a draft to `Published`, stamping the publish time.
    pub fn publish(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status == PostStatus::Published {
            return Err(DomainError::Validation(format!(
                "post '{}' is already published",
                self.slug
            )));
        }
        self.status = PostStatus::Published;
        self.publish = at;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Visible to readers: published and not scheduled in the future.
    pub fn is_public(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Published && self.publish <= now
    }

    pub fn tag_ids(&self) -> Vec<Uuid> {
        self.tags.iter().map(|t| t.id).collect()
    }

    /// Canonical path, e.g. `/blog/2024/3/9/my-post/`.
    pub fn absolute_path(&self) -> String {
        format!(
            "/blog/{}/{}/{}/{}/",
            self.publish.year(),
            self.publish.month(),
            self.publish.day(),
            self.slug
        )
    }

    /// Number of tags this post shares with `other`.
    pub fn shared_tag_count(&self, other: &Post) -> usize {
        self.tags
            .iter()
            .filter(|t| other.tags.iter().any(|o| o.id == t.id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn new_post_is_a_draft_with_slug() {
        let post = Post::new(Uuid::new_v4(), "Hello, Rust World".into(), "body".into());
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.slug, "hello-rust-world");
        assert!(!post.is_public(Utc::now()));
    }

    #[test]
    fn publish_is_one_way() {
        let mut post = Post::new(Uuid::new_v4(), "Title".into(), "body".into());
        let at = Utc::now() - Duration::hours(1);
        post.publish(at).unwrap();
        assert!(post.is_public(Utc::now()));
        assert!(matches!(post.publish(at), Err(DomainError::Validation(_))));
    }

    #[test]
    fn scheduled_post_is_not_public() {
        let mut post = Post::new(Uuid::new_v4(), "Later".into(), "body".into());
        post.publish(Utc::now() + Duration::days(1)).unwrap();
        assert!(!post.is_public(Utc::now()));
    }

    #[test]
    fn absolute_path_uses_publish_date() {
        let mut post = Post::new(Uuid::new_v4(), "Dated post".into(), "body".into());
        post.publish(Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap())
            .unwrap();
        assert_eq!(post.absolute_path(), "/blog/2024/3/9/dated-post/");
    }

    #[test]
    fn shared_tags_are_counted_by_id() {
        let python = Tag::new("python");
        let django = Tag::new("django");
        let flask = Tag::new("flask");
        let author = Uuid::new_v4();
        let a = Post::new(author, "A".into(), String::new())
            .with_tags(vec![python.clone(), django.clone()]);
        let b = Post::new(author, "B".into(), String::new()).with_tags(vec![python, flask]);
        let c = Post::new(author, "C".into(), String::new()).with_tags(vec![django]);
        assert_eq!(a.shared_tag_count(&b), 1);
        assert_eq!(a.shared_tag_count(&c), 1);
        assert_eq!(b.shared_tag_count(&c), 0);
    }
}
