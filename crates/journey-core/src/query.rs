//! Explicit post filters understood by every content store.
//!
//! Stores return matches ordered by publish time, newest first, then apply
//! `offset`/`limit`.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::Post;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostQuery {
    /// Only posts public at this instant (published and publish <= instant).
    pub public_at: Option<DateTime<Utc>>,
    pub id: Option<Uuid>,
    pub slug: Option<String>,
    /// UTC calendar date of the publish timestamp.
    pub published_on: Option<NaiveDate>,
    pub tag_id: Option<Uuid>,
    /// Posts carrying at least one of these tags. An empty list matches nothing.
    pub any_tag_ids: Option<Vec<Uuid>>,
    pub exclude_id: Option<Uuid>,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl PostQuery {
    /// Every post, drafts included.
    pub fn all() -> Self {
        Self::default()
    }

    /// Posts visible to readers at `now`.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            public_at: Some(now),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn published_on(mut self, date: NaiveDate) -> Self {
        self.published_on = Some(date);
        self
    }

    pub fn tagged(mut self, tag_id: Uuid) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn sharing_any_tag(mut self, tag_ids: Vec<Uuid>) -> Self {
        self.any_tag_ids = Some(tag_ids);
        self
    }

    pub fn excluding(mut self, id: Uuid) -> Self {
        self.exclude_id = Some(id);
        self
    }

    pub fn window(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The same filters without offset/limit, for counting.
    pub fn unbounded(&self) -> Self {
        Self {
            offset: 0,
            limit: None,
            ..self.clone()
        }
    }

    /// Whether `post` passes every filter. Offset and limit are not considered.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(now) = self.public_at {
            if !post.is_public(now) {
                return false;
            }
        }
        if self.id.is_some_and(|id| id != post.id) {
            return false;
        }
        if self.exclude_id.is_some_and(|id| id == post.id) {
            return false;
        }
        if self.slug.as_deref().is_some_and(|slug| slug != post.slug) {
            return false;
        }
        if self
            .published_on
            .is_some_and(|date| date != post.publish.date_naive())
        {
            return false;
        }
        if let Some(tag_id) = self.tag_id {
            if !post.tags.iter().any(|t| t.id == tag_id) {
                return false;
            }
        }
        if let Some(ids) = &self.any_tag_ids {
            if !post.tags.iter().any(|t| ids.contains(&t.id)) {
                return false;
            }
        }
        true
    }
}

/// Half-open UTC range `[start, end)` covering `date`.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tag;

    fn published(title: &str, tags: Vec<Tag>) -> Post {
        let mut post = Post::new(Uuid::new_v4(), title.into(), String::new()).with_tags(tags);
        post.publish(Utc::now() - Duration::hours(2)).unwrap();
        post
    }

    #[test]
    fn public_filter_hides_drafts() {
        let draft = Post::new(Uuid::new_v4(), "Draft".into(), String::new());
        let live = published("Live", vec![]);
        let query = PostQuery::public(Utc::now());
        assert!(!query.matches(&draft));
        assert!(query.matches(&live));
        assert!(PostQuery::all().matches(&draft));
    }

    #[test]
    fn empty_tag_set_matches_nothing() {
        let post = published("Tagged", vec![Tag::new("rust")]);
        assert!(!PostQuery::all().sharing_any_tag(vec![]).matches(&post));
        assert!(PostQuery::all().sharing_any_tag(post.tag_ids()).matches(&post));
    }

    #[test]
    fn date_and_slug_filters() {
        let post = published("On a day", vec![]);
        let query = PostQuery::all()
            .with_slug("on-a-day")
            .published_on(post.publish.date_naive());
        assert!(query.matches(&post));
        assert!(!query.clone().excluding(post.id).matches(&post));
        let (start, end) = day_bounds(post.publish.date_naive());
        assert!(start <= post.publish && post.publish < end);
    }
}
