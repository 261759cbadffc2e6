//! Related-post ranking by shared tags.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Post;

/// Number of similar posts shown under a post.
pub const RELATED_POSTS_LIMIT: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct RelatedPost {
    pub post: Post,
    pub shared_tags: usize,
}

/// Rank `candidates` against `post`: most shared tags first, then newest.
///
/// The post itself, non-public candidates and candidates without a common tag
/// are dropped before the first `limit` results are taken.
pub fn rank_related(
    post: &Post,
    candidates: Vec<Post>,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<RelatedPost> {
    let mut ranked: Vec<RelatedPost> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != post.id && candidate.is_public(now))
        .filter_map(|candidate| {
            let shared_tags = post.shared_tag_count(&candidate);
            (shared_tags > 0).then_some(RelatedPost {
                post: candidate,
                shared_tags,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.shared_tags
            .cmp(&a.shared_tags)
            .then_with(|| b.post.publish.cmp(&a.post.publish))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tag;
    use chrono::Duration;
    use uuid::Uuid;

    fn published(title: &str, tags: &[&Tag], hours_ago: i64) -> Post {
        let mut post = Post::new(Uuid::new_v4(), title.into(), String::new())
            .with_tags(tags.iter().map(|t| (*t).clone()).collect());
        post.publish(Utc::now() - Duration::hours(hours_ago)).unwrap();
        post
    }

    #[test]
    fn ties_are_broken_by_recency() {
        let python = Tag::new("python");
        let django = Tag::new("django");
        let flask = Tag::new("flask");
        let a = published("A", &[&python, &django], 10);
        let b = published("B", &[&python, &flask], 5);
        let c = published("C", &[&django], 1);

        let ranked = rank_related(&a, vec![b.clone(), c.clone()], Utc::now(), 4);
        let titles: Vec<_> = ranked.iter().map(|r| r.post.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B"]);
        assert!(ranked.iter().all(|r| r.shared_tags == 1));
    }

    #[test]
    fn more_shared_tags_win_over_recency() {
        let rust = Tag::new("rust");
        let web = Tag::new("web");
        let a = published("A", &[&rust, &web], 10);
        let old_close = published("Old", &[&rust, &web], 100);
        let new_far = published("New", &[&rust], 1);

        let ranked = rank_related(&a, vec![new_far, old_close], Utc::now(), 4);
        assert_eq!(ranked[0].post.title, "Old");
        assert_eq!(ranked[0].shared_tags, 2);
    }

    #[test]
    fn excludes_self_drafts_and_unrelated() {
        let rust = Tag::new("rust");
        let go = Tag::new("go");
        let a = published("A", &[&rust], 10);
        let draft = Post::new(Uuid::new_v4(), "Draft".into(), String::new())
            .with_tags(vec![rust.clone()]);
        let unrelated = published("Go", &[&go], 1);

        let ranked = rank_related(&a, vec![a.clone(), draft, unrelated], Utc::now(), 4);
        assert!(ranked.is_empty());
    }

    #[test]
    fn respects_limit() {
        let rust = Tag::new("rust");
        let a = published("A", &[&rust], 10);
        let others: Vec<Post> = (0..6)
            .map(|i| published(&format!("P{i}"), &[&rust], i))
            .collect();
        let ranked = rank_related(&a, others, Utc::now(), RELATED_POSTS_LIMIT);
        assert_eq!(ranked.len(), RELATED_POSTS_LIMIT);
        assert_eq!(ranked[0].post.title, "P0");
    }
}
