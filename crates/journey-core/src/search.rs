//! Title search by trigram similarity.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Post;

/// Results must score strictly above this.
pub const SIMILARITY_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub post: Post,
    pub similarity: f32,
}

fn trigrams(text: &str) -> HashSet<[char; 3]> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    chars.windows(3).map(|w| [w[0], w[1], w[2]]).collect()
}

/// Shared trigrams over all distinct trigrams of both strings, case-insensitive.
///
/// Strings shorter than three characters have no trigrams and score 0.
pub fn trigram_similarity(a: &str, b: &str) -> f32 {
    let left = trigrams(a);
    let right = trigrams(b);
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f32 / union as f32
}

/// Score public `posts` by title similarity to `query`, best first.
///
/// Input order breaks ties, so callers pass posts newest first.
pub fn rank_by_title(query: &str, posts: Vec<Post>, now: DateTime<Utc>) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = posts
        .into_iter()
        .filter(|post| post.is_public(now))
        .filter_map(|post| {
            let similarity = trigram_similarity(query, &post.title);
            (similarity > SIMILARITY_THRESHOLD).then_some(SearchHit { post, similarity })
        })
        .collect();

    hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn published(title: &str) -> Post {
        let mut post = Post::new(Uuid::new_v4(), title.into(), String::new());
        post.publish(Utc::now() - Duration::minutes(5)).unwrap();
        post
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(trigram_similarity("abc", "ab"), 0.0);
        assert_eq!(trigram_similarity("", ""), 0.0);
        assert_eq!(trigram_similarity("Rust", "rust"), 1.0);
        let partial = trigram_similarity("rusty", "rust");
        assert!(partial > 0.0 && partial < 1.0);
    }

    #[test]
    fn empty_and_short_queries_find_nothing() {
        let posts = vec![published("Hello"), published("He")];
        assert!(rank_by_title("", posts.clone(), Utc::now()).is_empty());
        assert!(rank_by_title("   ", posts.clone(), Utc::now()).is_empty());
        assert!(rank_by_title("he", posts, Utc::now()).is_empty());
    }

    #[test]
    fn best_match_first() {
        let posts = vec![
            published("Learning Django"),
            published("Django unchained patterns"),
            published("Cooking pasta"),
        ];
        let hits = rank_by_title("django", posts, Utc::now());
        let titles: Vec<_> = hits.iter().map(|h| h.post.title.as_str()).collect();
        assert_eq!(titles, vec!["Learning Django", "Django unchained patterns"]);
        assert!(hits.windows(2).all(|w| w[0].similarity >= w[1].similarity));
        assert!(hits.iter().all(|h| h.similarity > SIMILARITY_THRESHOLD));
    }

    #[test]
    fn drafts_are_not_searchable() {
        let draft = Post::new(Uuid::new_v4(), "Django draft".into(), String::new());
        assert!(rank_by_title("django", vec![draft], Utc::now()).is_empty());
    }
}
