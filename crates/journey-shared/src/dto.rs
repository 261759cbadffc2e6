//! Data Transfer Objects - response bodies of the blog API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagResponse {
    pub name: String,
    pub slug: String,
}

/// A post as shown in lists and widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    /// Absolute URL of the post.
    pub url: String,
    pub publish: DateTime<Utc>,
    pub tags: Vec<TagResponse>,
}

/// A full post, with its body rendered to HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub url: String,
    /// Markdown source.
    pub body: String,
    pub body_html: String,
    pub publish: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: String,
    pub tags: Vec<TagResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<usize>,
}

/// GET /blog/ and GET /blog/tag/{tag_slug}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagResponse>,
    pub posts: PageResponse<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarPostResponse {
    pub post: PostSummary,
    pub shared_tags: usize,
}

/// GET /blog/{year}/{month}/{day}/{slug}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub similar_posts: Vec<SimilarPostResponse>,
}

/// POST /blog/{post_id}/comment/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSubmittedResponse {
    pub post: PostSummary,
    pub comment: CommentResponse,
}

/// GET and POST /blog/{post_id}/share/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub post: PostSummary,
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultResponse {
    pub post: PostSummary,
    pub similarity: f32,
}

/// GET /blog/search/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: Option<String>,
    pub results: Vec<SearchResultResponse>,
    #[serde(skip_serializing_if = "std::collections::BTreeMap::is_empty", default)]
    pub errors: std::collections::BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentedPostResponse {
    pub post: PostSummary,
    pub total_comments: u64,
}

/// GET /blog/widgets/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetsResponse {
    pub total_posts: u64,
    pub latest_posts: Vec<PostSummary>,
    pub most_commented_posts: Vec<CommentedPostResponse>,
}

/// GET /api/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub timestamp: DateTime<Utc>,
}
