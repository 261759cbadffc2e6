//! Blog use cases, wired against the ports.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag, is_valid_slug};
use crate::error::DomainError;
use crate::forms::{
    CommentForm, EmailPostForm, FieldErrors, FormInput, SearchForm, Submission,
};
use crate::pagination::{POSTS_PER_PAGE, Page, PageWindow, WIDGET_PAGE_SIZE};
use crate::ports::{CommentRepository, Mailer, OutgoingMail, PostRepository, TagRepository};
use crate::query::PostQuery;
use crate::ranking::{RELATED_POSTS_LIMIT, RelatedPost, rank_related};
use crate::search::{SearchHit, rank_by_title};

/// Longest title and slug a post may have.
pub const MAX_TITLE_LEN: usize = 250;

/// Longest tag name.
pub const MAX_TAG_LEN: usize = 100;

/// Site-wide settings the use cases need.
#[derive(Debug, Clone)]
pub struct BlogSettings {
    /// Scheme and host used to build absolute links, e.g. `https://blog.example.com`.
    pub site_url: String,
    /// Sender address of recommendation emails.
    pub mail_from: String,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:8080".to_string(),
            mail_from: "noreply@journey.local".to_string(),
        }
    }
}

/// A page of posts, optionally narrowed to one tag.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub posts: Page<Post>,
    pub tag: Option<Tag>,
}

#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub similar_posts: Vec<RelatedPost>,
}

#[derive(Debug, Clone)]
pub struct CommentedPost {
    pub post: Post,
    pub total_comments: u64,
}

/// A form submitted against a post, with the post it targeted.
#[derive(Debug, Clone)]
pub struct PostSubmission<T, F> {
    pub post: Post,
    pub outcome: Submission<T, F>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// The cleaned query, when one was submitted and valid.
    pub query: Option<String>,
    pub hits: Vec<SearchHit>,
    pub errors: FieldErrors,
}

pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    tags: Arc<dyn TagRepository>,
    mailer: Arc<dyn Mailer>,
    settings: BlogSettings,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        tags: Arc<dyn TagRepository>,
        mailer: Arc<dyn Mailer>,
        settings: BlogSettings,
    ) -> Self {
        Self {
            posts,
            comments,
            tags,
            mailer,
            settings,
        }
    }

    pub fn settings(&self) -> &BlogSettings {
        &self.settings
    }

    /// Canonical absolute URL of a post.
    pub fn absolute_url(&self, post: &Post) -> String {
        format!(
            "{}{}",
            self.settings.site_url.trim_end_matches('/'),
            post.absolute_path()
        )
    }

    /// Public posts, newest first, three per page.
    pub async fn list_posts(
        &self,
        tag_slug: Option<&str>,
        page: Option<&str>,
    ) -> Result<PostListing, DomainError> {
        let mut query = PostQuery::public(Utc::now());

        let tag = match tag_slug {
            Some(slug) => {
                let tag = self
                    .tags
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| DomainError::not_found("tag", slug))?;
                query = query.tagged(tag.id);
                Some(tag)
            }
            None => None,
        };

        let total = self.posts.count(&query).await? as usize;
        let window = PageWindow::resolve(total, POSTS_PER_PAGE, page);
        let items = self
            .posts
            .find(&query.window(window.offset(), window.per_page))
            .await?;

        Ok(PostListing {
            posts: window.into_page(items),
            tag,
        })
    }

    /// A public post by publish date and slug, with its visible comments and
    /// similar posts.
    pub async fn post_detail(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
    ) -> Result<PostDetail, DomainError> {
        let now = Utc::now();
        let not_found = || DomainError::not_found("post", format!("{year}/{month}/{day}/{slug}"));

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(not_found)?;
        let post = self
            .posts
            .find_one(&PostQuery::public(now).with_slug(slug).published_on(date))
            .await?
            .ok_or_else(not_found)?;

        let comments = self.comments.find_active_by_post(post.id).await?;
        let similar_posts = self.related_posts_at(&post, RELATED_POSTS_LIMIT, now).await?;

        Ok(PostDetail {
            post,
            comments,
            similar_posts,
        })
    }

    /// Other public posts sharing tags with `post`, best match first.
    pub async fn related_posts(
        &self,
        post: &Post,
        limit: usize,
    ) -> Result<Vec<RelatedPost>, DomainError> {
        self.related_posts_at(post, limit, Utc::now()).await
    }

    async fn related_posts_at(
        &self,
        post: &Post,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<RelatedPost>, DomainError> {
        let tag_ids = post.tag_ids();
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self
            .posts
            .find(
                &PostQuery::public(now)
                    .sharing_any_tag(tag_ids)
                    .excluding(post.id),
            )
            .await?;

        Ok(rank_related(post, candidates, now, limit))
    }

    /// A public post by id.
    pub async fn public_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_one(&PostQuery::public(Utc::now()).with_id(id))
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    /// Validate and store a reader comment. Nothing is stored when the form
    /// is rejected.
    pub async fn submit_comment(
        &self,
        post_id: Uuid,
        form: CommentForm,
    ) -> Result<PostSubmission<Comment, CommentForm>, DomainError> {
        let post = self.public_post(post_id).await?;

        let form = match form.clean() {
            Ok(form) => form,
            Err(rejected) => {
                tracing::debug!(post_id = %post.id, fields = ?rejected.errors.keys().collect::<Vec<_>>(), "Comment rejected");
                return Ok(PostSubmission {
                    post,
                    outcome: Submission::Rejected(rejected),
                });
            }
        };

        let comment = Comment::new(post.id, form.name, form.email, form.body);
        let saved = self.comments.save(comment).await?;
        tracing::info!(post_id = %post.id, comment_id = %saved.id, "Comment added");

        Ok(PostSubmission {
            post,
            outcome: Submission::Accepted(saved),
        })
    }

    /// Email a recommendation of a public post. Delivery errors propagate.
    pub async fn share_post(
        &self,
        post_id: Uuid,
        form: EmailPostForm,
    ) -> Result<PostSubmission<OutgoingMail, EmailPostForm>, DomainError> {
        let post = self.public_post(post_id).await?;

        let form = match form.clean() {
            Ok(form) => form,
            Err(rejected) => {
                return Ok(PostSubmission {
                    post,
                    outcome: Submission::Rejected(rejected),
                });
            }
        };

        let mail = self.compose_recommendation(&post, &form);
        self.mailer.send(mail.clone()).await?;
        tracing::info!(post_id = %post.id, "Recommendation sent");

        Ok(PostSubmission {
            post,
            outcome: Submission::Accepted(mail),
        })
    }

    pub fn compose_recommendation(&self, post: &Post, form: &EmailPostForm) -> OutgoingMail {
        let post_url = self.absolute_url(post);
        OutgoingMail {
            subject: format!("{} recommends you read {}", form.name, post.title),
            body: format!(
                "Read {} at {}\n\n{}'s comments:  {}",
                post.title, post_url, form.name, form.comments
            ),
            from: self.settings.mail_from.clone(),
            to: vec![form.to.clone()],
        }
    }

    /// Title search. No query means no search; a blank query is a form error.
    pub async fn search(&self, query: Option<String>) -> Result<SearchOutcome, DomainError> {
        let Some(raw) = query else {
            return Ok(SearchOutcome::default());
        };

        let form = match (SearchForm { query: raw }).clean() {
            Ok(form) => form,
            Err(rejected) => {
                return Ok(SearchOutcome {
                    query: None,
                    hits: Vec::new(),
                    errors: rejected.errors,
                });
            }
        };

        let now = Utc::now();
        let posts = self.posts.find(&PostQuery::public(now)).await?;
        let hits = rank_by_title(&form.query, posts, now);

        Ok(SearchOutcome {
            query: Some(form.query),
            hits,
            errors: FieldErrors::new(),
        })
    }

    pub async fn total_posts(&self) -> Result<u64, DomainError> {
        Ok(self.posts.count(&PostQuery::public(Utc::now())).await?)
    }

    pub async fn latest_posts(&self, count: usize) -> Result<Vec<Post>, DomainError> {
        Ok(self
            .posts
            .find(&PostQuery::public(Utc::now()).limit(count))
            .await?)
    }

    /// Public posts with the most comments (hidden ones included), newest
    /// first among equals.
    pub async fn most_commented_posts(
        &self,
        count: usize,
    ) -> Result<Vec<CommentedPost>, DomainError> {
        let posts = self.posts.find(&PostQuery::public(Utc::now())).await?;
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let counts = self.comments.count_by_posts(&ids).await?;

        let mut ranked: Vec<CommentedPost> = posts
            .into_iter()
            .map(|post| CommentedPost {
                total_comments: counts.get(&post.id).copied().unwrap_or(0),
                post,
            })
            .collect();
        ranked.sort_by(|a, b| b.total_comments.cmp(&a.total_comments));
        ranked.truncate(count);
        Ok(ranked)
    }

    /// Posts of the syndication feed.
    pub async fn feed_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.latest_posts(WIDGET_PAGE_SIZE).await
    }

    /// Every public post, for the sitemap.
    pub async fn sitemap_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find(&PostQuery::public(Utc::now())).await?)
    }

    /// Store a post. The slug must be unique for its publish date; tags are
    /// matched by name and created when missing.
    pub async fn save_post(&self, mut post: Post) -> Result<Post, DomainError> {
        if post.title.trim().is_empty() || post.title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "title must be 1 to {MAX_TITLE_LEN} characters"
            )));
        }
        if !is_valid_slug(&post.slug) || post.slug.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "slug must be 1 to {MAX_TITLE_LEN} letters, digits, hyphens or underscores"
            )));
        }
        if let Some(tag) = post
            .tags
            .iter()
            .find(|t| t.slug.is_empty() || t.name.chars().count() > MAX_TAG_LEN)
        {
            return Err(DomainError::Validation(format!(
                "tag '{}' must be at most {MAX_TAG_LEN} characters and contain a letter or digit",
                tag.name
            )));
        }

        let clash = self
            .posts
            .find_one(
                &PostQuery::all()
                    .with_slug(post.slug.clone())
                    .published_on(post.publish.date_naive()),
            )
            .await?;
        if clash.is_some_and(|existing| existing.id != post.id) {
            return Err(DomainError::Duplicate(format!(
                "slug '{}' already used on {}",
                post.slug,
                post.publish.date_naive()
            )));
        }

        let mut tags = Vec::with_capacity(post.tags.len());
        for tag in &post.tags {
            let stored = self.tags.find_or_create(&tag.name).await?;
            if !tags.iter().any(|t: &Tag| t.id == stored.id) {
                tags.push(stored);
            }
        }
        post.tags = tags;
        post.updated_at = Utc::now();

        let saved = self.posts.save(post).await?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, status = saved.status.code(), "Post saved");
        Ok(saved)
    }

    /// Publish a draft at `at`.
    pub async fn publish_post(&self, id: Uuid, at: DateTime<Utc>) -> Result<Post, DomainError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;
        post.publish(at)?;
        self.save_post(post).await
    }

    /// Remove a post and its comments.
    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts.delete(id).await.map_err(|e| match e {
            crate::error::RepoError::NotFound => DomainError::not_found("post", id),
            other => other.into(),
        })
    }
}
