//! Application state - shared across all handlers.

use std::sync::Arc;

use journey_core::ports::{CommentRepository, Mailer, PostRepository, TagRepository};
use journey_core::{BlogService, BlogSettings};
use journey_infra::{ConsoleMailer, DatabaseConfig, InMemoryContentStore};

#[cfg(feature = "postgres")]
use journey_infra::{
    DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresTagRepository,
};
#[cfg(feature = "webhook-mail")]
use journey_infra::{WebhookMailer, WebhookMailerConfig};

use crate::config::{AppConfig, MailConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub site_title: String,
    /// Name of the content store backing `blog`.
    pub store: &'static str,
}

struct ContentStore {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    tags: Arc<dyn TagRepository>,
    name: &'static str,
}

impl ContentStore {
    fn in_memory() -> Self {
        let store = InMemoryContentStore::new();
        Self {
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            tags: Arc::new(store.tags()),
            name: "memory",
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let store = content_store(config.database.as_ref()).await;
        let mailer = mailer(&config.mail);

        tracing::info!(store = store.name, site = %config.site.url, "Application state initialized");

        Self::from_parts(store, mailer, config.blog_settings(), config.site.title.clone())
    }

    /// Empty in-memory state delivering mail through `mailer`.
    #[cfg(test)]
    pub fn in_memory(mailer: Arc<dyn Mailer>, settings: BlogSettings) -> Self {
        Self::from_parts(ContentStore::in_memory(), mailer, settings, "My blog".to_string())
    }

    fn from_parts(
        store: ContentStore,
        mailer: Arc<dyn Mailer>,
        settings: BlogSettings,
        site_title: String,
    ) -> Self {
        let blog = BlogService::new(store.posts, store.comments, store.tags, mailer, settings);
        Self {
            blog: Arc::new(blog),
            site_title,
            store: store.name,
        }
    }
}

#[cfg(feature = "postgres")]
async fn content_store(db_config: Option<&DatabaseConfig>) -> ContentStore {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return ContentStore::in_memory();
    };

    match DatabaseConnections::init(config).await {
        Ok(connections) => {
            let db = connections.main;
            ContentStore {
                posts: Arc::new(PostgresPostRepository::new(db.clone())),
                comments: Arc::new(PostgresCommentRepository::new(db.clone())),
                tags: Arc::new(PostgresTagRepository::new(db)),
                name: "postgres",
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            ContentStore::in_memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn content_store(db_config: Option<&DatabaseConfig>) -> ContentStore {
    if db_config.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    ContentStore::in_memory()
}

#[cfg(feature = "webhook-mail")]
fn mailer(config: &MailConfig) -> Arc<dyn Mailer> {
    let Some(url) = &config.api_url else {
        tracing::info!(
            ignored = ?config.delivery_settings(),
            "MAIL_API_URL not set. Mail is logged, not delivered."
        );
        return Arc::new(ConsoleMailer);
    };

    let mut webhook = WebhookMailerConfig::new(url.clone());
    webhook.api_token = config.api_token.clone();
    match WebhookMailer::new(webhook) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build mail client. Falling back to console mail.");
            Arc::new(ConsoleMailer)
        }
    }
}

#[cfg(not(feature = "webhook-mail"))]
fn mailer(config: &MailConfig) -> Arc<dyn Mailer> {
    let ignored = config.delivery_settings();
    if !ignored.is_empty() {
        tracing::warn!(?ignored, "Mail settings ignored: built without the webhook-mail feature");
    }
    Arc::new(ConsoleMailer)
}
