//! Markdown rendering and XML documents (feed, sitemap).

mod feed;
mod html;
mod sitemap;

pub use feed::{FeedChannel, FeedItem, render_rss};
pub use html::{markdown_to_html, truncate_words_html};
pub use sitemap::{SitemapEntry, render_sitemap};

/// Error raised while producing HTML or XML output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("markdown error: {0}")]
    Markdown(String),
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
