//! RSS feed and sitemap.

use actix_web::{HttpResponse, web};

use crate::middleware::error::AppResult;
use crate::render::{
    FeedChannel, FeedItem, RenderError, SitemapEntry, markdown_to_html, render_rss,
    render_sitemap, truncate_words_html,
};
use crate::state::AppState;

const FEED_DESCRIPTION: &str = "New posts of my blog.";
const FEED_SUMMARY_WORDS: usize = 30;

/// GET /blog/feed/
pub async fn feed(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let blog = &state.blog;
    let posts = blog.feed_posts().await?;

    let items = posts
        .iter()
        .map(|post| -> Result<FeedItem, RenderError> {
            Ok(FeedItem {
                title: post.title.clone(),
                link: blog.absolute_url(post),
                description: truncate_words_html(
                    &markdown_to_html(&post.body)?,
                    FEED_SUMMARY_WORDS,
                )?,
                pub_date: post.publish,
            })
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    let link = format!("{}/blog/", blog.settings().site_url.trim_end_matches('/'));
    let channel = FeedChannel {
        title: &state.site_title,
        link: &link,
        description: FEED_DESCRIPTION,
    };

    Ok(HttpResponse::Ok()
        .content_type("application/rss+xml; charset=utf-8")
        .body(render_rss(&channel, &items)?))
}

/// GET /sitemap.xml
pub async fn sitemap(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let blog = &state.blog;
    let entries: Vec<SitemapEntry> = blog
        .sitemap_posts()
        .await?
        .iter()
        .map(|post| SitemapEntry {
            loc: blog.absolute_url(post),
            lastmod: post.updated_at,
        })
        .collect();

    Ok(HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(render_sitemap(&entries)?))
}
