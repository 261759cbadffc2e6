//! Sidebar widgets: post count, latest and most commented posts.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use journey_core::pagination::{MAX_WIDGET_COUNT, WIDGET_PAGE_SIZE};
use journey_shared::dto::{CommentedPostResponse, WidgetsResponse};

use super::presenters;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WidgetsQuery {
    pub count: Option<usize>,
}

/// GET /blog/widgets/?count=
///
/// `count` defaults to five and is capped at [`MAX_WIDGET_COUNT`].
pub async fn widgets(
    state: web::Data<AppState>,
    query: web::Query<WidgetsQuery>,
) -> AppResult<HttpResponse> {
    let blog = &state.blog;
    let count = query.count.unwrap_or(WIDGET_PAGE_SIZE).min(MAX_WIDGET_COUNT);

    let total_posts = blog.total_posts().await?;
    let latest_posts = blog.latest_posts(count).await?;
    let most_commented = blog.most_commented_posts(count).await?;

    Ok(HttpResponse::Ok().json(WidgetsResponse {
        total_posts,
        latest_posts: latest_posts
            .iter()
            .map(|post| presenters::post_summary(blog, post))
            .collect(),
        most_commented_posts: most_commented
            .iter()
            .map(|entry| CommentedPostResponse {
                post: presenters::post_summary(blog, &entry.post),
                total_comments: entry.total_comments,
            })
            .collect(),
    }))
}
