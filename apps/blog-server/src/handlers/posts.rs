//! Post listing and detail handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use journey_shared::dto::{PostDetailResponse, PostListResponse, SimilarPostResponse};

use super::presenters;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Kept raw: anything that is not a positive number means page 1.
    pub page: Option<String>,
}

/// GET /blog/
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    list(&state, None, query.page.as_deref()).await
}

/// GET /blog/tag/{tag_slug}/
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    list(&state, Some(path.as_str()), query.page.as_deref()).await
}

async fn list(
    state: &AppState,
    tag_slug: Option<&str>,
    page: Option<&str>,
) -> AppResult<HttpResponse> {
    let blog = &state.blog;
    let listing = blog.list_posts(tag_slug, page).await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        tag: listing.tag.as_ref().map(presenters::tag),
        posts: presenters::page(listing.posts, |post| presenters::post_summary(blog, &post)),
    }))
}

/// GET /blog/{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let blog = &state.blog;
    let detail = blog.post_detail(year, month, day, &slug).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: presenters::post_response(blog, &detail.post)?,
        comments: detail.comments.iter().map(presenters::comment).collect(),
        similar_posts: detail
            .similar_posts
            .iter()
            .map(|related| SimilarPostResponse {
                post: presenters::post_summary(blog, &related.post),
                shared_tags: related.shared_tags,
            })
            .collect(),
    }))
}
