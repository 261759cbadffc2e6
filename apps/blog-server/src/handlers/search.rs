//! Title search handler.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use journey_shared::dto::{SearchResponse, SearchResultResponse};

use super::presenters;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// GET /blog/search/?query=
pub async fn post_search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let blog = &state.blog;
    let outcome = blog.search(query.into_inner().query).await?;

    Ok(HttpResponse::Ok().json(SearchResponse {
        query: outcome.query,
        results: outcome
            .hits
            .iter()
            .map(|hit| SearchResultResponse {
                post: presenters::post_summary(blog, &hit.post),
                similarity: hit.similarity,
            })
            .collect(),
        errors: outcome.errors,
    }))
}
