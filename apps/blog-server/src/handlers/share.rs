//! Share-by-email handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use journey_core::forms::{EmailPostForm, Submission};
use journey_shared::dto::ShareResponse;

use super::{form_rejected, presenters};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /blog/{post_id}/share/
pub async fn share_form(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blog = &state.blog;
    let post = blog.public_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ShareResponse {
        post: presenters::post_summary(blog, &post),
        sent: false,
        to: None,
    }))
}

/// POST /blog/{post_id}/share/
pub async fn share_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: web::Form<EmailPostForm>,
) -> AppResult<HttpResponse> {
    let blog = &state.blog;
    let submission = blog.share_post(path.into_inner(), form.into_inner()).await?;

    Ok(match submission.outcome {
        Submission::Accepted(mail) => HttpResponse::Ok().json(ShareResponse {
            post: presenters::post_summary(blog, &submission.post),
            sent: true,
            to: mail.to.into_iter().next(),
        }),
        Submission::Rejected(rejected) => form_rejected(rejected),
    })
}
