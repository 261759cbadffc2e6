//! Comment submission handler.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use journey_core::forms::{CommentForm, Submission};
use journey_shared::dto::CommentSubmittedResponse;

use super::{form_rejected, presenters};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /blog/{post_id}/comment/
pub async fn post_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let blog = &state.blog;
    let submission = blog
        .submit_comment(path.into_inner(), form.into_inner())
        .await?;

    let post = presenters::post_summary(blog, &submission.post);
    Ok(match submission.outcome {
        Submission::Accepted(comment) => HttpResponse::Created().json(CommentSubmittedResponse {
            post,
            comment: presenters::comment(&comment),
        }),
        Submission::Rejected(rejected) => form_rejected(rejected),
    })
}
