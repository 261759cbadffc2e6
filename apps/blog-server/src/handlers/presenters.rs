//! Domain to DTO conversion.

use journey_core::BlogService;
use journey_core::domain::{Comment, Post, Tag};
use journey_core::pagination::Page;
use journey_shared::dto::{
    CommentResponse, PageResponse, PostResponse, PostSummary, TagResponse,
};

use crate::render::{RenderError, markdown_to_html};

pub fn tag(tag: &Tag) -> TagResponse {
    TagResponse {
        name: tag.name.clone(),
        slug: tag.slug.clone(),
    }
}

pub fn post_summary(blog: &BlogService, post: &Post) -> PostSummary {
    PostSummary {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        url: blog.absolute_url(post),
        publish: post.publish,
        tags: post.tags.iter().map(tag).collect(),
    }
}

pub fn post_response(blog: &BlogService, post: &Post) -> Result<PostResponse, RenderError> {
    Ok(PostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        url: blog.absolute_url(post),
        body_html: markdown_to_html(&post.body)?,
        body: post.body.clone(),
        publish: post.publish,
        created_at: post.created_at,
        updated_at: post.updated_at,
        status: post.status.code().to_string(),
        tags: post.tags.iter().map(tag).collect(),
    })
}

/// Comments are shown without the author's email.
pub fn comment(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        name: comment.name.clone(),
        body: comment.body.clone(),
        created_at: comment.created_at,
    }
}

pub fn page<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let next_page = page.next_page_number();
    let previous_page = page.previous_page_number();
    let page = page.map(f);

    PageResponse {
        items: page.items,
        number: page.number,
        num_pages: page.num_pages,
        per_page: page.per_page,
        total: page.total,
        next_page,
        previous_page,
    }
}
