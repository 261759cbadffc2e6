//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod presenters;
mod search;
mod share;
mod syndication;
mod widgets;

use actix_web::{HttpResponse, web};
use serde::Serialize;

use journey_core::forms::RejectedForm;
use journey_shared::FormErrorResponse;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/health", web::get().to(health::health_check)))
        .route("/sitemap.xml", web::get().to(syndication::sitemap))
        .service(
            web::scope("/blog")
                .route("/", web::get().to(posts::post_list))
                .route("/search/", web::get().to(search::post_search))
                .route("/widgets/", web::get().to(widgets::widgets))
                .route("/feed/", web::get().to(syndication::feed))
                .route("/tag/{tag_slug}/", web::get().to(posts::post_list_by_tag))
                .route(
                    "/{year:\\d+}/{month:\\d+}/{day:\\d+}/{slug}/",
                    web::get().to(posts::post_detail),
                )
                .service(
                    web::resource("/{post_id}/share/")
                        .route(web::get().to(share::share_form))
                        .route(web::post().to(share::share_post)),
                )
                // any other method answers 405
                .service(
                    web::resource("/{post_id}/comment/")
                        .route(web::post().to(comments::post_comment)),
                ),
        );
}

/// 422 with the submitted form and its field errors.
fn form_rejected<F: Serialize>(rejected: RejectedForm<F>) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(FormErrorResponse {
        form: rejected.data,
        errors: rejected.errors,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use serde_json::Value;
    use uuid::Uuid;

    use journey_core::BlogSettings;
    use journey_core::pagination::MAX_WIDGET_COUNT;
    use journey_core::domain::{Post, Tag};
    use journey_core::ports::{MailError, Mailer, OutgoingMail};

    use super::configure_routes;
    use crate::state::AppState;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(mail);
            Ok(())
        }
    }

    async fn seeded() -> (AppState, Arc<RecordingMailer>, Post) {
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::in_memory(
            mailer.clone(),
            BlogSettings {
                site_url: "https://blog.example.com".into(),
                ..BlogSettings::default()
            },
        );

        let mut post = Post::new(
            Uuid::new_v4(),
            "Rust tips".into(),
            "Some **bold** text".into(),
        )
        .with_tags(vec![Tag::new("rust")]);
        post.publish(Utc::now() - Duration::hours(1)).unwrap();
        let post = state.blog.save_post(post).await.unwrap();

        let draft = Post::new(Uuid::new_v4(), "Unfinished".into(), String::new());
        state.blog.save_post(draft).await.unwrap();

        (state, mailer, post)
    }

    /// Publish `n` posts titled "Post 0".."Post n-1", each older than the last.
    async fn publish_series(state: &AppState, n: usize) {
        for i in 0..n {
            let mut post = Post::new(Uuid::new_v4(), format!("Post {i}"), format!("Body {i}"));
            post.publish(Utc::now() - Duration::hours(2 + i as i64)).unwrap();
            state.blog.save_post(post).await.unwrap();
        }
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_store() {
        let (state, _, _) = seeded().await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
    }

    #[actix_web::test]
    async fn list_shows_public_posts_and_clamps_pages() {
        let (state, _, post) = seeded().await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/blog/?page=abc").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["posts"]["number"], 1);
        assert_eq!(body["posts"]["total"], 1);
        assert_eq!(body["posts"]["items"][0]["id"], post.id.to_string());
        assert_eq!(
            body["posts"]["items"][0]["url"],
            format!("https://blog.example.com{}", post.absolute_path())
        );
    }

    #[actix_web::test]
    async fn tag_listing_and_unknown_tag() {
        let (state, _, _) = seeded().await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/blog/tag/rust/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["tag"]["slug"], "rust");

        let req = test::TestRequest::get().uri("/blog/tag/go/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["status"], 404);
    }

    #[actix_web::test]
    async fn detail_renders_markdown() {
        let (state, _, post) = seeded().await;
        let app = app!(state);

        let req = test::TestRequest::get().uri(&post.absolute_path()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["post"]["title"], "Rust tips");
        assert_eq!(body["post"]["body_html"], "<p>Some <strong>bold</strong> text</p>");
        assert_eq!(body["comments"].as_array().map(Vec::len), Some(0));

        let req = test::TestRequest::get()
            .uri("/blog/2001/1/1/rust-tips/")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn comment_form_accepts_and_rejects() {
        let (state, _, post) = seeded().await;
        let app = app!(state);
        let uri = format!("/blog/{}/comment/", post.id);

        let req = test::TestRequest::post()
            .uri(&uri)
            .set_form([("name", "Ada"), ("email", "ada@example.com"), ("body", "Nice")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri(&uri)
            .set_form([("name", "Ada"), ("email", "nope"), ("body", "Nice")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["errors"]["email"].is_array());
        assert_eq!(body["form"]["email"], "nope");

        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let req = test::TestRequest::get().uri(&post.absolute_path()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["comments"].as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn share_sends_one_mail_or_reports_errors() {
        let (state, mailer, post) = seeded().await;
        let app = app!(state);
        let uri = format!("/blog/{}/share/", post.id);

        let req = test::TestRequest::get().uri(&uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["sent"], false);

        let req = test::TestRequest::post()
            .uri(&uri)
            .set_form([("name", "Ada"), ("email", "ada@example.com"), ("to", "bad")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(mailer.sent.lock().unwrap().is_empty());

        let req = test::TestRequest::post()
            .uri(&uri)
            .set_form([
                ("name", "Ada"),
                ("email", "ada@example.com"),
                ("to", "bob@example.com"),
            ])
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["sent"], true);
        assert_eq!(body["to"], "bob@example.com");

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Ada recommends you read Rust tips");
    }

    #[actix_web::test]
    async fn search_and_widgets() {
        let (state, _, post) = seeded().await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/blog/search/?query=rust").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["query"], "rust");
        assert_eq!(body["results"][0]["post"]["id"], post.id.to_string());

        let req = test::TestRequest::get().uri("/blog/search/?query=").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["results"].as_array().map(Vec::len), Some(0));

        let req = test::TestRequest::get().uri("/blog/widgets/?count=2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_posts"], 1);
        assert_eq!(body["most_commented_posts"][0]["total_comments"], 0);
    }

    #[actix_web::test]
    async fn feed_and_sitemap_are_xml() {
        let (state, _, post) = seeded().await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/blog/feed/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers().get("content-type").cloned();
        let xml = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(content_type.unwrap().to_str().unwrap().starts_with("application/rss+xml"));
        assert!(xml.contains("<title>My blog</title>"));
        assert_eq!(xml.matches("<item>").count(), 1);

        let req = test::TestRequest::get().uri("/sitemap.xml").to_request();
        let xml = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
        assert!(xml.contains(&format!("<loc>https://blog.example.com{}</loc>", post.absolute_path())));
        assert_eq!(xml.matches("<url>").count(), 1);
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
    }

    #[actix_web::test]
    async fn feed_holds_the_five_newest_posts() {
        let (state, _, _) = seeded().await;
        publish_series(&state, 6).await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/blog/feed/").to_request();
        let xml = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
        assert_eq!(xml.matches("<item>").count(), 5);

        let positions: Vec<usize> = ["Rust tips", "Post 0", "Post 1", "Post 2", "Post 3"]
            .iter()
            .map(|title| xml.find(&format!("<title>{title}</title>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!xml.contains("<title>Post 4</title>"));
        assert!(!xml.contains("<title>Unfinished</title>"));
    }

    #[actix_web::test]
    async fn widget_count_is_capped() {
        let (state, _, _) = seeded().await;
        publish_series(&state, MAX_WIDGET_COUNT + 4).await;
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri(&format!("/blog/widgets/?count={}", usize::MAX))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total_posts"], MAX_WIDGET_COUNT + 5);
        assert_eq!(body["latest_posts"].as_array().map(Vec::len), Some(MAX_WIDGET_COUNT));
        assert_eq!(
            body["most_commented_posts"].as_array().map(Vec::len),
            Some(MAX_WIDGET_COUNT)
        );
    }
}
