use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test};
use blog_server::infrastructure::clock::ManualClock;
use blog_server::infrastructure::config::{AdminBootstrap, ContentSourceKind};
use blog_server::infrastructure::security::JwtKeys;
use blog_server::presentation::middleware::RequestIdMiddleware;
use blog_server::server::{AppState, Repositories, configure};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

struct Harness {
    state: AppState,
    clock: Arc<ManualClock>,
    token: String,
}

fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-09-01T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

async fn harness(source: ContentSourceKind) -> Harness {
    let clock = Arc::new(ManualClock::new(t0()));
    let state = AppState::new(
        Repositories::in_memory(),
        clock.clone(),
        JwtKeys::new("integration-secret".into(), 600),
        source,
    );
    let admin = AdminBootstrap {
        email: "editor@example.com".into(),
        password: "s3cret-pass".into(),
        display_name: "Editorial Team".into(),
    };
    state.auth.ensure_admin(&admin).await.unwrap();
    let token = state
        .auth
        .login(&admin.email, &admin.password)
        .await
        .unwrap()
        .access_token;
    Harness {
        state,
        clock,
        token,
    }
}

macro_rules! app {
    ($h:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .configure(|cfg| configure(cfg, &$h.state)),
        )
        .await
    };
}

fn bearer(h: &Harness) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", h.token))
}

#[actix_web::test]
async fn draft_is_hidden_until_published() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/admin/posts")
        .insert_header(bearer(&h))
        .set_json(json!({ "slug": "test-post", "title": "Test", "content": "<p>Hello</p>" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["status"], "draft");
    assert_eq!(created["created_at"], created["updated_at"]);
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::get().uri("/posts/test-post").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/posts").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!([]));

    h.clock.advance(Duration::minutes(5));
    let req = test::TestRequest::put()
        .uri(&format!("/admin/posts/{id}"))
        .insert_header(bearer(&h))
        .set_json(json!({ "status": "published" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let published: Value = test::read_body_json(resp).await;
    assert_eq!(published["status"], "published");
    assert!(published["published_at"].is_string());
    assert!(published["scheduled_at"].is_null());

    let req = test::TestRequest::get().uri("/posts/test-post").to_request();
    let article: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(article["title"], "Test");
    assert_eq!(article["author"], "Editorial Team");
    assert_eq!(article["readTime"], "1 min read");
    assert_eq!(article["status"], "published");
    assert_eq!(article["published_at"], published["published_at"]);
    assert_eq!(article["published_at"], json!(t0() + Duration::minutes(5)));
    assert_eq!(article["created_at"], created["created_at"]);

    let req = test::TestRequest::get().uri("/posts").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["slug"], "test-post");
}

#[actix_web::test]
async fn duplicate_slug_is_a_conflict() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/admin/posts")
            .insert_header(bearer(&h))
            .set_json(json!({ "slug": "test-post", "title": "Test" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
        if expected == StatusCode::CONFLICT {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["details"]["field"], "slug");
        }
    }
}

#[actix_web::test]
async fn scheduled_post_appears_once_its_time_passes() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    let past = (t0() - Duration::hours(1)).to_rfc3339();
    let req = test::TestRequest::post()
        .uri("/admin/posts")
        .insert_header(bearer(&h))
        .set_json(json!({
            "slug": "later",
            "title": "Later",
            "status": "scheduled",
            "scheduled_at": past,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "scheduled time must be in the future");

    let future = (t0() + Duration::hours(1)).to_rfc3339();
    let req = test::TestRequest::post()
        .uri("/admin/posts")
        .insert_header(bearer(&h))
        .set_json(json!({
            "slug": "later",
            "title": "Later",
            "status": "scheduled",
            "scheduled_at": future,
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/posts/later").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    h.clock.advance(Duration::hours(1));
    let req = test::TestRequest::get().uri("/posts/later").to_request();
    let article: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(article["date"], json!(t0() + Duration::hours(1)));
    assert_eq!(article["published_at"], json!(t0() + Duration::hours(1)));
    assert_eq!(article["status"], "published");
}

#[actix_web::test]
async fn scheduling_without_a_time_is_rejected() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/admin/posts")
        .insert_header(bearer(&h))
        .set_json(json!({ "slug": "no-time", "title": "No time", "status": "scheduled" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn admin_routes_require_a_valid_token() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/admin/posts")
        .set_json(json!({ "slug": "x", "title": "X" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unauthorized");

    let req = test::TestRequest::delete()
        .uri("/admin/posts/1")
        .insert_header((AUTHORIZATION, "Bearer forged"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/posts").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!([]));
}

#[actix_web::test]
async fn login_returns_bearer_token() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "EDITOR@example.com", "password": "s3cret-pass" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 600);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "editor@example.com", "password": "wrong" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn missing_posts_are_not_found_for_update_and_delete() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    let req = test::TestRequest::put()
        .uri("/admin/posts/999")
        .insert_header(bearer(&h))
        .set_json(json!({ "title": "Nope" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri("/admin/posts/999")
        .insert_header(bearer(&h))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn comments_live_independently_of_posts() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/admin/posts")
        .insert_header(bearer(&h))
        .set_json(json!({ "slug": "discussed", "title": "Discussed", "status": "published" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_i64().unwrap();

    for (name, text) in [("Alice", "First!"), ("Bob", "Second")] {
        let req = test::TestRequest::post()
            .uri("/posts/discussed/comments")
            .set_json(json!({ "author_name": name, "comment": text }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        h.clock.advance(Duration::seconds(30));
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/posts/{id}"))
        .insert_header(bearer(&h))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/posts/discussed/comments").to_request();
    let comments: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = comments
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["author_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bob", "Alice"]);
    assert_eq!(comments[0]["comment"], "Second");
}

#[actix_web::test]
async fn comment_on_unknown_slug_is_stored() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/posts/never-existed/comments")
        .set_json(json!({ "author_name": "Alice", "comment": "Hello?" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert!(created["id"].is_i64());
    assert_eq!(created["created_at"], json!(t0()));

    let req = test::TestRequest::get().uri("/posts/never-existed/comments").to_request();
    let comments: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(comments.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn incomplete_comments_are_rejected() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    let bodies = [
        json!({ "author_name": "Alice" }),
        json!({ "comment": "anonymous" }),
        json!({ "author_name": "  ", "comment": "blank name" }),
    ];
    for body in bodies {
        let req = test::TestRequest::post()
            .uri("/posts/any/comments")
            .set_json(body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    let req = test::TestRequest::post()
        .uri("/posts/any/comments")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn layered_source_serves_bundled_articles() {
    let h = harness(ContentSourceKind::Layered).await;
    let app = app!(h);

    let req = test::TestRequest::get().uri("/posts").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert!(!listed.as_array().unwrap().is_empty());
    assert!(listed[0]["readTime"].is_string());

    let req = test::TestRequest::get()
        .uri("/posts/lsat-test-day-checklist")
        .to_request();
    let article: Value = test::call_and_read_body_json(&app, req).await;
    assert!(article.get("id").is_none() || article["id"].is_null());
    assert_eq!(article["title"], "The LSAT Test Day Checklist");
}

#[actix_web::test]
async fn health_and_request_id() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-request-id", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn comments_are_listed_under_the_exact_slug_they_were_posted_to() {
    let h = harness(ContentSourceKind::Store).await;
    let app = app!(h);

    for slug in ["%20spaced", "trailing%20", "plain"] {
        let uri = format!("/posts/{slug}/comments");
        let req = test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({ "author_name": "Alice", "comment": "Hi" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri(&uri).to_request();
        let comments: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(comments.as_array().unwrap().len(), 1, "slug {slug}");
    }
}
