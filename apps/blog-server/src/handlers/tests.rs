use std::sync::Arc;

use actix_web::{App, http::StatusCode, http::header, test, web};
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use blog_core::domain::{Category, User};
use blog_core::ports::{BaseRepository, PasswordService, PostRepository, TokenService};
use blog_infra::{Argon2PasswordService, InMemoryEntityStore, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::state::AppState;

struct Harness {
    store: Arc<InMemoryEntityStore>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: Arc::new(InMemoryEntityStore::new()),
            tokens: Arc::new(JwtTokenService::new(JwtConfig::default())),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    async fn user(&self, username: &str) -> (User, String) {
        let user = self
            .store
            .save(User::new(
                username.to_string(),
                format!("{username}@example.com"),
                "hash".to_string(),
            ))
            .await
            .unwrap();
        let token = self.tokens.generate_token(user.id, &user.username).unwrap();
        (user, format!("Bearer {token}"))
    }

    async fn category(&self, slug: &str) -> Category {
        self.store
            .save(Category::new(
                slug.to_string(),
                String::new(),
                slug.to_string(),
            ))
            .await
            .unwrap()
    }
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory($harness.store.clone())))
                .app_data(web::Data::new($harness.tokens.clone()))
                .app_data(web::Data::new($harness.passwords.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn post_body(category: &Category, pub_date: DateTime<Utc>) -> Value {
    json!({
        "title": "Hello",
        "text": "World",
        "pub_date": pub_date,
        "category_id": category.id,
    })
}

fn location(resp: &actix_web::dev::ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[actix_web::test]
async fn test_health() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_anonymous_mutation_redirects_to_login() {
    let harness = Harness::new();
    let category = harness.category("travel").await;
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_body(&category, Utc::now()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let login = location(&resp).to_string();
    assert_eq!(login, "/api/auth/login?next=%2Fapi%2Fposts");

    let req = test::TestRequest::get().uri(&login).to_request();
    let prompt: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(prompt["login_url"], "/api/auth/login");
    assert_eq!(prompt["next"], "/api/posts");
}

#[actix_web::test]
async fn test_invalid_token_is_unauthorized() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::put()
        .uri("/api/profile")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
        .set_json(json!({"username": "someone", "email": "someone@example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_non_author_delete_redirects_and_keeps_post() {
    let harness = Harness::new();
    let (_, alice) = harness.user("alice").await;
    let (_, bob) = harness.user("bob").await;
    let category = harness.category("travel").await;
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, alice))
        .set_json(post_body(&category, Utc::now()))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let post_id: Uuid = serde_json::from_value(created["id"].clone()).unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header((header::AUTHORIZATION, bob))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/api/posts/{post_id}"));
    assert!(harness.store.find_details(post_id).await.unwrap().is_some());
}

#[actix_web::test]
async fn test_scheduled_post_visible_only_to_author() {
    let harness = Harness::new();
    let (_, alice) = harness.user("alice").await;
    let category = harness.category("travel").await;
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(post_body(&category, Utc::now() + TimeDelta::days(1)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let uri = format!("/api/posts/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let index: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(index["total"], 0);
}

#[actix_web::test]
async fn test_unknown_category_and_page_are_not_found() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/category/nowhere")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/posts?page=2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts?page={}", u64::MAX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_comments_listed_oldest_first() {
    let harness = Harness::new();
    let (_, alice) = harness.user("alice").await;
    let (_, bob) = harness.user("bob").await;
    let category = harness.category("travel").await;
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(post_body(&category, Utc::now()))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/posts/{}", created["id"].as_str().unwrap());

    for (token, text) in [(&bob, "first"), (&alice, "second")] {
        let req = test::TestRequest::post()
            .uri(&format!("{uri}/comments"))
            .insert_header((header::AUTHORIZATION, token.clone()))
            .set_json(json!({ "text": text }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri(&uri).to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(detail["post"]["comment_count"], 2);
    assert_eq!(detail["comments"][0]["text"], "first");
    assert_eq!(detail["comments"][0]["author"]["username"], "bob");
    assert_eq!(detail["comments"][1]["text"], "second");
}

#[actix_web::test]
async fn test_register_then_login() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "correct-horse",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "carol", "password": "wrong-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "carol", "password": "correct-horse"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["access_token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["username"], "carol");
}
