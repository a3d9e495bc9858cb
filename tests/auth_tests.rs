use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use infinityx::config::Config;
use infinityx::db::{Store, bootstrap};
use infinityx::services::TokenCodec;
use infinityx::state::AppState;

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_url = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    // Keep password hashing cheap in tests.
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

async fn spawn_app() -> Router {
    let config = test_config();

    let store = Store::with_pool_options(&config.general.database_url, 1, 1)
        .await
        .expect("Failed to open in-memory store");

    bootstrap::auto_initialize(&store, &config.security).await;

    let state = AppState::with_store(config, store).expect("Failed to build app state");
    infinityx::api::router(state).await
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, serde_json::Value, Option<String>) {
    let body = serde_json::json!({ "username": username, "password": password });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or_default();

    (status, json, set_cookie)
}

async fn login_token(app: &Router) -> String {
    let (status, json, _) = login(app, "admin", "admin123").await;
    assert_eq!(status, StatusCode::OK);
    json["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_admin_routes_require_auth() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/courses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = spawn_app().await;

    let (status, json, cookie) = login(&app, "admin", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());
    let wrong_password_error = json["error"].as_str().unwrap().to_string();

    let (status, json, _) = login(&app, "not-a-user", "whatever").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown username and wrong password are indistinguishable to clients.
    assert_eq!(json["error"].as_str().unwrap(), wrong_password_error);
}

#[tokio::test]
async fn test_login_sets_cookie_and_returns_token() {
    let app = spawn_app().await;

    let (status, json, cookie) = login(&app, "admin", "admin123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["token"].as_str().is_some());
    assert_eq!(json["data"]["account"]["username"], "admin");

    let cookie = cookie.expect("login should set the token cookie");
    assert!(cookie.starts_with("adminToken="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_me_with_bearer_token_is_sanitized() {
    let app = spawn_app().await;
    let token = login_token(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["data"]["username"], "admin");

    // The sanitized projection must not carry the credential.
    assert!(json["data"].get("password_hash").is_none());
    assert!(!String::from_utf8_lossy(&bytes).contains("password_hash"));
}

#[tokio::test]
async fn test_me_with_cookie() {
    let app = spawn_app().await;
    let token = login_token(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, format!("adminToken={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_anonymous_me_is_unauthorized() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let app = spawn_app().await;
    let mut token = login_token(&app).await;

    let last = token.pop().unwrap();
    token.push(if last == 'A' { 'B' } else { 'A' });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/courses")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_for_missing_account_is_rejected() {
    let app = spawn_app().await;

    // Correctly signed token naming an account id that does not exist;
    // the resolver must fail at the lookup step, not earlier.
    let codec = TokenCodec::new(&test_config().security);
    let token = codec.issue(9999, "ghost").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bad_cookie_does_not_fall_back_to_header() {
    let app = spawn_app().await;
    let token = login_token(&app).await;

    // The cookie is tried first; when it fails to decode the resolver
    // stops rather than retrying the Authorization header.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, "adminToken=garbage.token.value")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_course_publishing_flow() {
    let app = spawn_app().await;
    let token = login_token(&app).await;

    let draft = serde_json::json!({
        "title": "Intro to Robotics",
        "slug": "intro-to-robotics",
        "published": false
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/courses")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(draft.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let created: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let id = created["data"]["id"].as_i64().unwrap();

    // Drafts are invisible on the public surface.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/courses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let listing: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(listing["data"].as_array().unwrap().len(), 0);

    // Publish it and it appears.
    let published = serde_json::json!({
        "title": "Intro to Robotics",
        "slug": "intro-to-robotics",
        "published": true
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/admin/courses/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(published.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/courses/intro-to-robotics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_contact_message_reaches_admin_inbox() {
    let app = spawn_app().await;
    let token = login_token(&app).await;

    let message = serde_json::json!({
        "name": "Ada",
        "email": "ada@example.com",
        "subject": "Enrolment question",
        "body": "When does the next cohort start?"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/messages")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(message.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/messages")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let inbox: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let items = inbox["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["email"], "ada@example.com");
    assert_eq!(items[0]["read"], false);
}

#[tokio::test]
async fn test_change_password_flow() {
    let app = spawn_app().await;
    let token = login_token(&app).await;

    // Wrong current password is a validation failure.
    let bad = serde_json::json!({
        "current_password": "not-right",
        "new_password": "a-much-better-one"
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/auth/password")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(bad.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let good = serde_json::json!({
        "current_password": "admin123",
        "new_password": "a-much-better-one"
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/auth/password")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(good.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _, _) = login(&app, "admin", "admin123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = login(&app, "admin", "a-much-better-one").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_database_status() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["database"], true);
}

#[tokio::test]
async fn test_unauthorized_response_uses_json_envelope() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/programs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_program_crud_with_category_filter() {
    let app = spawn_app().await;
    let token = login_token(&app).await;

    for (title, category) in [("Rocketry 101", "space"), ("Line Followers", "robotics")] {
        let program = serde_json::json!({
            "title": title,
            "title_ar": "برنامج",
            "category": category,
            "duration": "8 weeks"
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/programs")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(program.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Public listing narrows by school category.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/programs?category=space")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let listing: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let items = listing["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Rocketry 101");
    let id = items[0]["id"].as_i64().unwrap();

    // Update moves it to another school.
    let moved = serde_json::json!({
        "title": "Rocketry 101",
        "category": "engineering"
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/admin/programs/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(moved.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/programs?category=space")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let listing: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(listing["data"].as_array().unwrap().len(), 0);

    // Delete, then a second delete is a 404.
    for expected in [StatusCode::OK, StatusCode::NOT_FOUND] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/admin/programs/{id}"))
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_closed_job_listings_leave_public_page() {
    let app = spawn_app().await;
    let token = login_token(&app).await;

    for (title, open) in [("Rust Engineer", true), ("Office Manager", false)] {
        let job = serde_json::json!({
            "title": title,
            "job_type": "Full-time",
            "location": "Cairo",
            "open": open
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/jobs")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(job.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Careers page sees only the open listing.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/jobs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let public: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let items = public["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Rust Engineer");

    // The back office sees both.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/jobs")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let all: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(all["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_account_conflict() {
    let app = spawn_app().await;
    let token = login_token(&app).await;

    let duplicate = serde_json::json!({
        "username": "admin",
        "password": "whatever-else"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/accounts")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(duplicate.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
