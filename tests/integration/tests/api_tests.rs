//! API Integration Tests
//!
//! Every test boots its own server on an ephemeral port, backed by the
//! in-memory repositories and a temporary media root.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, fixtures::*, TestServer};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Register `username`, follow the activation link and return the tokens
async fn signup(server: &TestServer, username: &str) -> Tokens {
    let response = server
        .post("/api/auth/register", &register_body(username))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let token = server
        .notifier
        .token_for(&email(username))
        .expect("activation link was sent");
    let response = server
        .post("/api/auth/activate", &json!({ "token": token }))
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn upload(server: &TestServer, token: &str) -> String {
    let response = server
        .upload(Some(token), "image/png", png(64, 64))
        .await
        .unwrap();
    let media: Media = assert_json(response, StatusCode::CREATED).await.unwrap();
    media.name
}

async fn create_poll(server: &TestServer, token: &str, title: &str, places: i64) -> PollBody {
    let mut media = Vec::new();
    for _ in 0..places {
        media.push(upload(server, token).await);
    }
    let response = server
        .post_auth("/api/polls", token, &poll_body(title, places, &media))
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    for path in ["/health", "/health/live"] {
        let response = server.get(path).await.expect("Request failed");
        let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body["status"], "healthy");
    }
}

#[tokio::test]
async fn test_readiness_without_database() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["storage"], "healthy");
}

// ============================================================================
// Account Tests
// ============================================================================

#[tokio::test]
async fn test_register_activate_login() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/auth/register", &register_body("alice"))
        .await
        .unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created["username"], "alice");
    assert!(created.get("password").is_none());

    // inactive accounts cannot log in
    let response = server.post("/api/auth", &login_body("alice")).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let token = server.notifier.token_for("alice@example.com").unwrap();
    let response = server
        .post("/api/auth/activate", &json!({ "token": token }))
        .await
        .unwrap();
    let activated: Tokens = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(activated.token_type, "Bearer");

    let response = server.post("/api/auth", &login_body("alice")).await.unwrap();
    let tokens: Tokens = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth("/api/profile", &tokens.access_token)
        .await
        .unwrap();
    let profile: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile["email"], "alice@example.com");
}

#[tokio::test]
async fn test_verify_and_refresh() {
    let server = TestServer::start().await.unwrap();
    let tokens = signup(&server, "bob").await;

    let response = server
        .post("/api/auth/verify", &json!({ "token": tokens.access_token }))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post("/api/auth/verify", &json!({ "token": "not-a-token" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post(
            "/api/auth/refresh",
            &json!({ "refresh_token": tokens.refresh_token }),
        )
        .await
        .unwrap();
    let refreshed: Tokens = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!refreshed.access_token.is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_reports_field() {
    let server = TestServer::start().await.unwrap();
    signup(&server, "carol").await;

    let response = server
        .post("/api/auth/register", &register_body("carol"))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    let details = body.error.details.expect("field details");
    assert!(details.get("email").is_some() || details.get("username").is_some());
}

#[tokio::test]
async fn test_profile_requires_authentication() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/profile").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/api/profile", "garbage").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_password_reset_flow() {
    let server = TestServer::start().await.unwrap();
    signup(&server, "dave").await;

    let response = server
        .post(
            "/api/profile/password/forget",
            &json!({ "email": "dave@example.com" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let token = server.notifier.token_for("dave@example.com").unwrap();
    let reset = json!({
        "token": token,
        "new_password": "BrandNewPass2",
        "confirmed_password": "BrandNewPass2",
    });
    let response = server
        .post("/api/profile/password/reset", &reset)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // the link stops working once the password changed
    let response = server
        .post("/api/profile/password/reset", &reset)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post(
            "/api/auth",
            &json!({ "email": "dave@example.com", "password": "BrandNewPass2" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Media Tests
// ============================================================================

#[tokio::test]
async fn test_upload_and_serve_media() {
    let server = TestServer::start().await.unwrap();
    let tokens = signup(&server, "erin").await;

    let response = server
        .upload(Some(&tokens.access_token), "image/png", png(32, 16))
        .await
        .unwrap();
    let media: Media = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(media.name.ends_with(".jpeg"));
    assert_eq!(media.url, format!("/media/{}", media.name));

    let response = server.get(&media.url).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert!(!response.bytes().await.unwrap().is_empty());

    let response = server.get("/media/missing.jpeg").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_upload_rejections() {
    let server = TestServer::start().await.unwrap();
    let tokens = signup(&server, "frank").await;

    let response = server.upload(None, "image/png", png(8, 8)).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .upload(Some(&tokens.access_token), "image/png", b"not an image".to_vec())
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .upload(Some(&tokens.access_token), "image/png", Vec::new())
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Poll Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_fetch_poll() {
    let server = TestServer::start().await.unwrap();
    let tokens = signup(&server, "grace").await;

    let poll = create_poll(&server, &tokens.access_token, "Best Cat", 2).await;
    assert_eq!(poll.places_number, 2);
    assert_eq!(poll.options.len(), 2);
    assert!(poll.options[0].media.url.starts_with("/media/"));

    // polls are public
    let response = server.get(&format!("/api/polls/{}", poll.slug)).await.unwrap();
    let fetched: PollBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.id, poll.id);
    assert_eq!(fetched.title, "Best Cat");

    let response = server
        .get(&format!("/api/polls/{}/options", poll.slug))
        .await
        .unwrap();
    let options: Vec<OptionBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(options.len(), 2);
}

#[tokio::test]
async fn test_create_poll_rejects_odd_places() {
    let server = TestServer::start().await.unwrap();
    let tokens = signup(&server, "heidi").await;

    let response = server
        .post_auth("/api/polls", &tokens.access_token, &poll_body("Odd", 3, &[]))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    let details = body.error.details.expect("field details");
    assert!(details.get("places_number").is_some());
}

#[tokio::test]
async fn test_create_poll_requires_authentication() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/polls", &poll_body("Anonymous", 2, &[]))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_option_count_must_match_places() {
    let server = TestServer::start().await.unwrap();
    let tokens = signup(&server, "ivan").await;
    let media = vec![upload(&server, &tokens.access_token).await];

    let response = server
        .post_auth(
            "/api/polls",
            &tokens.access_token,
            &poll_body("Mismatch", 2, &media),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server.get("/api/polls").await.unwrap();
    let page: Page<PollBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.count, 0);
}

#[tokio::test]
async fn test_capacity_is_enforced() {
    let server = TestServer::start().await.unwrap();
    let tokens = signup(&server, "judy").await;
    let poll = create_poll(&server, &tokens.access_token, "Full House", 2).await;
    let media = upload(&server, &tokens.access_token).await;

    let response = server
        .post_auth(
            &format!("/api/polls/{}/add-option", poll.slug),
            &tokens.access_token,
            &option_body("Extra", &media),
        )
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "POLL_CAPACITY_REACHED");
}

#[tokio::test]
async fn test_concurrent_adds_respect_capacity() {
    let server = TestServer::start().await.unwrap();
    let tokens = signup(&server, "ken").await;

    let response = server
        .post_auth(
            "/api/polls",
            &tokens.access_token,
            &poll_body("Race", 2, &[]),
        )
        .await
        .unwrap();
    let poll: PollBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..6 {
        let media = upload(&server, &tokens.access_token).await;
        let request = server
            .client
            .post(format!(
                "{}/api/polls/{}/add-option",
                server.base_url(),
                poll.slug
            ))
            .bearer_auth(&tokens.access_token)
            .json(&option_body(&format!("Racer {i}"), &media));
        tasks.spawn(async move { request.send().await.map(|r| r.status()) });
    }

    let mut created = 0;
    while let Some(result) = tasks.join_next().await {
        if result.unwrap().unwrap() == StatusCode::CREATED {
            created += 1;
        }
    }
    assert_eq!(created, 2);

    let response = server
        .get(&format!("/api/polls/{}/options", poll.slug))
        .await
        .unwrap();
    let options: Vec<OptionBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(options.len(), 2);
}

#[tokio::test]
async fn test_non_owner_sees_not_found() {
    let server = TestServer::start().await.unwrap();
    let owner = signup(&server, "laura").await;
    let other = signup(&server, "mallory").await;
    let poll = create_poll(&server, &owner.access_token, "Mine Only", 2).await;
    let path = format!("/api/polls/{}", poll.slug);

    let response = server.delete(&path, Some(&other.access_token)).await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_POLL");

    let response = server.delete(&path, None).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    // still there for everyone
    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.delete(&path, Some(&owner.access_token)).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_delete_poll_removes_media() {
    let server = TestServer::start().await.unwrap();
    let tokens = signup(&server, "nick").await;
    let poll = create_poll(&server, &tokens.access_token, "Short Lived", 2).await;
    let media_url = poll.options[0].media.url.clone();

    let response = server.get(&media_url).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server
        .delete(&format!("/api/polls/{}", poll.slug), Some(&tokens.access_token))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&media_url).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_update_and_delete_option() {
    let server = TestServer::start().await.unwrap();
    let tokens = signup(&server, "olivia").await;
    let poll = create_poll(&server, &tokens.access_token, "Editable", 2).await;
    let option = &poll.options[0];
    let path = format!("/api/polls/{}/options/{}", poll.slug, option.id);

    let response = server
        .patch_auth(&path, &tokens.access_token, &json!({ "label": "Renamed" }))
        .await
        .unwrap();
    let updated: OptionBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.label, "Renamed");
    assert_eq!(updated.media.name, option.media.name);

    // a full update needs every field
    let response = server
        .put_auth(&path, &tokens.access_token, &json!({ "label": "Only label" }))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(body.error.details.unwrap().get("media").is_some());

    let response = server.delete(&path, Some(&tokens.access_token)).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .get(&format!("/api/polls/{}/options/not-a-number", poll.slug))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_listing_and_my_polls() {
    let server = TestServer::start().await.unwrap();
    let alice = signup(&server, "pat").await;
    let bob = signup(&server, "quinn").await;

    create_poll(&server, &alice.access_token, "First", 2).await;
    create_poll(&server, &alice.access_token, "Second", 2).await;
    create_poll(&server, &bob.access_token, "Third", 2).await;

    let response = server.get("/api/polls?page=1&page_size=2").await.unwrap();
    let page: Page<PollBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.count, 3);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.next, Some(2));
    assert_eq!(page.previous, None);
    assert_eq!(page.results[0].title, "Third");

    let response = server
        .get_auth("/api/polls/my-polls", &alice.access_token)
        .await
        .unwrap();
    let mine: Page<PollBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(mine.count, 2);
    let creator = &mine.results[0].creator_id;
    assert!(mine.results.iter().all(|p| &p.creator_id == creator));

    let response = server.get("/api/polls/my-polls").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Error Envelope Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .client
        .post(format!("{}/api/auth/register", server.base_url()))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");
    assert!(!body.error.message.is_empty());
    assert!(body.error.details.unwrap().get("non_field_errors").is_some());
}

#[tokio::test]
async fn test_unknown_poll_is_not_found() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/polls/does-not-exist").await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_POLL");
}
