//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: DATABASE_URL (JWT_SECRET is optional)
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::{assert_json, assert_status, check_test_env, fixtures::*, TestServer};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health", None).await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready", None).await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_verify_login() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/api/auth/register", None, &request).await.unwrap();
    let created: Envelope<UserResponse> = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created.message, "User created");
    assert!(!created.data.unwrap().verified);

    // unverified accounts cannot log in yet
    let response = server.login(&request).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let verify = VerifyUserRequest {
        email: request.email.clone(),
        code: server.verification_code(&request.email).await.unwrap(),
    };
    let response = server.post("/api/auth/verify-user", None, &verify).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.login(&request).await.unwrap();
    let login: Envelope<TokenResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let token = login.data.unwrap();
    assert_eq!(token.token_type, "Bearer");

    let response = server.get("/api/user/me", Some(&token.token)).await.unwrap();
    let me: Envelope<UserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let me = me.data.unwrap();
    assert_eq!(me.username, request.username);
    assert_eq!(me.email, request.email);
    assert!(me.verified);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/api/auth/register", None, &request).await.unwrap();

    let duplicate = RegisterRequest {
        username: RegisterRequest::unique().username,
        email: request.email.clone(),
        password: request.password.clone(),
    };
    let response = server.post("/api/auth/register", None, &duplicate).await.unwrap();
    let err: ErrorEnvelope = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.status, "error");
    assert_eq!(err.message, "Email already exists");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.signup(&request).await.unwrap();

    let wrong = LoginRequest {
        email: request.email.clone(),
        password: "not the password".to_string(),
    };
    let response = server.post("/api/auth/login", None, &wrong).await.unwrap();
    let err: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.code, "INVALID_CREDENTIALS");
}

// ============================================================================
// Feed Tests
// ============================================================================

#[tokio::test]
async fn test_feed_pages_newest_first() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.signup(&RegisterRequest::unique()).await.unwrap();

    let mut created = Vec::new();
    for _ in 0..3 {
        let response = server
            .post("/api/post/make-post", Some(&token), &CreatePostRequest::default())
            .await
            .unwrap();
        let post: Envelope<PostResponse> =
            assert_json(response, StatusCode::CREATED).await.unwrap();
        created.push(post.data.unwrap().id);
    }

    // other tests may post concurrently, so only our own posts are compared
    let ours = |ids: Vec<String>| -> Vec<String> {
        ids.into_iter().filter(|id| created.contains(id)).collect()
    };

    let path = format!("/api/post/feed?before={}&limit=50", created[2]);
    let response = server.get(&path, None).await.unwrap();
    let page: Envelope<FeedPage> = assert_json(response, StatusCode::OK).await.unwrap();
    let page = page.data.unwrap();
    assert!(page.count <= 50);
    assert_eq!(ours(page.ids()), vec![created[1].clone(), created[0].clone()]);

    let path = format!("/api/post/feed?after={}&limit=50", created[0]);
    let response = server.get(&path, None).await.unwrap();
    let page: Envelope<FeedPage> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(
        ours(page.data.unwrap().ids()),
        vec![created[2].clone(), created[1].clone()]
    );
}

#[tokio::test]
async fn test_feed_rejects_both_pivots() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/post/feed?before=1&after=2", None).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server.get("/api/post/feed?limit=0", None).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_ledger() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = RegisterRequest::unique();
    let owner_token = server.signup(&owner).await.unwrap();
    let fan_token = server.signup(&RegisterRequest::unique()).await.unwrap();

    let response = server
        .post("/api/post/make-post", Some(&owner_token), &CreatePostRequest::default())
        .await
        .unwrap();
    let post: Envelope<PostResponse> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let post_id = post.data.unwrap().id;
    let react = format!("/api/post/react/{post_id}");

    let response = server
        .post(&react, Some(&fan_token), &ReactRequest::new("🔥"))
        .await
        .unwrap();
    let outcome: Envelope<ReactionOutcome> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome.message, "Reaction added");

    let response = server
        .post(&react, Some(&fan_token), &ReactRequest::new("😂"))
        .await
        .unwrap();
    let outcome: Envelope<ReactionOutcome> = assert_json(response, StatusCode::OK).await.unwrap();
    let outcome = outcome.data.unwrap();
    assert_eq!(outcome.result, "updated");
    assert_eq!(outcome.previous.as_deref(), Some("🔥"));
    assert_eq!(outcome.label, "😂");

    let response = server
        .get(&format!("/api/post/{post_id}"), Some(&fan_token))
        .await
        .unwrap();
    let post: Envelope<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let post = post.data.unwrap();
    assert_eq!(post.reactions.get("😂"), Some(&1));
    assert!(!post.reactions.contains_key("🔥"));
    assert_eq!(post.my_reaction.as_deref(), Some("😂"));

    let response = server
        .get(&format!("/api/user/{}", owner.username), None)
        .await
        .unwrap();
    let profile: Envelope<ProfileResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let profile = profile.data.unwrap();
    assert_eq!(profile.reactions_received, 1);
    assert_eq!(profile.post_ids, vec![post_id.clone()]);

    // same label again removes it
    let response = server
        .post(&react, Some(&fan_token), &ReactRequest::new("😂"))
        .await
        .unwrap();
    let outcome: Envelope<ReactionOutcome> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome.data.unwrap().result, "removed");
}

#[tokio::test]
async fn test_concurrent_reactions_keep_counts_exact() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner_token = server.signup(&RegisterRequest::unique()).await.unwrap();
    let response = server
        .post("/api/post/make-post", Some(&owner_token), &CreatePostRequest::default())
        .await
        .unwrap();
    let post: Envelope<PostResponse> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let post_id = post.data.unwrap().id;

    let mut fans = Vec::new();
    for _ in 0..5 {
        fans.push(server.signup(&RegisterRequest::unique()).await.unwrap());
    }

    let react = format!("/api/post/react/{post_id}");
    let requests = fans.iter().map(|token| {
        let server = &server;
        let react = react.as_str();
        async move {
            server
                .post(react, Some(token), &ReactRequest::new("👍"))
                .await
                .unwrap()
                .status()
        }
    });
    for status in join_all(requests).await {
        assert_eq!(status, StatusCode::OK);
    }

    let response = server.get(&format!("/api/post/{post_id}"), None).await.unwrap();
    let post: Envelope<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(post.data.unwrap().reactions.get("👍"), Some(&5));
}
