/// Integration tests for the prepstack API
///
/// The first group exercises routing, validation, authentication, and error
/// mapping against an offline router (no database). The second group runs
/// full flows (signup, login, rotation, favorites, soft delete, rankings)
/// against `TEST_DATABASE_URL` and skips when it is unset.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Offline tests: no database required
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = common::offline_app();

    let response = app.oneshot(common::get("/api/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_route_without_token_is_401() {
    let app = common::offline_app();

    let response = app.oneshot(common::get("/api/users/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::read_json(response).await;
    assert_eq!(body["code"], "AUTH/UNAUTHORIZED");
}

#[tokio::test]
async fn test_protected_route_with_garbage_token_is_401() {
    let app = common::offline_app();

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/users/me")
        .header("authorization", "Bearer not-a-jwt")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_post_method_requires_auth() {
    // Mixed-method path: GET /api/questions is public, POST is not
    let app = common::offline_app();

    let response = app
        .oneshot(common::post_json(
            "/api/questions",
            json!({"title": "t", "content": "c"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_invalid_email_is_422() {
    let app = common::offline_app();

    let response = app
        .oneshot(common::post_json(
            "/api/auth/signup",
            json!({"email": "not-an-email", "password": "Abc12345!", "nickname": "tester1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::read_json(response).await;
    assert_eq!(body["code"], "VALIDATION/FIELD");
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_signup_weak_password_is_422() {
    let app = common::offline_app();

    // Long enough but missing uppercase/digit/special
    let response = app
        .oneshot(common::post_json(
            "/api/auth/signup",
            json!({"email": "a@b.com", "password": "weakpassword", "nickname": "tester1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_refresh_without_cookie_is_401() {
    let app = common::offline_app();

    let response = app
        .oneshot(common::post_json("/api/auth/refresh", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_availability_with_unknown_field_is_400() {
    let app = common::offline_app();

    let response = app
        .oneshot(common::get("/api/auth/availability?field=phone&value=123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::read_json(response).await;
    assert_eq!(body["code"], "COMMON/BAD_REQUEST");
}

#[tokio::test]
async fn test_comment_listing_with_bad_category_is_400() {
    let app = common::offline_app();

    let uri = format!("/api/comments/{}?category=question", Uuid::new_v4());
    let response = app.oneshot(common::get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = common::offline_app();

    let response = app.oneshot(common::get("/api/nope")).await.unwrap();

    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");
    // Not production: no HSTS
    assert!(response.headers().get("Strict-Transport-Security").is_none());
}

// ---------------------------------------------------------------------------
// Database-backed tests: skip unless TEST_DATABASE_URL is set
// ---------------------------------------------------------------------------

fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4())
}

fn unique_nickname() -> String {
    format!("nick{}", &Uuid::new_v4().simple().to_string()[..12])
}

/// Signs up and logs in a fresh user, returning (email, cookie header)
async fn signup_and_login(ctx: &common::TestContext) -> (String, String) {
    let email = unique_email();
    let nickname = unique_nickname();

    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json(
            "/api/auth/signup",
            json!({"email": email, "password": "Abc12345!", "nickname": nickname}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json(
            "/api/auth/login",
            json!({"email": email, "password": "Abc12345!"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = common::cookies_from(&response);
    assert!(cookies.contains("accessToken="));
    assert!(cookies.contains("refreshToken="));

    (email, cookies)
}

#[tokio::test]
async fn test_duplicate_signup_is_409_with_code() {
    let Some(ctx) = common::db_context().await else {
        return;
    };

    let email = unique_email();
    let nickname = unique_nickname();
    let body = json!({"email": email, "password": "Abc12345!", "nickname": nickname});

    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json("/api/auth/signup", body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same email again
    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json("/api/auth/signup", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = common::read_json(response).await;
    assert_eq!(body["code"], "DUPLICATE/EMAIL");

    // Same nickname, different email
    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json(
            "/api/auth/signup",
            json!({"email": unique_email(), "password": "Abc12345!", "nickname": nickname}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = common::read_json(response).await;
    assert_eq!(body["code"], "DUPLICATE/NICKNAME");
}

#[tokio::test]
async fn test_login_yields_working_session() {
    let Some(ctx) = common::db_context().await else {
        return;
    };

    let (email, cookies) = signup_and_login(&ctx).await;

    let response = ctx
        .app
        .clone()
        .oneshot(common::get_with_cookies("/api/users/me", &cookies))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert_eq!(body["email"], email);
}

#[tokio::test]
async fn test_refresh_rotation_invalidates_old_token() {
    let Some(ctx) = common::db_context().await else {
        return;
    };

    let (_, cookies) = signup_and_login(&ctx).await;

    // First rotation succeeds and issues new cookies
    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            "/api/auth/refresh",
            json!({}),
            &cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let new_cookies = common::cookies_from(&response);
    assert!(new_cookies.contains("refreshToken="));

    // Replaying the old refresh token must fail
    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            "/api/auth/refresh",
            json!({}),
            &cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The rotated pair still works
    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            "/api/auth/refresh",
            json!({}),
            &new_cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_access_token_refreshes_transparently() {
    // Access tokens are issued pre-expired (beyond JWT leeway); every
    // authenticated request must succeed via the refresh path.
    let Some(ctx) = common::db_context_with(|config| {
        config.jwt.access_ttl_secs = -120;
    })
    .await
    else {
        return;
    };

    let (email, cookies) = signup_and_login(&ctx).await;

    let response = ctx
        .app
        .clone()
        .oneshot(common::get_with_cookies("/api/users/me", &cookies))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The middleware rotated: fresh cookies ride on the response
    let rotated = common::cookies_from(&response);
    assert!(rotated.contains("refreshToken="));

    let body = common::read_json(response).await;
    assert_eq!(body["email"], email);
}

#[tokio::test]
async fn test_logout_revokes_refresh_session() {
    let Some(ctx) = common::db_context().await else {
        return;
    };

    let (_, cookies) = signup_and_login(&ctx).await;

    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            "/api/auth/logout",
            json!({}),
            &cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The refresh token from before logout is revoked
    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            "/api/auth/refresh",
            json!({}),
            &cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_favorite_is_unique_per_user_and_target() {
    let Some(ctx) = common::db_context().await else {
        return;
    };

    let (_, cookies) = signup_and_login(&ctx).await;

    // Create a question to favorite
    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            "/api/questions",
            json!({"title": "What is ownership?", "content": "Explain move semantics."}),
            &cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let question = common::read_json(response).await;
    let question_id = question["id"].as_str().unwrap().to_string();

    let uri = format!("/api/favorites/{}", question_id);

    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            &uri,
            json!({"targetKind": "question"}),
            &cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Second favorite on the same target fails
    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            &uri,
            json!({"targetKind": "question"}),
            &cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = common::read_json(response).await;
    assert_eq!(body["code"], "DUPLICATE/FAVORITE");

    // Unfavorite works once, then 404
    let remove_uri = format!("{}?targetKind=question", uri);
    let response = ctx
        .app
        .clone()
        .oneshot(common::delete_with_cookies(&remove_uri, &cookies))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(common::delete_with_cookies(&remove_uri, &cookies))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_soft_deleted_comment_is_masked_but_addressable() {
    let Some(ctx) = common::db_context().await else {
        return;
    };

    let (_, cookies) = signup_and_login(&ctx).await;

    // Question -> answer -> comment on the answer
    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            "/api/questions",
            json!({"title": "Borrow checker?", "content": "Explain lifetimes."}),
            &cookies,
        ))
        .await
        .unwrap();
    let question = common::read_json(response).await;
    let question_id = question["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            &format!("/api/answers/{}", question_id),
            json!({"content": "Lifetimes bound borrows."}),
            &cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let answer = common::read_json(response).await;
    let answer_id = answer["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            &format!("/api/comments/{}", answer_id),
            json!({"category": "answer", "content": "Great explanation!"}),
            &cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment = common::read_json(response).await;
    let comment_id = comment["id"].as_str().unwrap().to_string();

    // Soft delete
    let response = ctx
        .app
        .clone()
        .oneshot(common::delete_with_cookies(
            &format!("/api/comments/{}", comment_id),
            &cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Still listed, but masked
    let response = ctx
        .app
        .clone()
        .oneshot(common::get(&format!(
            "/api/comments/{}?category=answer",
            answer_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let thread = common::read_json(response).await;
    let row = thread
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == comment_id.as_str())
        .expect("deleted comment still addressable");

    assert_eq!(row["isDeleted"], true);
    assert_eq!(row["content"], "[deleted]");
    assert!(row["userId"].is_null());
}

#[tokio::test]
async fn test_ownership_check_rejects_other_users() {
    let Some(ctx) = common::db_context().await else {
        return;
    };

    let (_, owner_cookies) = signup_and_login(&ctx).await;
    let (_, intruder_cookies) = signup_and_login(&ctx).await;

    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            "/api/questions",
            json!({"title": "Send vs Sync?", "content": "Explain the difference."}),
            &owner_cookies,
        ))
        .await
        .unwrap();
    let question = common::read_json(response).await;
    let question_id = question["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(common::post_json_with_cookies(
            &format!("/api/answers/{}", question_id),
            json!({"content": "Mine."}),
            &owner_cookies,
        ))
        .await
        .unwrap();
    let answer = common::read_json(response).await;
    let answer_id = answer["id"].as_str().unwrap().to_string();

    // A different user cannot delete it
    let response = ctx
        .app
        .clone()
        .oneshot(common::delete_with_cookies(
            &format!("/api/answers/{}", answer_id),
            &intruder_cookies,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = common::read_json(response).await;
    assert_eq!(body["code"], "AUTH/FORBIDDEN");
}

#[tokio::test]
async fn test_composite_ranking_is_non_increasing() {
    let Some(ctx) = common::db_context().await else {
        return;
    };

    // A zero-activity user must rank without erroring
    let (_, cookies) = signup_and_login(&ctx).await;

    let response = ctx
        .app
        .clone()
        .oneshot(common::get_with_cookies("/api/rankings/score", &cookies))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let rows = common::read_json(response).await;
    let scores: Vec<i64> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["score"].as_i64().unwrap())
        .collect();

    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    // Single-user rank lookup always resolves
    let response = ctx
        .app
        .clone()
        .oneshot(common::get_with_cookies("/api/rankings/me", &cookies))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert!(body["rank"].as_i64().unwrap() >= 1);
}
