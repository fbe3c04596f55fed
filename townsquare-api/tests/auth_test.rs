/// Integration tests for registration, login, and the current-user endpoint
///
/// Registration is the only multi-statement write in the system, so these
/// tests also verify its atomicity by counting rows after failure paths.

mod common;

use axum::http::StatusCode;
use common::{register_payload, TestContext};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_register_creates_account_with_profile_and_stats() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request("POST", "/v1/auth/register", None, Some(register_payload("ada")))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());

    let user = &body["data"]["user"];
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["username"], "user_ada");
    assert_eq!(user["is_verified"], json!(true));
    assert_eq!(user["stats"]["posts"], json!(0));
    assert_eq!(user["profile"]["skills"], json!([]));

    // Password material must never leave the server
    assert!(user.get("password_hash").is_none());

    let user_id = Uuid::parse_str(user["id"].as_str().unwrap()).unwrap();

    let (users, profiles, stats): (i64, i64, i64) = (
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&ctx.db)
            .await
            .unwrap(),
        sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap(),
        sqlx::query_scalar("SELECT COUNT(*) FROM user_stats WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap(),
    );

    assert_eq!((users, profiles, stats), (1, 1, 1));
}

#[tokio::test]
async fn test_register_minimal_valid_payload() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "email": "a@b.com",
                "username": "abc123",
                "password": "Abc12345!",
                "firstName": "A",
                "surname": "B",
                "phone": "08012345678",
                "agreeTerms": true
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["username"], "abc123");
    assert_eq!(body["data"]["user"]["stats"]["posts"], json!(0));
}

#[tokio::test]
async fn test_register_duplicate_email_leaves_no_partial_account() {
    let ctx = TestContext::new().await.unwrap();

    ctx.register("ada").await;

    let mut payload = register_payload("ada");
    payload["username"] = json!("different_name");

    let (status, body) = ctx
        .request("POST", "/v1/auth/register", None, Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], "bad_request");

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(&ctx.db)
        .await
        .unwrap();

    assert_eq!(users, 1);
    assert_eq!(profiles, 1);
}

#[tokio::test]
async fn test_register_duplicate_username_rejected() {
    let ctx = TestContext::new().await.unwrap();

    ctx.register("ada").await;

    let mut payload = register_payload("ngozi");
    payload["username"] = json!("user_ada");

    let (status, body) = ctx
        .request("POST", "/v1/auth/register", None, Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Username"));
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let ctx = TestContext::new().await.unwrap();

    let mut payload = register_payload("ada");
    payload["password"] = json!("alllowercase1");

    let (status, body) = ctx
        .request("POST", "/v1/auth/register", None, Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"][0]["field"], "password");
}

#[tokio::test]
async fn test_register_requires_terms_acceptance() {
    let ctx = TestContext::new().await.unwrap();

    let mut payload = register_payload("ada");
    payload["agreeTerms"] = json!(false);

    let (status, body) = ctx
        .request("POST", "/v1/auth/register", None, Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "agree_terms");
}

#[tokio::test]
async fn test_register_validates_phone_format() {
    let ctx = TestContext::new().await.unwrap();

    let mut payload = register_payload("ada");
    payload["phone"] = json!("+2348012345678");

    let (status, body) = ctx
        .request("POST", "/v1/auth/register", None, Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_login_with_email_and_with_username() {
    let ctx = TestContext::new().await.unwrap();
    ctx.register("ada").await;

    for identifier in ["ada@example.com", "user_ada"] {
        let (status, body) = ctx
            .request(
                "POST",
                "/v1/auth/login",
                None,
                Some(json!({ "identifier": identifier, "password": "Abc12345!" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "login as {identifier}: {body}");
        assert!(!body["data"]["token"].as_str().unwrap().is_empty());
        assert_eq!(body["data"]["user"]["is_online"], json!(true));
    }
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let ctx = TestContext::new().await.unwrap();
    ctx.register("ada").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "identifier": "ada@example.com", "password": "Wrong123!" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_identifier_unauthorized() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "identifier": "nobody@example.com", "password": "Abc12345!" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unverified_account_forbidden() {
    let ctx = TestContext::new().await.unwrap();
    let (_, user) = ctx.register("ada").await;

    sqlx::query("UPDATE users SET is_verified = FALSE WHERE id = ?")
        .bind(Uuid::parse_str(user["id"].as_str().unwrap()).unwrap())
        .execute(&ctx.db)
        .await
        .unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "identifier": "ada@example.com", "password": "Abc12345!" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "Account is not verified");
}

#[tokio::test]
async fn test_me_requires_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/v1/auth/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx
        .request("GET", "/v1/auth/me", Some("not-a-jwt"), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let ctx = TestContext::new().await.unwrap();
    let (token, user) = ctx.register("ada").await;

    let (status, body) = ctx.request("GET", "/v1/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user["id"]);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["stats"]["questions"], json!(0));
}

#[tokio::test]
async fn test_internal_errors_expose_detail_in_development() {
    let ctx = TestContext::new().await.unwrap();
    let (token, user) = ctx.register("ada").await;

    // Break the invariant that every user has a profile row so /me hits the
    // internal error path
    sqlx::query("DELETE FROM profiles WHERE user_id = ?")
        .bind(Uuid::parse_str(user["id"].as_str().unwrap()).unwrap())
        .execute(&ctx.db)
        .await
        .unwrap();

    let (status, body) = ctx.request("GET", "/v1/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "internal_error");
    // Test config is development mode, so the detail is visible
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("no profile row"));
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["database"], "connected");
}
