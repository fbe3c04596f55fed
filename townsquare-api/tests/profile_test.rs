/// Integration tests for profile read and update endpoints

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_registration_seeds_default_profile() {
    let ctx = TestContext::new().await.unwrap();
    let (token, user) = ctx.register("ada").await;

    let (status, body) = ctx.request("GET", "/v1/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], user["id"]);
    assert_eq!(body["data"]["bio"], json!(null));
    assert_eq!(body["data"]["skills"], json!([]));
    assert_eq!(body["data"]["privacy"]["profile_visible"], json!(true));
}

#[tokio::test]
async fn test_update_profile_writes_only_present_fields() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _) = ctx.register("ada").await;

    let (status, body) = ctx
        .request(
            "PUT",
            "/v1/profile",
            Some(&token),
            Some(json!({
                "bio": "Software engineer in Lekki.",
                "skills": ["rust", "sql"]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bio"], "Software engineer in Lekki.");
    assert_eq!(body["data"]["skills"], json!(["rust", "sql"]));
    // Untouched fields keep their values
    assert_eq!(body["data"]["location"], json!(null));
    assert_eq!(body["data"]["privacy"]["profile_visible"], json!(true));

    let (_, body) = ctx
        .request(
            "PUT",
            "/v1/profile",
            Some(&token),
            Some(json!({ "location": "Lagos" })),
        )
        .await;

    assert_eq!(body["data"]["location"], "Lagos");
    assert_eq!(body["data"]["bio"], "Software engineer in Lekki.");
}

#[tokio::test]
async fn test_update_profile_rejects_oversized_bio() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _) = ctx.register("ada").await;

    let (status, body) = ctx
        .request(
            "PUT",
            "/v1/profile",
            Some(&token),
            Some(json!({ "bio": "x".repeat(2001) })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"][0]["field"], "bio");
}

#[tokio::test]
async fn test_update_profile_replaces_privacy_blob() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _) = ctx.register("ada").await;

    let (status, body) = ctx
        .request(
            "PUT",
            "/v1/profile",
            Some(&token),
            Some(json!({
                "privacy": { "profile_visible": false, "show_email": true, "show_phone": false }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["privacy"]["profile_visible"], json!(false));
    assert_eq!(body["data"]["privacy"]["show_email"], json!(true));
}

#[tokio::test]
async fn test_get_other_members_profile() {
    let ctx = TestContext::new().await.unwrap();
    let (ada_token, _) = ctx.register("ada").await;
    let (_, ngozi) = ctx.register("ngozi").await;

    let (status, body) = ctx
        .request(
            "GET",
            &format!("/v1/profile/{}", ngozi["id"].as_str().unwrap()),
            Some(&ada_token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], ngozi["id"]);
}

#[tokio::test]
async fn test_get_profile_for_unknown_user_is_404() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _) = ctx.register("ada").await;

    let (status, _) = ctx
        .request(
            "GET",
            "/v1/profile/00000000-0000-0000-0000-000000000000",
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_routes_require_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.request("GET", "/v1/profile", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
