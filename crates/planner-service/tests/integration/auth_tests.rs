//! E2E tests for login and profile.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use planner_test_utils::{TestPlannerServer, TestTokenBuilder, TEST_JWT_SECRET};
use planner_service::crypto::verify_jwt;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_login_valid_credentials_returns_token() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let user = server
        .register_user("Ada Lovelace", "ada@example.com", "5550100", "correct horse")
        .await?;

    let response = server
        .client()
        .post(format!("{}/auth/login", server.url()))
        .json(&json!({ "email": "ada@example.com", "password": "correct horse" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    let token = body["access_token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Response should include access_token"))?;

    let claims = verify_jwt(token, TEST_JWT_SECRET.as_bytes())?;
    assert_eq!(claims.sub, user["_id"].as_str().unwrap_or_default());
    assert_eq!(claims.email, "ada@example.com");
    assert_eq!(claims.name, "Ada Lovelace");
    assert_eq!(claims.exp - claims.iat, server.config().jwt_expiry_seconds);

    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password_returns_invalid_credentials() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    server
        .register_user("Ada", "ada@example.com", "5550100", "correct horse")
        .await?;

    for (email, password) in [
        ("ada@example.com", "wrong"),
        ("nobody@example.com", "correct horse"),
    ] {
        let response = server
            .client()
            .post(format!("{}/auth/login", server.url()))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await?;
        assert_eq!(body, json!({ "message": "Invalid credentials" }));
    }

    Ok(())
}

#[tokio::test]
async fn test_login_repeated_tokens_carry_same_identity() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    server
        .register_user("Ada", "ada@example.com", "5550100", "pw")
        .await?;

    let first = verify_jwt(
        &server.login("ada@example.com", "pw").await?,
        TEST_JWT_SECRET.as_bytes(),
    )?;
    let second = verify_jwt(
        &server.login("ada@example.com", "pw").await?,
        TEST_JWT_SECRET.as_bytes(),
    )?;

    assert_eq!(
        (&first.sub, &first.email, &first.name),
        (&second.sub, &second.email, &second.name)
    );

    Ok(())
}

#[tokio::test]
async fn test_profile_returns_token_principal() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (user, token) = server.authenticated_user().await?;

    let response = server
        .client()
        .get(format!("{}/auth/profile", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["userId"], user["_id"]);
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["name"], "Ada Lovelace");

    Ok(())
}

#[tokio::test]
async fn test_profile_expired_token_is_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let token = TestTokenBuilder::new().expires_in(-60).sign();

    let response = server
        .client()
        .get(format!("{}/auth/profile", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "Invalid or expired token");

    Ok(())
}

#[tokio::test]
async fn test_profile_forged_signature_is_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let token = TestTokenBuilder::new().sign_with(b"some-other-secret-0123456789abcdef");

    let response = server
        .client()
        .get(format!("{}/auth/profile", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["message"], "Invalid or expired token");

    Ok(())
}
