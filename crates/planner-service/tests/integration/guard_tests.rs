//! E2E tests for the access guard.
//!
//! Only `POST /users` and `POST /auth/login` are public; everything else,
//! including unknown paths, needs a bearer token.

use planner_test_utils::{TestPlannerServer, TestTokenBuilder};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn test_guard_protected_routes_without_token_are_unauthorized() -> Result<(), anyhow::Error>
{
    let server = TestPlannerServer::spawn().await?;

    for (method, path) in [
        (Method::GET, "/users"),
        (Method::POST, "/users/search"),
        (Method::GET, "/auth/profile"),
        (Method::GET, "/auth/login"),
        (Method::GET, "/topics"),
        (Method::GET, "/learning-plans"),
        (Method::GET, "/openai/models"),
        (Method::GET, "/no-such-route"),
    ] {
        let response = server
            .client()
            .request(method.clone(), format!("{}{}", server.url(), path))
            .send()
            .await?;

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require a token",
            method,
            path
        );
        assert_eq!(
            response
                .headers()
                .get("www-authenticate")
                .and_then(|v| v.to_str().ok()),
            Some("Bearer realm=\"learning-planner\"")
        );
        let body: Value = response.json().await?;
        assert_eq!(body["error"]["message"], "Invalid or expired token");
    }

    Ok(())
}

#[tokio::test]
async fn test_guard_bad_token_answers_like_missing_token() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let expired = TestTokenBuilder::new().expires_in(-60).sign();

    for token in ["a.b.c", expired.as_str()] {
        let response = server
            .client()
            .get(format!("{}/topics", server.url()))
            .bearer_auth(token)
            .send()
            .await?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await?;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert_eq!(body["error"]["message"], "Invalid or expired token");
    }

    Ok(())
}

#[tokio::test]
async fn test_guard_public_path_with_query_requires_token() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;

    let response = server
        .client()
        .post(format!("{}/users?x=1", server.url()))
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "mobile": "5550100",
            "password": "pw"
        }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(server.users().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_guard_public_routes_ignore_bad_token() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;

    let response = server
        .client()
        .post(format!("{}/users", server.url()))
        .bearer_auth("garbage")
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "mobile": "5550100",
            "password": "pw"
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = server
        .client()
        .post(format!("{}/auth/login", server.url()))
        .bearer_auth("garbage")
        .json(&json!({ "email": "ada@example.com", "password": "pw" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_guard_non_bearer_scheme_is_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let token = TestTokenBuilder::new().sign();

    let response = server
        .client()
        .get(format!("{}/topics", server.url()))
        .header("Authorization", format!("Token {}", token))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_guard_unknown_route_with_token_is_not_found() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let token = TestTokenBuilder::new().sign();

    let response = server
        .client()
        .get(format!("{}/no-such-route", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_cors_preflight_is_answered_without_token() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;

    let response = server
        .client()
        .request(Method::OPTIONS, format!("{}/topics", server.url()))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );

    Ok(())
}
