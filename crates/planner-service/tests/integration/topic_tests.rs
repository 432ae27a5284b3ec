//! E2E tests for the topics module.

use planner_test_utils::TestPlannerServer;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_topic(
    server: &TestPlannerServer,
    token: &str,
    name: &str,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(server
        .client()
        .post(format!("{}/topics", server.url()))
        .bearer_auth(token)
        .json(&json!({ "topicName": name, "content": format!("All about {}", name) }))
        .send()
        .await?)
}

#[tokio::test]
async fn test_topic_create_get_and_list() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (_, token) = server.authenticated_user().await?;

    let response = create_topic(&server, &token, "Ownership").await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let topic: Value = response.json().await?;
    assert_eq!(topic["topicName"], "Ownership");
    assert_eq!(topic["content"], "All about Ownership");
    let id = topic["_id"].as_str().unwrap_or_default().to_string();

    let fetched: Value = server
        .client()
        .get(format!("{}/topics/{}", server.url(), id))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched, topic);

    let by_name: Value = server
        .client()
        .get(format!("{}/topics/name/Ownership", server.url()))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(by_name["_id"], topic["_id"]);

    let listed: Value = server
        .client()
        .get(format!("{}/topics", server.url()))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn test_topic_duplicate_name_is_conflict() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (_, token) = server.authenticated_user().await?;

    create_topic(&server, &token, "Lifetimes").await?;
    let response = create_topic(&server, &token, "Lifetimes").await?;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(body["error"]["message"], "Topic with this name already exists");

    Ok(())
}

#[tokio::test]
async fn test_topic_missing_is_not_found() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (_, token) = server.authenticated_user().await?;
    let missing = "00000000-0000-0000-0000-000000000042";

    for (method, path) in [
        (reqwest::Method::GET, format!("/topics/{}", missing)),
        (reqwest::Method::GET, "/topics/name/Macros".to_string()),
        (reqwest::Method::DELETE, format!("/topics/{}", missing)),
    ] {
        let response = server
            .client()
            .request(method.clone(), format!("{}{}", server.url(), path))
            .bearer_auth(&token)
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, path);
        let body: Value = response.json().await?;
        assert_eq!(body["error"]["message"], "Topic not found");
    }

    let response = server
        .client()
        .put(format!("{}/topics/{}", server.url(), missing))
        .bearer_auth(&token)
        .json(&json!({ "content": "x" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_topic_search_reports_miss_in_body() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (_, token) = server.authenticated_user().await?;
    create_topic(&server, &token, "Traits").await?;

    let response = server
        .client()
        .post(format!("{}/topics/search", server.url()))
        .bearer_auth(&token)
        .json(&json!({ "topicName": "Traits" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["topicName"], "Traits");

    let response = server
        .client()
        .post(format!("{}/topics/search", server.url()))
        .bearer_auth(&token)
        .json(&json!({ "topicName": "Macros" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "message": "Topic not found" }));

    Ok(())
}

#[tokio::test]
async fn test_topic_update_and_delete() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (_, token) = server.authenticated_user().await?;
    let topic: Value = create_topic(&server, &token, "Async").await?.json().await?;
    create_topic(&server, &token, "Tokio").await?;
    let id = topic["_id"].as_str().unwrap_or_default().to_string();

    let response = server
        .client()
        .put(format!("{}/topics/{}", server.url(), id))
        .bearer_auth(&token)
        .json(&json!({ "content": "Futures and executors" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await?;
    assert_eq!(updated["topicName"], "Async");
    assert_eq!(updated["content"], "Futures and executors");

    let response = server
        .client()
        .put(format!("{}/topics/{}", server.url(), id))
        .bearer_auth(&token)
        .json(&json!({ "topicName": "Tokio" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = server
        .client()
        .delete(format!("{}/topics/{}", server.url(), id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body, json!(true));

    Ok(())
}
