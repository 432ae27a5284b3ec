//! E2E tests for the completion API passthrough.
//!
//! The provider is simulated with wiremock; every endpoint answers 200 with
//! the `{success, data | error, usage, model}` envelope.

use planner_test_utils::TestPlannerServer;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_response(content: &str) -> Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20 },
        "model": "gpt-test-0001"
    })
}

async fn post(
    server: &TestPlannerServer,
    token: &str,
    route: &str,
    body: Value,
) -> Result<Value, anyhow::Error> {
    let response = server
        .client()
        .post(format!("{}{}", server.url(), route))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;
    anyhow::ensure!(
        response.status() == StatusCode::OK,
        "{} answered {}",
        route,
        response.status()
    );
    Ok(response.json().await?)
}

#[tokio::test]
async fn test_chat_returns_first_choice() -> Result<(), anyhow::Error> {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-test",
            "max_tokens": 150,
            "messages": [{ "role": "user", "content": "Hello" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("Hi there")))
        .expect(1)
        .mount(&provider)
        .await;

    let server = TestPlannerServer::spawn_with_openai(&provider.uri()).await?;
    let (_, token) = server.authenticated_user().await?;

    let body = post(
        &server,
        &token,
        "/openai/chat",
        json!({ "messages": [{ "role": "user", "content": "Hello" }] }),
    )
    .await?;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "Hi there");
    assert_eq!(body["model"], "gpt-test-0001");
    assert_eq!(body["usage"]["total_tokens"], 20);
    assert!(body.get("error").is_none());

    Ok(())
}

#[tokio::test]
async fn test_json_parses_fenced_content() -> Result<(), anyhow::Error> {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "temperature": 0.5,
            "response_format": { "type": "json_object" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_response("Here you go:\n```json\n{\"title\": \"Rust\"}\n```")),
        )
        .mount(&provider)
        .await;

    let server = TestPlannerServer::spawn_with_openai(&provider.uri()).await?;
    let (_, token) = server.authenticated_user().await?;

    let body = post(
        &server,
        &token,
        "/openai/json",
        json!({ "messages": [{ "role": "user", "content": "Plan Rust" }] }),
    )
    .await?;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!({ "title": "Rust" }));

    let body = post(
        &server,
        &token,
        "/openai/json/validate",
        json!({
            "messages": [{ "role": "user", "content": "Plan Rust" }],
            "schema": { "type": "object" }
        }),
    )
    .await?;
    assert_eq!(body["data"], json!({ "title": "Rust" }));

    Ok(())
}

#[tokio::test]
async fn test_json_unparseable_content_is_failure_envelope() -> Result<(), anyhow::Error> {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("not json")))
        .mount(&provider)
        .await;

    let server = TestPlannerServer::spawn_with_openai(&provider.uri()).await?;
    let (_, token) = server.authenticated_user().await?;

    let body = post(
        &server,
        &token,
        "/openai/json",
        json!({ "messages": [{ "role": "user", "content": "Plan Rust" }] }),
    )
    .await?;

    assert_eq!(
        body,
        json!({ "success": false, "error": "Failed to parse JSON response from AI" })
    );

    Ok(())
}

#[tokio::test]
async fn test_provider_error_is_failure_envelope() -> Result<(), anyhow::Error> {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided" }
        })))
        .mount(&provider)
        .await;

    let server = TestPlannerServer::spawn_with_openai(&provider.uri()).await?;
    let (_, token) = server.authenticated_user().await?;

    let body = post(&server, &token, "/openai/embedding", json!({ "text": "hello" })).await?;

    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "401 Incorrect API key provided");

    Ok(())
}

#[tokio::test]
async fn test_unreachable_provider_is_failure_envelope() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (_, token) = server.authenticated_user().await?;

    let response = server
        .client()
        .get(format!("{}/openai/models", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("Connection error")));

    Ok(())
}

#[tokio::test]
async fn test_text_and_models() -> Result<(), anyhow::Error> {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "text": "" }],
            "model": "gpt-test-instruct"
        })))
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "gpt-test" }, { "id": "gpt-test-mini" }]
        })))
        .mount(&provider)
        .await;

    let server = TestPlannerServer::spawn_with_openai(&provider.uri()).await?;
    let (_, token) = server.authenticated_user().await?;

    let body = post(&server, &token, "/openai/text", json!({ "prompt": "Say hi" })).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "No text generated");

    let body: Value = server
        .client()
        .get(format!("{}/openai/models", server.url()))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][1]["id"], "gpt-test-mini");

    Ok(())
}
