//! E2E tests for the learning plans module.

use planner_test_utils::TestPlannerServer;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn plan_body(user_id: &str, title: &str) -> Value {
    json!({
        "title": title,
        "duration": "6",
        "prerequisites": ["Basic programming"],
        "userId": user_id,
        "phases": [
            {
                "focus": "Foundations",
                "duration": "2",
                "topics": ["Ownership", { "title": "Borrowing", "status": true }]
            },
            {
                "focus": "Concurrency",
                "duration": "4",
                "topics": [{ "title": "Threads" }, "Review"]
            }
        ]
    })
}

async fn create_plan(
    server: &TestPlannerServer,
    token: &str,
    body: &Value,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(server
        .client()
        .post(format!("{}/learning-plans", server.url()))
        .bearer_auth(token)
        .json(body)
        .send()
        .await?)
}

#[tokio::test]
async fn test_plan_create_normalizes_topics() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (user, token) = server.authenticated_user().await?;
    let user_id = user["_id"].as_str().unwrap_or_default();

    let response = create_plan(&server, &token, &plan_body(user_id, "Learn Rust")).await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let plan: Value = response.json().await?;
    assert_eq!(plan["title"], "Learn Rust");
    assert_eq!(plan["userId"], user["_id"]);
    assert_eq!(plan["isActive"], true);
    assert_eq!(plan["prerequisites"], json!(["Basic programming"]));
    assert_eq!(
        plan["phases"][0],
        json!({
            "focus": "Foundations",
            "status": false,
            "duration": "2",
            "topics": [
                { "title": "Ownership", "status": false },
                { "title": "Borrowing", "status": true }
            ]
        })
    );
    assert_eq!(plan["phases"][1]["topics"][0], json!({ "title": "Threads", "status": false }));

    Ok(())
}

#[tokio::test]
async fn test_plan_create_invalid_body_is_bad_request() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (user, token) = server.authenticated_user().await?;
    let user_id = user["_id"].as_str().unwrap_or_default();

    let mut no_title = plan_body(user_id, "");
    let response = create_plan(&server, &token, &no_title).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    no_title["title"] = json!("Titled");
    no_title["userId"] = json!("not-a-uuid");
    let response = create_plan(&server, &token, &no_title).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["message"], "userId must be a valid ID");

    Ok(())
}

#[tokio::test]
async fn test_plan_listing_by_user_returns_active_newest_first() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (user, token) = server.authenticated_user().await?;
    let user_id = user["_id"].as_str().unwrap_or_default();
    let other = server
        .register_user("Grace", "grace@example.com", "5550200", "pw")
        .await?;
    let other_id = other["_id"].as_str().unwrap_or_default();

    create_plan(&server, &token, &plan_body(user_id, "First")).await?;
    let mut inactive = plan_body(user_id, "Archived");
    inactive["isActive"] = json!(false);
    create_plan(&server, &token, &inactive).await?;
    create_plan(&server, &token, &plan_body(user_id, "Second")).await?;
    create_plan(&server, &token, &plan_body(other_id, "Not mine")).await?;

    let titles = |plans: &Value| -> Vec<String> {
        plans
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|p| p["title"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    let by_query: Value = server
        .client()
        .get(format!("{}/learning-plans?userId={}", server.url(), user_id))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(titles(&by_query), vec!["Second", "First"]);

    let by_path: Value = server
        .client()
        .get(format!("{}/learning-plans/user/{}", server.url(), user_id))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(by_path, by_query);

    let all: Value = server
        .client()
        .get(format!("{}/learning-plans", server.url()))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(all.as_array().map(Vec::len), Some(4));

    Ok(())
}

#[tokio::test]
async fn test_plan_get_update_delete() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (user, token) = server.authenticated_user().await?;
    let user_id = user["_id"].as_str().unwrap_or_default();
    let plan: Value = create_plan(&server, &token, &plan_body(user_id, "Learn Rust"))
        .await?
        .json()
        .await?;
    let id = plan["_id"].as_str().unwrap_or_default().to_string();

    let fetched: Value = server
        .client()
        .get(format!("{}/learning-plans/{}", server.url(), id))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched["_id"], plan["_id"]);

    let response = server
        .client()
        .put(format!("{}/learning-plans/{}", server.url(), id))
        .bearer_auth(&token)
        .json(&json!({ "title": "Learn Rust Deeply", "isActive": false }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await?;
    assert_eq!(updated["title"], "Learn Rust Deeply");
    assert_eq!(updated["isActive"], false);
    assert_eq!(updated["phases"], plan["phases"]);

    let response = server
        .client()
        .delete(format!("{}/learning-plans/{}", server.url(), id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "message": "Learning plan deleted successfully" }));

    let response = server
        .client()
        .get(format!("{}/learning-plans/{}", server.url(), id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(
        body["error"]["message"],
        format!("Learning plan with ID {} not found", id)
    );

    let response = server
        .client()
        .delete(format!("{}/learning-plans/{}", server.url(), id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_plan_status_updates() -> Result<(), anyhow::Error> {
    let server = TestPlannerServer::spawn().await?;
    let (user, token) = server.authenticated_user().await?;
    let user_id = user["_id"].as_str().unwrap_or_default();
    let plan: Value = create_plan(&server, &token, &plan_body(user_id, "Learn Rust"))
        .await?
        .json()
        .await?;
    let id = plan["_id"].as_str().unwrap_or_default().to_string();

    let response = server
        .client()
        .patch(format!("{}/learning-plans/{}/phases/status", server.url(), id))
        .bearer_auth(&token)
        .json(&json!({ "phaseName": "Concurrency", "status": true }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await?;
    assert_eq!(updated["phases"][0]["status"], false);
    assert_eq!(updated["phases"][1]["status"], true);

    let response = server
        .client()
        .patch(format!("{}/learning-plans/{}/topics/status", server.url(), id))
        .bearer_auth(&token)
        .json(&json!({ "topicTitle": "Ownership", "status": true }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await?;
    assert_eq!(updated["phases"][0]["topics"][0]["status"], true);
    assert_eq!(updated["phases"][1]["status"], true);

    let response = server
        .client()
        .patch(format!("{}/learning-plans/{}/topics/status", server.url(), id))
        .bearer_auth(&token)
        .json(&json!({ "topicTitle": "Macros", "status": true }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server
        .client()
        .patch(format!(
            "{}/learning-plans/00000000-0000-0000-0000-000000000001/phases/status",
            server.url()
        ))
        .bearer_auth(&token)
        .json(&json!({ "phaseName": "Foundations", "status": true }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
