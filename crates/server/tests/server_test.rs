mod common;

use common::{chat_completion, TestApp, CHAT_COMPLETIONS_PATH};
use httpmock::Method::POST;
use learnmap::constants::GENERATION_FAILED_SENTINEL;
use learnmap_server::{config::AppConfig, state::AppState};
use learnmap_test_utils::MockAiProvider;
use learnmap_wiki::WikiClient;
use serde_json::{json, Value};
use std::sync::Arc;

fn sample_tree() -> Value {
    json!({
        "name": "Fourier transform",
        "description": "Decomposes a signal into frequencies.",
        "selfLearningTime": 5,
        "children": [
            {
                "name": "Complex numbers",
                "description": "Numbers with a real and imaginary part.",
                "selfLearningTime": 10,
                "children": []
            },
            {
                "name": "Integrals",
                "description": "Accumulation of quantities.",
                "selfLearningTime": 15,
                "children": []
            }
        ]
    })
}

#[tokio::test]
async fn test_root_and_health_endpoints() {
    let app = TestApp::spawn().await.unwrap();

    let root = app.client.get(&app.address).send().await.unwrap();
    assert_eq!(root.status(), 200);
    assert_eq!(root.text().await.unwrap(), "learnmap server is running.");

    let health = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_knowledge_map_returns_annotated_tree() {
    let app = TestApp::spawn().await.unwrap();
    let tree_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path(CHAT_COMPLETIONS_PATH);
        then.status(200)
            .json_body(chat_completion(&sample_tree().to_string()));
    });

    let response = app
        .client
        .post(format!("{}/api/knowledge-map", app.address))
        .json(&json!({ "concept": "Fourier transform" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Fourier transform");
    assert_eq!(body["totalLearningTime"], 30.0);
    assert_eq!(body["isAtomic"], false);
    assert_eq!(body["children"][0]["totalLearningTime"], 10.0);
    assert_eq!(body["children"][0]["isAtomic"], true);
    tree_mock.assert();
}

#[tokio::test]
async fn test_scripted_provider_state_drives_knowledge_map() {
    let mock_server = httpmock::MockServer::start();
    let provider = MockAiProvider::new(vec![sample_tree().to_string()]);
    let app_state = AppState {
        config: Arc::new(AppConfig {
            port: 0,
            ai_provider: "mock".to_string(),
            ai_api_url: None,
            ai_api_key: None,
            ai_model: "mock-chat-model".to_string(),
            wiki_base_url: mock_server.base_url(),
            cors_allowed_origin: None,
            max_images: 5,
        }),
        ai_provider: Arc::new(provider.clone()),
        wiki: Arc::new(WikiClient::new(mock_server.base_url()).unwrap()),
    };
    let app = TestApp::spawn_with_state(app_state, mock_server).await.unwrap();

    let response = app
        .client
        .post(format!("{}/api/knowledge-map", app.address))
        .json(&json!({ "concept": "Fourier transform" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["totalLearningTime"], 30.0);

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1.contains("Fourier transform"));
}

#[tokio::test]
async fn test_knowledge_map_degrades_to_placeholder_on_bad_model_output() {
    let app = TestApp::spawn().await.unwrap();
    app.mock_server.mock(|when, then| {
        when.method(POST).path(CHAT_COMPLETIONS_PATH);
        then.status(200)
            .json_body(chat_completion("Sorry, I cannot produce JSON today."));
    });

    let response = app
        .client
        .post(format!("{}/api/knowledge-map", app.address))
        .json(&json!({ "concept": "Linear algebra" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Linear algebra");
    assert_eq!(body["children"].as_array().unwrap().len(), 3);
    assert!(body["totalLearningTime"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_malformed_and_incomplete_payloads_are_rejected() {
    let app = TestApp::spawn().await.unwrap();

    let malformed = app
        .client
        .post(format!("{}/api/knowledge-map", app.address))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), 400);

    let missing_field = app
        .client
        .post(format!("{}/api/knowledge-map", app.address))
        .json(&json!({ "wrong_field": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_field.status(), 422);
}

#[tokio::test]
async fn test_explain_concept_degrades_to_plain_explanation_without_images() {
    let app = TestApp::spawn().await.unwrap();

    // Page lookup resolves to a title the wiki mock does not serve, so the
    // image pipeline yields nothing and only the explanation call remains.
    let lookup_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path(CHAT_COMPLETIONS_PATH)
            .body_contains("Wikipedia page title:");
        then.status(200).json_body(chat_completion("Missing_page"));
    });
    let explain_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path(CHAT_COMPLETIONS_PATH)
            .body_contains("# Concept to explain");
        then.status(200)
            .json_body(chat_completion("Integrals accumulate quantities."));
    });

    let response = app
        .client
        .post(format!("{}/api/explain-concept", app.address))
        .json(&json!({
            "concept_name": "Integrals",
            "original_query": "Learn the Fourier transform",
            "knowledge_tree": sample_tree()
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["explanation"], "Integrals accumulate quantities.");
    lookup_mock.assert();
    explain_mock.assert();
}

#[tokio::test]
async fn test_explain_concept_splices_selected_images() {
    let app = TestApp::spawn().await.unwrap();

    app.mock_server.mock(|when, then| {
        when.method(POST)
            .path(CHAT_COMPLETIONS_PATH)
            .body_contains("Wikipedia page title:");
        then.status(200).json_body(chat_completion("Integral"));
    });
    app.mock_server.mock(|when, then| {
        when.method(httpmock::Method::GET).path("/wiki/Integral");
        then.status(200).body(
            r#"<html><body><div id="mw-content-text">
                 <h2>Definition</h2>
                 <p>The area under a curve.</p>
                 <img src="//upload.wikimedia.org/commons/Area.svg.png" width="300" alt="Area under a curve">
               </div></body></html>"#,
        );
    });
    app.mock_server.mock(|when, then| {
        when.method(POST)
            .path(CHAT_COMPLETIONS_PATH)
            .body_contains("Select the TOP");
        then.status(200).json_body(chat_completion(
            r#"{"selected_images": [{"index": 0, "relevance_score": 9.0, "reason": "Shows the definition"}]}"#,
        ));
    });
    app.mock_server.mock(|when, then| {
        when.method(POST)
            .path(CHAT_COMPLETIONS_PATH)
            .body_contains("# Concept to explain");
        then.status(200).json_body(chat_completion(
            "An integral measures area.\n\n[IMG:0]\n\nThat is the geometric view.",
        ));
    });

    let response = app
        .client
        .post(format!("{}/api/explain-concept", app.address))
        .json(&json!({
            "concept_name": "Integrals",
            "original_query": "Learn the Fourier transform",
            "knowledge_tree": sample_tree()
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let explanation = body["explanation"].as_str().unwrap();
    assert!(!explanation.contains("[IMG:"));
    assert!(explanation
        .contains("![Area under a curve](https://upload.wikimedia.org/commons/Area.svg.png)"));
}

#[tokio::test]
async fn test_chat_round_trip_includes_history() {
    let app = TestApp::spawn().await.unwrap();
    let chat_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path(CHAT_COMPLETIONS_PATH)
            .body_contains("# New question");
        then.status(200)
            .json_body(chat_completion("Because the kernel is periodic."));
    });

    let response = app
        .client
        .post(format!("{}/api/chat-about-explanation", app.address))
        .json(&json!({
            "concept_name": "Fourier transform",
            "original_query": "Learn the Fourier transform",
            "knowledge_tree": sample_tree(),
            "explanation": "The transform decomposes signals.",
            "chat_history": [
                { "role": "user", "content": "What is a frequency?" },
                { "role": "assistant", "content": "How often something repeats." }
            ],
            "user_message": "Why is it periodic?"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["response"], "Because the kernel is periodic.");
    chat_mock.assert();
}

#[tokio::test]
async fn test_chat_history_defaults_to_empty() {
    let app = TestApp::spawn().await.unwrap();
    app.mock_server.mock(|when, then| {
        when.method(POST).path(CHAT_COMPLETIONS_PATH);
        then.status(200).json_body(chat_completion("Sure."));
    });

    let response = app
        .client
        .post(format!("{}/api/chat-about-explanation", app.address))
        .json(&json!({
            "concept_name": "Integrals",
            "original_query": "Learn the Fourier transform",
            "knowledge_tree": sample_tree(),
            "explanation": "Integrals accumulate.",
            "user_message": "Can you give an example?"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_model_failure_surfaces_as_sentinel_not_error_status() {
    let app = TestApp::spawn().await.unwrap();
    app.mock_server.mock(|when, then| {
        when.method(POST).path(CHAT_COMPLETIONS_PATH);
        then.status(500).body("upstream exploded");
    });

    let response = app
        .client
        .post(format!("{}/api/chat-about-explanation", app.address))
        .json(&json!({
            "concept_name": "Integrals",
            "original_query": "Learn the Fourier transform",
            "knowledge_tree": sample_tree(),
            "explanation": "Integrals accumulate.",
            "user_message": "Why?"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["response"], GENERATION_FAILED_SENTINEL);
}
