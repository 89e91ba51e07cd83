//! End-to-end tests for `/vision/ingredients`: detection, normalization,
//! the debug envelope, and the degraded empty-list paths.

mod common;

use common::{gemini_response, TestApp};
use httpmock::Method;
use mealsnap::SynonymMap;
use serde_json::Value;

#[tokio::test]
async fn detects_and_normalizes_ingredients() {
    let app = TestApp::spawn_with_synonyms(SynonymMap::from_entries([(
        "scallion",
        "green onion",
    )]))
    .await;

    let model_text = r#"```json
{"ingredients_detected": [
    {"name": "Tomatoes", "confidence": 0.92},
    {"name": "tomato", "confidence": 0.4},
    {"name": "Scallions", "confidence": 0.75}
]}
```"#;
    let vision_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1beta/generate");
        then.status(200).json_body(gemini_response(model_text));
    });

    let form = TestApp::image_form(vec![1, 2, 3], "fridge.jpg", "image/jpeg");
    let response = app
        .client
        .post(format!("{}/vision/ingredients", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    vision_mock.assert();
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    let normalized = body["result"]["ingredients_normalized"].as_array().unwrap();
    assert_eq!(normalized.len(), 2);
    assert_eq!(normalized[0]["name"], "tomato");
    assert_eq!(normalized[0]["confidence"], 0.92);
    assert_eq!(normalized[1]["name"], "green onion");
    // No debug block unless requested.
    assert!(body.get("debug").is_none());
}

#[tokio::test]
async fn debug_param_includes_upload_metadata() {
    let app = TestApp::spawn().await;
    app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1beta/generate");
        then.status(200).json_body(gemini_response(
            r#"{"ingredients_detected": [{"name": "egg", "confidence": 0.9}]}"#,
        ));
    });

    let form = TestApp::image_form(vec![9; 42], "carton.png", "image/png");
    let response = app
        .client
        .post(format!("{}/vision/ingredients?debug=true", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["debug"]["filename"], "carton.png");
    assert_eq!(body["debug"]["content_type"], "image/png");
    assert_eq!(body["debug"]["bytes"], 42);
}

/// A vision-model outage must not fail the request: both lists come back
/// empty.
#[tokio::test]
async fn model_outage_yields_empty_lists() {
    let app = TestApp::spawn().await;
    app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1beta/generate");
        then.status(500).body("model overloaded");
    });

    let form = TestApp::image_form(vec![1], "plate.jpg", "image/jpeg");
    let response = app
        .client
        .post(format!("{}/vision/ingredients", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["ingredients_raw"], Value::Array(vec![]));
    assert_eq!(body["result"]["ingredients_normalized"], Value::Array(vec![]));
}

#[tokio::test]
async fn rejects_non_image_upload() {
    let app = TestApp::spawn().await;
    let form = TestApp::image_form(b"plain text".to_vec(), "recipe.txt", "text/plain");

    let response = app
        .client
        .post(format!("{}/vision/ingredients", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), 400);
}
