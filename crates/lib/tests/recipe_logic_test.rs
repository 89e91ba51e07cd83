//! # Recipe Orchestrator Logic Tests
//!
//! Exercises recipe generation against a mock OpenAI-compatible endpoint
//! and a mock nutrition service: happy path with enrichment, nutrition
//! outage (best-effort), and upstream format failure.

use httpmock::{Method, MockServer};
use mealsnap::providers::ai::local::LocalAiProvider;
use mealsnap::{NutritionClient, OrchestratorError, RecipeOrchestrator};
use serde_json::json;

fn text_provider(mock_server: &MockServer) -> Box<LocalAiProvider> {
    Box::new(
        LocalAiProvider::new(mock_server.url("/v1/chat/completions"), None, None)
            .expect("Failed to create LocalAiProvider"),
    )
}

fn chat_completion(content: &str) -> serde_json::Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}

const RECIPE_PAYLOAD: &str = r#"{
  "recipes": [
    {
      "title": "Tomato Omelette",
      "ingredients": ["2 eggs", "1 tomato"],
      "short_steps": ["Beat eggs", "Fry"],
      "instructions": "Beat the eggs, add tomato, fry until set.",
      "missing_items": ["butter"],
      "nutrition": {"calories": 111, "protein": 1.0, "carbs": 1.0, "fats": 1.0}
    }
  ],
  "shopping_list": {"dairy": ["butter"]}
}"#;

#[tokio::test]
async fn enriches_recipes_with_nutrition_totals() {
    let mock_server = MockServer::start();
    let generation_mock = mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/chat/completions");
        then.status(200).json_body(chat_completion(RECIPE_PAYLOAD));
    });
    let nutrition_mock = mock_server.mock(|when, then| {
        when.method(Method::POST)
            .path("/nutrition/estimate")
            .json_body_partial(
                r#"{"ingredients": [{"name": "eggs", "amount": 2.0, "unit": null}]}"#,
            );
        then.status(200).json_body(json!({
            "totals": {"caloriesKcal": 216.6, "proteinG": 13.24, "carbsG": 4.05, "fatG": 15.98},
            "unknownIngredients": ["tomato"]
        }));
    });

    let orchestrator = RecipeOrchestrator::new(
        text_provider(&mock_server),
        Some(NutritionClient::new(mock_server.base_url()).unwrap()),
    );

    let payload = orchestrator
        .recommend(&["egg".into(), "tomato".into()], "something quick")
        .await
        .expect("recommendation failed");

    generation_mock.assert();
    nutrition_mock.assert();

    let recipe = &payload["recipes"][0];
    assert_eq!(
        recipe["nutrition"],
        json!({"calories": 217, "protein": 13.2, "carbs": 4.1, "fats": 16.0})
    );
    assert_eq!(recipe["unknown_ingredients"], json!(["tomato"]));
    // Untouched fields survive.
    assert_eq!(recipe["title"], json!("Tomato Omelette"));
}

/// Nutrition outage is a soft failure: the AI-generated estimate stays in
/// place and no `unknown_ingredients` key appears.
#[tokio::test]
async fn nutrition_outage_keeps_model_estimate() {
    let mock_server = MockServer::start();
    mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/chat/completions");
        then.status(200).json_body(chat_completion(RECIPE_PAYLOAD));
    });
    mock_server.mock(|when, then| {
        when.method(Method::POST).path("/nutrition/estimate");
        then.status(503).body("down for maintenance");
    });

    let orchestrator = RecipeOrchestrator::new(
        text_provider(&mock_server),
        Some(NutritionClient::new(mock_server.base_url()).unwrap()),
    );

    let payload = orchestrator
        .recommend(&["egg".into()], "anything")
        .await
        .expect("soft failure must not propagate");

    let recipe = &payload["recipes"][0];
    assert_eq!(
        recipe["nutrition"],
        json!({"calories": 111, "protein": 1.0, "carbs": 1.0, "fats": 1.0})
    );
    assert!(recipe.get("unknown_ingredients").is_none());
}

/// The model padding its JSON with prose and losing the closing braces to
/// the token cap must still parse.
#[tokio::test]
async fn repairs_truncated_generation() {
    let mock_server = MockServer::start();
    mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/chat/completions");
        then.status(200).json_body(chat_completion(
            "Here you go:\n{\"recipes\": [{\"title\": \"Stew\", \"ingredients\": [\"1 carrot\"]},",
        ));
    });

    let orchestrator = RecipeOrchestrator::new(text_provider(&mock_server), None);
    let payload = orchestrator
        .recommend(&["carrot".into()], "warm")
        .await
        .expect("repair should recover the payload");

    assert_eq!(payload["recipes"][0]["title"], json!("Stew"));
}

#[tokio::test]
async fn unrecoverable_model_text_fails_with_diagnostics() {
    let mock_server = MockServer::start();
    mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(chat_completion("Sorry, I cannot help with that."));
    });

    let orchestrator = RecipeOrchestrator::new(text_provider(&mock_server), None);
    match orchestrator.recommend(&["egg".into()], "anything").await {
        Err(OrchestratorError::InvalidModelJson { raw, repaired }) => {
            assert!(raw.contains("Sorry"));
            assert!(!repaired.is_empty());
        }
        other => panic!("expected InvalidModelJson, got {other:?}"),
    }
}

#[tokio::test]
async fn model_call_failure_propagates() {
    let mock_server = MockServer::start();
    mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/chat/completions");
        then.status(500).body("overloaded");
    });

    let orchestrator = RecipeOrchestrator::new(text_provider(&mock_server), None);
    match orchestrator.recommend(&["egg".into()], "anything").await {
        Err(OrchestratorError::AiApi(message)) => assert!(message.contains("overloaded")),
        other => panic!("expected AiApi, got {other:?}"),
    }
}
