//! Recipe recommendation from confirmed ingredients.
//!
//! The recipe orchestrator calls the text model with the fixed recipe
//! schema prompt, recovers the JSON payload through the extractor, and
//! then decorates each recipe with nutrition totals from the nutrition
//! collaborator. Unlike the vision path, model and format failures here
//! propagate to the caller (they are the request's whole point); only the
//! nutrition decoration is best-effort.

use crate::errors::OrchestratorError;
use crate::extract::{extract_json, JsonKind};
use crate::nutrition::NutritionClient;
use crate::prompts::{RECIPE_SYSTEM_PROMPT, RECIPE_USER_TEMPLATE};
use crate::providers::ai::TextProvider;
use serde_json::{json, Value};
use tracing::{debug, info};

/// Orchestrates ingredients + preference -> recipe payload.
#[derive(Clone, Debug)]
pub struct RecipeOrchestrator {
    provider: Box<dyn TextProvider>,
    nutrition: Option<NutritionClient>,
}

impl RecipeOrchestrator {
    pub fn new(provider: Box<dyn TextProvider>, nutrition: Option<NutritionClient>) -> Self {
        Self {
            provider,
            nutrition,
        }
    }

    /// Generates recipe suggestions and enriches them with nutrition
    /// estimates.
    ///
    /// Returns the parsed model payload, mutated in place by enrichment.
    /// Fails with [`OrchestratorError::AiApi`]/[`OrchestratorError::AiRequest`]
    /// when the generation call itself fails, and with
    /// [`OrchestratorError::InvalidModelJson`] when no JSON object could be
    /// recovered from the response.
    pub async fn recommend(
        &self,
        ingredients: &[String],
        preference: &str,
    ) -> Result<Value, OrchestratorError> {
        let user_prompt = RECIPE_USER_TEMPLATE
            .replace("{ingredients}", &ingredients.join(", "))
            .replace("{preference}", preference);

        debug!(ingredients = ?ingredients, preference, "Requesting recipe suggestions");
        let raw = self
            .provider
            .generate(RECIPE_SYSTEM_PROMPT, &user_prompt)
            .await?;

        let mut payload = extract_json(&raw, JsonKind::Object)?;

        if let Some(client) = &self.nutrition {
            enrich_recipes(&mut payload, client).await;
        }

        Ok(payload)
    }
}

/// Decorates every recipe that has a non-empty `ingredients` list with
/// totals from the nutrition service. A recipe comes out equally valid
/// whether or not its enrichment succeeded.
async fn enrich_recipes(payload: &mut Value, client: &NutritionClient) {
    let Some(recipes) = payload.get_mut("recipes").and_then(Value::as_array_mut) else {
        return;
    };

    for recipe in recipes {
        let Some(obj) = recipe.as_object_mut() else {
            continue;
        };

        let lines: Vec<String> = obj
            .get("ingredients")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if lines.is_empty() {
            continue;
        }

        let Some(estimate) = client.estimate(&lines).await else {
            continue;
        };

        if let Some(nutrition) = estimate.nutrition {
            info!(
                title = obj.get("title").and_then(serde_json::Value::as_str).unwrap_or(""),
                calories = nutrition.calories,
                "Enriched recipe with nutrition estimate"
            );
            obj.insert(
                "nutrition".to_string(),
                json!({
                    "calories": nutrition.calories,
                    "protein": nutrition.protein,
                    "carbs": nutrition.carbs,
                    "fats": nutrition.fats,
                }),
            );
        }
        if !estimate.unknown_ingredients.is_empty() {
            obj.insert(
                "unknown_ingredients".to_string(),
                json!(estimate.unknown_ingredients),
            );
        }
    }
}
