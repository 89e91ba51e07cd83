//! Client for the remote nutrition-estimation microservice.
//!
//! Enrichment is best-effort: any failure (network, timeout, non-2xx,
//! malformed response) yields `None` and is logged, never surfaced. The
//! caller keeps whatever nutrition values the recipe already carried.

use crate::quantity::parse_line;
use crate::types::{NutritionSummary, ParsedIngredientLine};
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

const NUTRITION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct EstimateRequest<'a> {
    ingredients: &'a [ParsedIngredientLine],
}

#[derive(Deserialize, Debug)]
struct EstimateResponse {
    totals: Option<Totals>,
    #[serde(rename = "unknownIngredients", default)]
    unknown_ingredients: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct Totals {
    #[serde(rename = "caloriesKcal", default)]
    calories_kcal: f64,
    #[serde(rename = "proteinG", default)]
    protein_g: f64,
    #[serde(rename = "carbsG", default)]
    carbs_g: f64,
    #[serde(rename = "fatG", default)]
    fat_g: f64,
}

/// The outcome of a successful estimation call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeNutrition {
    /// Totals for the recipe, when the service reported them. Calories are
    /// rounded to the nearest integer, macros to one decimal.
    pub nutrition: Option<NutritionSummary>,
    /// Ingredient names the service could not match.
    pub unknown_ingredients: Vec<String>,
}

/// A client for the nutrition microservice.
#[derive(Clone, Debug)]
pub struct NutritionClient {
    client: ReqwestClient,
    api_url: String,
}

impl NutritionClient {
    /// Creates a new `NutritionClient` for the given base URL.
    pub fn new(base_url: String) -> Result<Self, crate::OrchestratorError> {
        let client = ReqwestClient::builder()
            .timeout(NUTRITION_TIMEOUT)
            .build()
            .map_err(crate::OrchestratorError::ReqwestClientBuild)?;
        let api_url = format!("{}/nutrition/estimate", base_url.trim_end_matches('/'));
        Ok(Self { client, api_url })
    }

    /// Estimates nutrition totals for a recipe's ingredient lines.
    ///
    /// Each line is split into `{name, amount, unit}` by the quantity
    /// parser before the call. Returns `None` for an empty input, on any
    /// transport or format failure, or when the response carried nothing
    /// usable.
    pub async fn estimate(&self, ingredient_lines: &[String]) -> Option<RecipeNutrition> {
        if ingredient_lines.is_empty() {
            return None;
        }

        let parsed: Vec<ParsedIngredientLine> = ingredient_lines
            .iter()
            .map(|line| parse_line(line))
            .collect();

        match self.try_estimate(&parsed).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Nutrition estimation failed, skipping enrichment");
                None
            }
        }
    }

    async fn try_estimate(
        &self,
        ingredients: &[ParsedIngredientLine],
    ) -> Result<Option<RecipeNutrition>, reqwest::Error> {
        let response = self
            .client
            .post(&self.api_url)
            .json(&EstimateRequest { ingredients })
            .send()
            .await?
            .error_for_status()?;

        let payload: EstimateResponse = response.json().await?;

        let nutrition = payload.totals.map(|totals| NutritionSummary {
            calories: totals.calories_kcal.round() as i64,
            protein: round_one_decimal(totals.protein_g),
            carbs: round_one_decimal(totals.carbs_g),
            fats: round_one_decimal(totals.fat_g),
        });

        if nutrition.is_none() && payload.unknown_ingredients.is_empty() {
            return Ok(None);
        }

        Ok(Some(RecipeNutrition {
            nutrition,
            unknown_ingredients: payload.unknown_ingredients,
        }))
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
