use serde::{Deserialize, Serialize};

/// A single ingredient detection, either raw from the vision model or
/// canonicalized by the normalizer. Lives only for the duration of one
/// extraction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIngredient {
    pub name: String,
    pub confidence: f64,
}

/// A free-text ingredient line split into structured parts for the
/// nutrition estimator. `amount` and `unit` are best-effort; see
/// [`crate::quantity::parse_line`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredientLine {
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

/// Per-recipe nutrition totals, as attached to a recipe after enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Clamps a model-reported confidence into `[0.0, 1.0]`.
///
/// Non-finite values (the moral equivalent of an unparseable confidence)
/// collapse to `0.0`.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
