//! Fixed prompt templates for the vision and recipe tasks.
//!
//! Both prompts pin the models to a strict JSON contract; the extractor in
//! [`crate::extract`] handles the cases where a model ignores it anyway.

/// Instruction sent with every ingredient-detection image.
pub const INGREDIENT_DETECTION_PROMPT: &str = r#"You are extracting cooking ingredients from a photo.

Return ONLY valid JSON (no markdown, no prose) in this exact format:
{
  "ingredients_detected": [
    { "name": "ingredient name", "confidence": 0.0 }
  ]
}

Rules:
- "name" must be a short canonical grocery ingredient name (e.g., "tomato", "bell pepper", "soy sauce").
- Do NOT include brands, utensils, plates, dish names, or vague words like "food".
- If unsure, omit it.
- confidence must be a number between 0.0 and 1.0.
- Max 25 items."#;

/// System instruction for recipe generation. Spells out the exact JSON
/// schema the recipe orchestrator expects back.
pub const RECIPE_SYSTEM_PROMPT: &str = r#"You are a cooking assistant.
Given ingredients and a dish preference, output JSON with:
- recipes: array of 3 recipe ideas, each an object with:
  - title: string
  - ingredients: array of ingredient line strings (e.g., "1 cup flour")
  - short_steps: array of short step strings
  - instructions: a single string with the full method
  - missing_items: array of ingredient names the user still needs
  - nutrition: object with numeric calories, protein, carbs, fats
- shopping_list: merged missing items grouped by category
Keep steps short and practical."#;

/// User message template for recipe generation. Placeholders:
/// `{ingredients}`, `{preference}`.
pub const RECIPE_USER_TEMPLATE: &str = r#"Ingredients I have: {ingredients}
What I want: {preference}

Return ONLY valid JSON. Do not wrap in markdown. Do not include commentary."#;
