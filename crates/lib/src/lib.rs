//! # mealsnap
//!
//! This crate provides the core logic for a food-photo-to-recipe pipeline:
//! it turns raw generative-model output into structured ingredient and
//! recipe data, and orchestrates the external collaborators (vision model,
//! text model, image preprocessor, nutrition estimator) involved along the
//! way.
//!
//! The interesting pieces are deliberately small and self-contained:
//!
//! - [`extract`]: tolerant JSON extraction/repair for untrusted model text.
//! - [`normalize`]: ingredient name canonicalization and deduplication.
//! - [`quantity`]: heuristic parsing of free-text ingredient lines.
//!
//! Everything else is plumbing around configurable providers, following the
//! same injected-provider pattern as the HTTP server that sits on top.

pub mod errors;
pub mod extract;
pub mod normalize;
pub mod nutrition;
pub mod preprocess;
pub mod prompts;
pub mod providers;
pub mod quantity;
pub mod recipe;
pub mod types;
pub mod vision;

pub use errors::OrchestratorError;
pub use extract::{extract_json, JsonKind};
pub use normalize::{IngredientNormalizer, SynonymMap};
pub use nutrition::NutritionClient;
pub use preprocess::PreprocessClient;
pub use quantity::parse_line;
pub use recipe::RecipeOrchestrator;
pub use types::{DetectedIngredient, NutritionSummary, ParsedIngredientLine};
pub use vision::VisionOrchestrator;
