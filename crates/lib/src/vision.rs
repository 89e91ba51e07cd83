//! Ingredient detection from an uploaded photo.
//!
//! The vision orchestrator wires the optional preprocessing collaborator,
//! the vision-language model, the JSON extractor and the normalizer into
//! one pipeline. The whole path degrades gracefully: any failure produces
//! an empty ingredient list rather than an error, so a flaky model never
//! breaks the upload flow.

use crate::extract::{extract_json, JsonKind};
use crate::normalize::IngredientNormalizer;
use crate::preprocess::PreprocessClient;
use crate::prompts::INGREDIENT_DETECTION_PROMPT;
use crate::providers::ai::VisionProvider;
use crate::types::DetectedIngredient;
use serde_json::Value;
use tracing::warn;

/// Hard cap on detections taken from a single model response.
pub const MAX_DETECTED_INGREDIENTS: usize = 25;

const DEFAULT_MIME: &str = "image/jpeg";

/// Orchestrates photo -> detected ingredients.
#[derive(Clone, Debug)]
pub struct VisionOrchestrator {
    provider: Box<dyn VisionProvider>,
    preprocess: Option<PreprocessClient>,
    normalizer: IngredientNormalizer,
}

/// Raw and canonicalized detections for one image.
#[derive(Debug, Clone, Default)]
pub struct DetectionOutcome {
    pub raw: Vec<DetectedIngredient>,
    pub normalized: Vec<DetectedIngredient>,
}

impl VisionOrchestrator {
    pub fn new(
        provider: Box<dyn VisionProvider>,
        preprocess: Option<PreprocessClient>,
        normalizer: IngredientNormalizer,
    ) -> Self {
        Self {
            provider,
            preprocess,
            normalizer,
        }
    }

    /// Runs the detection pipeline for one uploaded image.
    ///
    /// Steps: optional preprocessing (soft failure), MIME resolution,
    /// vision-model call, JSON extraction, coercion, normalization. Model
    /// or extraction failures log the (truncated) raw text and return an
    /// empty outcome.
    pub async fn detect_ingredients(
        &self,
        image: Vec<u8>,
        filename: Option<&str>,
        content_type: Option<&str>,
    ) -> DetectionOutcome {
        let (image, upstream_mime) = match &self.preprocess {
            Some(client) => client.optimize(image, filename, content_type).await,
            None => (image, content_type.unwrap_or(DEFAULT_MIME).to_string()),
        };
        let mime = guess_mime(filename, Some(&upstream_mime));

        let text = match self
            .provider
            .describe_image(&image, &mime, INGREDIENT_DETECTION_PROMPT)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Vision model call failed, returning no ingredients");
                return DetectionOutcome::default();
            }
        };

        let payload = match extract_json(&text, JsonKind::Object) {
            Ok(payload) => payload,
            Err(_) => {
                warn!(
                    raw = %truncate(&text, 400),
                    "Could not parse a JSON object from the vision response"
                );
                return DetectionOutcome::default();
            }
        };

        let raw = coerce_detected(&payload);
        let normalized = self.normalizer.normalize_and_dedupe(&raw);
        DetectionOutcome { raw, normalized }
    }
}

/// Coerces the model payload's `ingredients_detected` list, dropping
/// non-object elements and entries without a usable name, and capping the
/// result length.
fn coerce_detected(payload: &Value) -> Vec<DetectedIngredient> {
    let Some(items) = payload.get("ingredients_detected").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(IngredientNormalizer::coerce_detection)
        .take(MAX_DETECTED_INGREDIENTS)
        .collect()
}

/// Resolves the MIME type to send to the vision model: a declared
/// `image/*` content type wins, then a guess from the filename extension,
/// then the JPEG default.
fn guess_mime(filename: Option<&str>, content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if ct.starts_with("image/") {
            return ct.to_string();
        }
    }
    if let Some(name) = filename {
        if let Some(mime) = mime_from_extension(name) {
            return mime.to_string();
        }
    }
    DEFAULT_MIME.to_string()
}

fn mime_from_extension(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

fn truncate(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
