//! # API Route Handlers
//!
//! The Axum handlers for `mealsnap-server`: health endpoints, image
//! upload, ingredient detection, and recipe recommendation. Handlers stay
//! thin; all interesting behavior lives in the `mealsnap` orchestrators.

use crate::{
    errors::AppError,
    state::AppState,
    types::{ApiResponse, DebugParams},
};
use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::Multipart;
use mealsnap::DetectedIngredient;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

// --- API Payloads ---

#[derive(Serialize, Deserialize)]
pub struct UploadResponse {
    pub image_id: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub size_bytes: usize,
}

#[derive(Serialize, Deserialize)]
pub struct VisionExtractResponse {
    pub ingredients_raw: Vec<DetectedIngredient>,
    pub ingredients_normalized: Vec<DetectedIngredient>,
}

#[derive(Deserialize)]
pub struct RecommendRequest {
    pub ingredients_confirmed: Vec<String>,
    #[serde(default)]
    pub preference_text: String,
}

/// One image field read out of a multipart request.
struct UploadedImage {
    data: Vec<u8>,
    filename: Option<String>,
    content_type: Option<String>,
}

// --- Handlers ---

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "mealsnap server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Accepts an image upload and echoes its metadata back with a fresh id.
/// Storage is intentionally out of scope.
pub async fn upload_image_handler(
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let image = read_image_field(&mut multipart).await?;
    info!(
        filename = ?image.filename,
        size_bytes = image.data.len(),
        "Received image upload"
    );

    Ok(Json(UploadResponse {
        image_id: Uuid::new_v4().to_string(),
        filename: image.filename,
        content_type: image.content_type,
        size_bytes: image.data.len(),
    }))
}

/// Runs the vision pipeline on an uploaded photo and returns both the raw
/// detections and their canonicalized, deduplicated form.
pub async fn vision_ingredients_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<VisionExtractResponse>>, AppError> {
    let image = read_image_field(&mut multipart).await?;

    let debug_info = json!({
        "filename": image.filename,
        "content_type": image.content_type,
        "bytes": image.data.len(),
    });

    let outcome = app_state
        .vision
        .detect_ingredients(
            image.data,
            image.filename.as_deref(),
            image.content_type.as_deref(),
        )
        .await;

    let response = VisionExtractResponse {
        ingredients_raw: outcome.raw,
        ingredients_normalized: outcome.normalized,
    };
    Ok(wrap_response(response, debug_params, Some(debug_info)))
}

/// Generates recipe suggestions for the confirmed ingredients. Upstream
/// model failures surface as 502s; nutrition enrichment inside the
/// orchestrator is best-effort and never fails the request.
pub async fn recommend_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<RecommendRequest>,
) -> Result<Json<Value>, AppError> {
    info!(
        ingredients = payload.ingredients_confirmed.len(),
        "Received recommendation request"
    );

    let result = app_state
        .recipes
        .recommend(&payload.ingredients_confirmed, &payload.preference_text)
        .await?;

    Ok(Json(result))
}

// --- Helpers ---

/// Reads the `image` field from a multipart body and applies the client
/// input validation: the field must be present, declare an `image/*`
/// content type, and carry a non-empty body.
async fn read_image_field(multipart: &mut Multipart) -> Result<UploadedImage, AppError> {
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(anyhow::Error::from)? {
        match field.name() {
            Some("image") => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(anyhow::Error::from)?.to_vec();
                image = Some(UploadedImage {
                    data,
                    filename,
                    content_type,
                });
            }
            other => warn!("Ignoring unknown multipart field: {:?}", other),
        }
    }

    let image = image
        .ok_or_else(|| AppError::BadRequest("Please upload an image file.".to_string()))?;

    let is_image = image
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("image/"));
    if !is_image {
        return Err(AppError::BadRequest(
            "Please upload an image file.".to_string(),
        ));
    }
    if image.data.is_empty() {
        return Err(AppError::BadRequest("Empty upload.".to_string()));
    }

    Ok(image)
}

/// Wraps a successful result in the standard `ApiResponse` format,
/// including debug information only when the caller asked for it.
fn wrap_response<T>(
    result: T,
    debug_params: Query<DebugParams>,
    debug_info: Option<Value>,
) -> Json<ApiResponse<T>> {
    let debug = if debug_params.debug.unwrap_or(false) {
        debug_info
    } else {
        None
    };
    Json(ApiResponse { debug, result })
}
