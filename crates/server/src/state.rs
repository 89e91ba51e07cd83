//! # Application State
//!
//! Defines the shared application state (`AppState`) and the logic for
//! building it at startup. All external collaborators (AI providers, the
//! preprocessing and nutrition clients, the synonym map) are instantiated
//! exactly once here and injected into the orchestrators; handlers only
//! ever see the orchestrators. Startup fails fast when a configured
//! provider is missing its credentials.

use crate::config::{AppConfig, ProviderConfig};
use mealsnap::{
    providers::ai::{
        anthropic::AnthropicProvider, gemini::GeminiProvider, local::LocalAiProvider,
        TextProvider, VisionProvider,
    },
    IngredientNormalizer, NutritionClient, PreprocessClient, RecipeOrchestrator, SynonymMap,
    VisionOrchestrator,
};
use std::sync::Arc;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Photo -> detected ingredients pipeline.
    pub vision: Arc<VisionOrchestrator>,
    /// Ingredients -> recipe suggestions pipeline.
    pub recipes: Arc<RecipeOrchestrator>,
}

/// Builds the shared application state from the configuration.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let vision_config = config
        .providers
        .get("vision")
        .ok_or_else(|| anyhow::anyhow!("No 'vision' provider configured"))?;
    let recipes_config = config
        .providers
        .get("recipes")
        .ok_or_else(|| anyhow::anyhow!("No 'recipes' provider configured"))?;

    let vision_provider = build_vision_provider("vision", vision_config)?;
    let text_provider = build_text_provider("recipes", recipes_config)?;

    // `${VAR}` substitution leaves empty strings for unset variables;
    // treat those the same as absent.
    let preprocess = config
        .preprocess_api_url
        .clone()
        .filter(|url| !url.is_empty())
        .map(PreprocessClient::new)
        .transpose()?;
    let nutrition = config
        .nutrition_api_url
        .clone()
        .filter(|url| !url.is_empty())
        .map(NutritionClient::new)
        .transpose()?;

    let synonyms = SynonymMap::load(&config.synonyms_path);
    let normalizer = IngredientNormalizer::new(synonyms);

    Ok(AppState {
        vision: Arc::new(VisionOrchestrator::new(
            vision_provider,
            preprocess,
            normalizer,
        )),
        recipes: Arc::new(RecipeOrchestrator::new(text_provider, nutrition)),
    })
}

fn build_vision_provider(
    name: &str,
    config: &ProviderConfig,
) -> anyhow::Result<Box<dyn VisionProvider>> {
    match config.provider.as_str() {
        "gemini" => Ok(Box::new(build_gemini(name, config)?)),
        other => Err(anyhow::anyhow!(
            "Unsupported vision provider type '{other}' for provider '{name}'"
        )),
    }
}

fn build_text_provider(
    name: &str,
    config: &ProviderConfig,
) -> anyhow::Result<Box<dyn TextProvider>> {
    match config.provider.as_str() {
        "anthropic" => {
            let api_key = config
                .api_key
                .clone()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    anyhow::anyhow!("api_key is required for anthropic provider '{name}'")
                })?;
            let api_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| "https://api.anthropic.com/v1/messages".to_string());
            Ok(Box::new(AnthropicProvider::new(
                api_url,
                api_key,
                config.model_name.clone(),
            )?))
        }
        "gemini" => Ok(Box::new(build_gemini(name, config)?)),
        "local" => {
            let api_url = config.api_url.clone().ok_or_else(|| {
                anyhow::anyhow!("api_url is required for local provider '{name}'")
            })?;
            Ok(Box::new(LocalAiProvider::new(
                api_url,
                config.api_key.clone(),
                Some(config.model_name.clone()),
            )?))
        }
        other => Err(anyhow::anyhow!(
            "Unsupported text provider type '{other}' for provider '{name}'"
        )),
    }
}

fn build_gemini(name: &str, config: &ProviderConfig) -> anyhow::Result<GeminiProvider> {
    let api_key = config
        .api_key
        .clone()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| anyhow::anyhow!("api_key is required for gemini provider '{name}'"))?;
    // If api_url is not provided in config, construct it from the model name.
    let api_url = config.api_url.clone().unwrap_or_else(|| {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            config.model_name
        )
    });
    Ok(GeminiProvider::new(api_url, api_key)?)
}
