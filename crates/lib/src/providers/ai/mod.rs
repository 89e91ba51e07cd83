pub mod anthropic;
pub mod gemini;
pub mod local;

use crate::errors::OrchestratorError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for text-generating AI providers.
///
/// This defines a common interface for producing free-text responses from a
/// system instruction and a user message, across different hosted models
/// (Anthropic, Gemini, OpenAI-compatible local servers).
#[async_trait]
pub trait TextProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, OrchestratorError>;
}

dyn_clone::clone_trait_object!(TextProvider);

/// A trait for vision-language AI providers.
///
/// Implementations receive raw image bytes plus a MIME type and return the
/// model's text response, which downstream code treats as untrusted input.
#[async_trait]
pub trait VisionProvider: Send + Sync + Debug + DynClone {
    /// Describes an image according to the given instruction prompt.
    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, OrchestratorError>;
}

dyn_clone::clone_trait_object!(VisionProvider);
