//! Client for the optional image-preprocessing collaborator.
//!
//! Preprocessing is strictly best-effort: whatever goes wrong (network,
//! timeout, non-2xx, empty body), the caller gets the original bytes back
//! and the request proceeds. A preprocessing outage must never abort an
//! extraction request.

use reqwest::multipart::{Form, Part};
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, warn};

const PREPROCESS_TIMEOUT: Duration = Duration::from_secs(8);

const DEFAULT_MIME: &str = "image/jpeg";

/// A client that forwards uploaded images to the preprocessing service.
#[derive(Clone, Debug)]
pub struct PreprocessClient {
    client: ReqwestClient,
    api_url: String,
}

impl PreprocessClient {
    /// Creates a new `PreprocessClient` with the service's bounded timeout
    /// baked into the HTTP client.
    pub fn new(api_url: String) -> Result<Self, crate::OrchestratorError> {
        let client = ReqwestClient::builder()
            .timeout(PREPROCESS_TIMEOUT)
            .build()
            .map_err(crate::OrchestratorError::ReqwestClientBuild)?;
        Ok(Self { client, api_url })
    }

    /// Sends the image for optimization, returning the transformed bytes
    /// and their MIME type, or the original bytes and the declared (or
    /// default) content type on any failure.
    pub async fn optimize(
        &self,
        image: Vec<u8>,
        filename: Option<&str>,
        content_type: Option<&str>,
    ) -> (Vec<u8>, String) {
        let fallback_mime = content_type.unwrap_or(DEFAULT_MIME).to_string();

        match self
            .try_optimize(image.clone(), filename, content_type)
            .await
        {
            Ok(Some((bytes, mime))) => {
                debug!(
                    from = image.len(),
                    to = bytes.len(),
                    mime = %mime,
                    "Preprocess succeeded"
                );
                (bytes, mime)
            }
            Ok(None) => {
                warn!("Preprocess returned an empty body, using original image");
                (image, fallback_mime)
            }
            Err(e) => {
                warn!(error = %e, "Preprocess failed, using original image");
                (image, fallback_mime)
            }
        }
    }

    async fn try_optimize(
        &self,
        image: Vec<u8>,
        filename: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<Option<(Vec<u8>, String)>, reqwest::Error> {
        let fallback_mime = content_type.unwrap_or(DEFAULT_MIME).to_string();

        let part = Part::bytes(image)
            .file_name(filename.unwrap_or("upload.jpg").to_string())
            .mime_str(content_type.unwrap_or("application/octet-stream"))?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or(fallback_mime);

        let bytes = response.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some((bytes, mime)))
    }
}
