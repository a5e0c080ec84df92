//! Google Gemini API client for AI image generation
//!
//! Thin wrapper around the Gemini generateContent endpoint. Builds one
//! request per image (prompt text, optional reference image, optional
//! seed), extracts the returned image part, and normalizes every failure
//! mode into [`GenerationError`]. Single attempt, no retries.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::catalog::AspectRatio;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// All generation failures collapse into this one shape; the message is
/// what the user sees inline on the failed entry.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,
    #[error("Failed to create HTTP client: {0}")]
    ClientSetup(String),
    #[error("Image request failed: {0}")]
    Request(String),
    #[error("Gemini API error {status}: {body}")]
    Service { status: u16, body: String },
    #[error("Failed to parse Gemini response: {0}")]
    InvalidResponse(String),
    #[error("No images were generated or found in the response")]
    NoImage,
}

/// User-supplied reference image attached to a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceImage {
    /// Data URL or raw base64 payload
    pub data: String,
    pub mime_type: String,
}

impl ReferenceImage {
    /// Raw base64 payload with any `data:*;base64,` prefix stripped;
    /// the API expects the bare bytes.
    pub fn payload(&self) -> &str {
        match self.data.split_once(',') {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => &self.data,
        }
    }
}

/// One generation request, fully resolved by the orchestrator
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub reference_image: Option<ReferenceImage>,
    pub seed: Option<u64>,
}

/// Provider seam: anything that can turn a request into a displayable
/// image data URL.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

// -- Response types --

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponsePart {
    inline_data: Option<GeminiInlineData>,
    #[allow(dead_code)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Result<Self, GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| GenerationError::ClientSetup(e.to_string()))?;

        let model = if model.trim().is_empty() {
            DEFAULT_MODEL
        } else {
            model
        };

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// The model has no aspect-ratio parameter, so the hint rides as a
    /// suffix on the prompt text.
    pub fn full_prompt(prompt: &str, aspect_ratio: AspectRatio) -> String {
        format!("{}, aspect ratio {}", prompt, aspect_ratio.as_str())
    }

    pub fn build_request_body(request: &GenerationRequest) -> serde_json::Value {
        let mut parts: Vec<serde_json::Value> = Vec::new();

        if let Some(image) = &request.reference_image {
            parts.push(serde_json::json!({
                "inlineData": {
                    "data": image.payload(),
                    "mimeType": image.mime_type,
                }
            }));
        }

        parts.push(serde_json::json!({
            "text": Self::full_prompt(&request.prompt, request.aspect_ratio)
        }));

        let mut generation_config = serde_json::json!({
            "responseModalities": ["IMAGE"],
        });
        if let Some(seed) = request.seed {
            generation_config["seed"] = serde_json::json!(seed);
        }

        serde_json::json!({
            "contents": [{ "parts": parts }],
            "generationConfig": generation_config,
        })
    }

    /// First image part of the response as an embeddable data URL
    pub fn extract_image_data_url(response: &GeminiResponse) -> Option<String> {
        response
            .candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(|p| p.inline_data.as_ref()))
            .map(|d| format!("data:{};base64,{}", d.mime_type, d.data))
    }

    async fn generate_image(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = format!("{}/{}:generateContent", GEMINI_ENDPOINT, self.model);
        let body = Self::build_request_body(request);

        info!(
            "Gemini image generation: prompt={} chars, reference={}, seed={:?}",
            request.prompt.len(),
            request.reference_image.is_some(),
            request.seed
        );

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(
                "x-goog-api-key",
                HeaderValue::from_str(&self.api_key).map_err(|e| {
                    GenerationError::Request(format!("Invalid API key header: {}", e))
                })?,
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Truncate error body to avoid leaking sensitive data
            let truncated = if error_body.len() > 200 {
                &error_body[..200]
            } else {
                &error_body
            };
            return Err(GenerationError::Service {
                status: status.as_u16(),
                body: truncated.to_string(),
            });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        Self::extract_image_data_url(&gemini_response).ok_or(GenerationError::NoImage)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.generate_image(request).await
    }
}

/// Decode a data URL's payload back into bytes (used when saving a result
/// to disk).
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, String> {
    let payload = match data_url.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data_url,
    };
    STANDARD
        .decode(payload)
        .map_err(|e| format!("Invalid image payload: {}", e))
}

/// MIME type carried in a data URL prefix, if any
pub fn data_url_mime_type(data_url: &str) -> Option<&str> {
    let rest = data_url.strip_prefix("data:")?;
    let prefix = rest.split_once(',')?.0;
    let mime = prefix.split(';').next()?;
    if mime.is_empty() {
        None
    } else {
        Some(mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            aspect_ratio: AspectRatio::Landscape,
            reference_image: None,
            seed: None,
        }
    }

    #[test]
    fn test_build_request_body_appends_aspect_ratio() {
        let body = GeminiClient::build_request_body(&request("a red fox"));
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "a red fox, aspect ratio 4:3"
        );
        assert_eq!(body["generationConfig"]["responseModalities"][0], "IMAGE");
        assert!(body["generationConfig"].get("seed").is_none());
    }

    #[test]
    fn test_build_request_body_with_seed() {
        let mut req = request("a red fox");
        req.seed = Some(101);
        let body = GeminiClient::build_request_body(&req);
        assert_eq!(body["generationConfig"]["seed"], 101);
    }

    #[test]
    fn test_build_request_body_reference_image_precedes_text() {
        let mut req = request("add sunglasses");
        req.reference_image = Some(ReferenceImage {
            data: "data:image/png;base64,iVBORw0KGgo=".to_string(),
            mime_type: "image/png".to_string(),
        });
        let body = GeminiClient::build_request_body(&req);

        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        // Data URL prefix is stripped before it reaches the API
        assert_eq!(parts[0]["inlineData"]["data"], "iVBORw0KGgo=");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert!(parts[1]["text"]
            .as_str()
            .unwrap()
            .starts_with("add sunglasses"));
    }

    #[test]
    fn test_reference_image_payload_without_prefix() {
        let image = ReferenceImage {
            data: "iVBORw0KGgo=".to_string(),
            mime_type: "image/png".to_string(),
        };
        assert_eq!(image.payload(), "iVBORw0KGgo=");
    }

    #[test]
    fn test_parse_response_valid() {
        let response_json = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": {
                            "mimeType": "image/png",
                            "data": "iVBORw0KGgo="
                        }
                    }]
                }
            }]
        });
        let response: GeminiResponse = serde_json::from_value(response_json).unwrap();
        let url = GeminiClient::extract_image_data_url(&response);
        assert_eq!(url, Some("data:image/png;base64,iVBORw0KGgo=".to_string()));
    }

    #[test]
    fn test_parse_response_no_image() {
        let response_json = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "I cannot generate that image"
                    }]
                }
            }]
        });
        let response: GeminiResponse = serde_json::from_value(response_json).unwrap();
        assert!(GeminiClient::extract_image_data_url(&response).is_none());
    }

    #[test]
    fn test_parse_response_empty_candidates() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": []
        }))
        .unwrap();
        assert!(GeminiClient::extract_image_data_url(&response).is_none());
    }

    #[test]
    fn test_new_empty_api_key() {
        let result = GeminiClient::new("", DEFAULT_MODEL);
        assert!(matches!(result, Err(GenerationError::MissingApiKey)));
    }

    #[test]
    fn test_new_valid_api_key() {
        assert!(GeminiClient::new("test-key-123", DEFAULT_MODEL).is_ok());
    }

    #[test]
    fn test_decode_data_url() {
        let bytes = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
        assert!(decode_data_url("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn test_data_url_mime_type() {
        assert_eq!(
            data_url_mime_type("data:image/webp;base64,AA=="),
            Some("image/webp")
        );
        assert_eq!(data_url_mime_type("iVBORw0KGgo="), None);
    }
}
