//! Image editor overlay command
//!
//! One provider call per edit, with the currently displayed image as the
//! reference. The overlay replaces its preview on success and keeps the
//! previous image on failure, so this never touches the timeline.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::AspectRatio;
use crate::config::Config;
use crate::gemini_client::{
    data_url_mime_type, GeminiClient, GenerationRequest, ImageGenerator, ReferenceImage,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditImageRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    /// Data URL of the image currently shown in the editor
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditImageResponse {
    pub image_url: String,
}

#[tauri::command]
pub async fn edit_image(request: EditImageRequest) -> Result<EditImageResponse, String> {
    if request.prompt.trim().is_empty() {
        return Err("Edit prompt is empty".to_string());
    }

    let config = Config::load_or_default();
    let client = GeminiClient::new(&config.gemini_api_key, &config.model)
        .map_err(|e| e.to_string())?;

    let mime_type = data_url_mime_type(&request.image_url)
        .unwrap_or("image/jpeg")
        .to_string();

    info!("Editing image: prompt={} chars", request.prompt.len());

    let image_url = client
        .generate(&GenerationRequest {
            prompt: request.prompt.trim().to_string(),
            aspect_ratio: request.aspect_ratio,
            reference_image: Some(ReferenceImage {
                data: request.image_url,
                mime_type,
            }),
            seed: None,
        })
        .await
        .map_err(|e| e.to_string())?;

    Ok(EditImageResponse { image_url })
}
