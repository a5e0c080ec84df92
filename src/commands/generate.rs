//! Batch image generation command and prompt-form support commands

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tauri::State;
use tracing::info;

use super::{GenerationState, InFlightGuard};
use crate::catalog::{self, AspectRatio, PromptOptions};
use crate::config::Config;
use crate::gemini_client::{GeminiClient, ReferenceImage};
use crate::orchestrator::{Orchestrator, Submission};
use crate::timeline::{ChatMessage, SharedTimeline};

/// One submission from the prompt form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImagesRequest {
    /// User text with style/mood already folded in by the form
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub quality: String,
    pub num_images: u32,
    /// Raw seed field text; empty means no seed
    #[serde(default)]
    pub seed: String,
    #[serde(default)]
    pub reference_image: Option<ReferenceImage>,
}

/// Generate a batch of images and return the settled entries.
///
/// Rejected while a previous batch is still in flight; the timeline shows
/// the pending entries as soon as they are appended, so a frontend
/// listening on `list_timeline` can render placeholders immediately.
#[tauri::command]
pub async fn generate_images(
    request: GenerateImagesRequest,
    timeline: State<'_, SharedTimeline>,
    generation: State<'_, GenerationState>,
) -> Result<Vec<ChatMessage>, String> {
    if request.prompt.trim().is_empty() {
        return Err("Image prompt is empty".to_string());
    }

    if !generation.try_begin() {
        return Err("Image generation is already in progress".to_string());
    }
    let _guard = InFlightGuard(generation.inner());

    let config = Config::load_or_default();
    let client = GeminiClient::new(&config.gemini_api_key, &config.model)
        .map_err(|e| e.to_string())?;

    info!(
        "Generating {} image(s): prompt={} chars",
        request.num_images,
        request.prompt.len()
    );

    let orchestrator = Orchestrator::new(Arc::new(client), timeline.inner().clone());
    let ids = orchestrator
        .submit(Submission {
            prompt: request.prompt,
            aspect_ratio: request.aspect_ratio,
            quality: request.quality,
            count: request.num_images,
            seed: request.seed,
            reference_image: request.reference_image,
        })
        .await
        .map_err(|e| e.to_string())?;

    let timeline = timeline.lock().map_err(|e| e.to_string())?;
    Ok(ids
        .iter()
        .filter_map(|id| timeline.get(*id).cloned())
        .collect())
}

/// Form option lists for the frontend selectors
#[tauri::command]
pub fn get_prompt_options() -> Result<PromptOptions, String> {
    Ok(catalog::prompt_options())
}

/// Random seed for the form's randomizer button
#[tauri::command]
pub fn random_seed() -> Result<u32, String> {
    Ok(rand::thread_rng().gen_range(0..1_000_000))
}
