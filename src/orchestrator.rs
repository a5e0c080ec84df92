//! Generation request orchestrator
//!
//! One user submission fans out into up to four provider calls. The
//! orchestrator appends the whole batch of pending messages atomically,
//! spawns one task per placeholder, gathers every outcome (a failed call
//! never cancels its siblings), and applies all patches to the timeline
//! as a single update.

use futures_util::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::AspectRatio;
use crate::gemini_client::{GenerationRequest, ImageGenerator, ReferenceImage};
use crate::timeline::{ChatMessage, MessagePatch, SharedTimeline};

/// Hard cap on images per submission
pub const MAX_IMAGES_PER_BATCH: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Image prompt is empty")]
    EmptyPrompt,
}

/// One user-initiated generation action, as received from the form
#[derive(Debug, Clone)]
pub struct Submission {
    /// User text with style/mood already folded in by the form
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub quality: String,
    pub count: u32,
    /// Raw seed field text; empty or non-numeric means no seed
    pub seed: String,
    pub reference_image: Option<ReferenceImage>,
}

/// Final prompt sent to the provider: user text plus a quality qualifier
pub fn compose_prompt(prompt: &str, quality: &str) -> String {
    format!("{}, {} quality", prompt.trim(), quality)
}

/// Parse the seed field into a base seed.
///
/// Empty, non-numeric, negative, and zero all mean "no seed" (zero kept
/// for compatibility with the form's truthiness check).
pub fn parse_base_seed(text: &str) -> Option<u64> {
    match text.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(seed) => Some(seed),
    }
}

/// Clamp the requested image count to [1, MAX_IMAGES_PER_BATCH]
pub fn clamp_count(count: u32) -> usize {
    count.clamp(1, MAX_IMAGES_PER_BATCH) as usize
}

pub struct Orchestrator {
    generator: Arc<dyn ImageGenerator>,
    timeline: SharedTimeline,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn ImageGenerator>, timeline: SharedTimeline) -> Self {
        Self {
            generator,
            timeline,
        }
    }

    /// Run one submission to completion and return the batch ids in
    /// dispatch order.
    ///
    /// The pending batch is visible to timeline readers before any call
    /// resolves; outcomes become visible all at once after the last call
    /// settles.
    pub async fn submit(&self, submission: Submission) -> Result<Vec<Uuid>, ValidationError> {
        if submission.prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }

        let prompt = compose_prompt(&submission.prompt, &submission.quality);
        let base_seed = parse_base_seed(&submission.seed);
        let count = clamp_count(submission.count);

        let input_image_url = submission
            .reference_image
            .as_ref()
            .map(|image| image.data.clone());

        let batch: Vec<ChatMessage> = (0..count)
            .map(|_| ChatMessage::pending(prompt.clone(), input_image_url.clone()))
            .collect();
        let ids: Vec<Uuid> = batch.iter().map(|m| m.id).collect();

        {
            let mut timeline = self.timeline.lock().expect("timeline lock poisoned");
            timeline.append_batch(batch);
        }

        info!(
            "Dispatching batch: {} images, seed={:?}, reference={}",
            count,
            base_seed,
            submission.reference_image.is_some()
        );

        // Scatter: one task per placeholder, all issued before any is awaited
        let tasks: Vec<_> = ids
            .iter()
            .enumerate()
            .map(|(index, &id)| {
                let generator = self.generator.clone();
                let request = GenerationRequest {
                    prompt: prompt.clone(),
                    aspect_ratio: submission.aspect_ratio,
                    reference_image: submission.reference_image.clone(),
                    seed: base_seed.map(|seed| seed + index as u64),
                };
                tokio::spawn(async move { (id, generator.generate(&request).await) })
            })
            .collect();

        // Gather: all-settled join, one patch per placeholder
        let patches: Vec<(Uuid, MessagePatch)> = join_all(tasks)
            .await
            .into_iter()
            .zip(ids.iter())
            .map(|(joined, &id)| match joined {
                Ok((id, Ok(image_url))) => (id, MessagePatch::Image(image_url)),
                Ok((id, Err(error))) => {
                    warn!("Image generation failed for {}: {}", id, error);
                    (id, MessagePatch::Failed(error.to_string()))
                }
                Err(join_error) => {
                    warn!("Generation task for {} panicked: {}", id, join_error);
                    (id, MessagePatch::Failed("Image generation task failed".to_string()))
                }
            })
            .collect();

        {
            let mut timeline = self.timeline.lock().expect("timeline lock poisoned");
            timeline.apply_all(patches);
        }

        info!("Batch settled: {} images", count);
        Ok(ids)
    }
}
