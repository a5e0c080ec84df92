//! Message timeline store
//!
//! An ordered, append-only sequence of chat messages. New submissions
//! append a batch of pending entries; generation outcomes patch entries
//! in place by id. Entries are never reordered or removed.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// One entry in the chat timeline, mirrored to the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    /// Fully composed prompt sent to the provider
    pub prompt: String,
    /// Reference image supplied by the user, immutable once set
    pub input_image_url: Option<String>,
    /// Result data URL; `None` while pending or on failure
    pub image_url: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ChatMessage {
    /// Create a pending entry with a fresh id
    pub fn pending(prompt: String, input_image_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt,
            input_image_url,
            image_url: None,
            is_loading: true,
            error: None,
        }
    }

    /// True once the message has reached a terminal state
    pub fn is_settled(&self) -> bool {
        !self.is_loading
    }
}

/// Terminal outcome applied to one pending message.
///
/// A patch is one of the two terminal states, so an entry can never end up
/// with both an image and an error.
#[derive(Debug, Clone)]
pub enum MessagePatch {
    /// Generation succeeded; carries the result data URL
    Image(String),
    /// Generation failed; carries the human-readable error
    Failed(String),
}

/// Append-only message history for one studio session
#[derive(Debug, Default)]
pub struct Timeline {
    messages: Vec<ChatMessage>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of entries in dispatch order.
    ///
    /// Callers hold the timeline lock across the whole call, so readers
    /// never observe a partial batch.
    pub fn append_batch(&mut self, batch: Vec<ChatMessage>) {
        self.messages.extend(batch);
    }

    /// Patch one entry by id with a terminal outcome.
    ///
    /// An unknown id is a no-op: late patches for a cleared session are
    /// silently dropped.
    pub fn patch_by_id(&mut self, id: Uuid, patch: MessagePatch) {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
            debug!("Dropping patch for unknown message id {}", id);
            return;
        };

        message.is_loading = false;
        match patch {
            MessagePatch::Image(url) => {
                message.image_url = Some(url);
                message.error = None;
            }
            MessagePatch::Failed(error) => {
                message.error = Some(error);
                message.image_url = None;
            }
        }
    }

    /// Apply a settled batch's outcomes as one update
    pub fn apply_all(&mut self, patches: Vec<(Uuid, MessagePatch)>) {
        for (id, patch) in patches {
            self.patch_by_id(id, patch);
        }
    }

    /// All entries in insertion order
    pub fn list(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Reset the session. In-flight outcomes for cleared entries land as
    /// dropped patches.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Shared timeline handle for use across async command contexts
pub type SharedTimeline = Arc<Mutex<Timeline>>;
