//! Timeline read and session reset commands

use tauri::State;
use tracing::info;

use crate::timeline::{ChatMessage, SharedTimeline};

/// All timeline entries in insertion order
#[tauri::command]
pub fn list_timeline(timeline: State<'_, SharedTimeline>) -> Result<Vec<ChatMessage>, String> {
    let timeline = timeline.lock().map_err(|e| e.to_string())?;
    Ok(timeline.list())
}

/// Clear the timeline for a fresh session.
///
/// Outcomes still in flight for cleared entries are dropped when they
/// arrive (their ids no longer exist).
#[tauri::command]
pub fn new_session(timeline: State<'_, SharedTimeline>) -> Result<(), String> {
    let mut timeline = timeline.lock().map_err(|e| e.to_string())?;
    info!("Starting new session, clearing {} entries", timeline.len());
    timeline.clear();
    Ok(())
}
