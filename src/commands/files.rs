//! Reference-image upload and result-download helpers
//!
//! The frontend picks paths with the dialog plugin; these commands do the
//! byte work: file to data URL on the way in, data URL to file on the way
//! out.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tracing::info;

use crate::gemini_client::{decode_data_url, ReferenceImage};

fn mime_type_for_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Read an image file into a data URL for use as a reference image
#[tauri::command]
pub fn read_reference_image(path: String) -> Result<ReferenceImage, String> {
    let path = Path::new(&path);
    let mime_type = mime_type_for_extension(path)
        .ok_or_else(|| "Unsupported image file type".to_string())?;

    let bytes = std::fs::read(path).map_err(|e| format!("Failed to read image: {}", e))?;

    info!("Loaded reference image: {} bytes", bytes.len());

    Ok(ReferenceImage {
        data: format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes)),
        mime_type: mime_type.to_string(),
    })
}

/// Write a generated image's data URL to disk
#[tauri::command]
pub fn save_image(data_url: String, path: String) -> Result<(), String> {
    let bytes = decode_data_url(&data_url)?;
    std::fs::write(&path, &bytes).map_err(|e| format!("Failed to save image: {}", e))?;

    info!("Saved image: {} bytes to {}", bytes.len(), path);
    Ok(())
}
