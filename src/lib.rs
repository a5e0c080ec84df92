mod catalog;
mod commands;
mod config;
mod gemini_client;
mod orchestrator;
mod timeline;


use commands::GenerationState;
use std::sync::{Arc, Mutex};
use timeline::{SharedTimeline, Timeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("AI Image Generation Studio starting...");

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            use tauri::Manager;

            // Session timeline (wrapped in Arc for sharing with async tasks)
            let timeline: SharedTimeline = Arc::new(Mutex::new(Timeline::new()));
            app.manage(timeline);

            // Back-pressure flag for the submission form
            app.manage(GenerationState::default());

            info!("App setup complete");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::generate_images,
            commands::edit_image,
            commands::list_timeline,
            commands::new_session,
            commands::get_prompt_options,
            commands::random_seed,
            commands::read_reference_image,
            commands::save_image,
            commands::get_settings,
            commands::set_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
