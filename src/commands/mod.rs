//! Tauri command handlers organized by domain.
//!
//! This module re-exports all command handlers for registration in lib.rs.

mod edit;
mod files;
mod generate;
mod session;
mod settings;

// Re-export all commands for lib.rs registration
pub use edit::*;
pub use files::*;
pub use generate::*;
pub use session::*;
pub use settings::*;

use std::sync::atomic::{AtomicBool, Ordering};

/// Back-pressure flag for the submission form: while a batch is in
/// flight, new submissions are rejected at the IPC boundary.
#[derive(Default)]
pub struct GenerationState {
    in_flight: AtomicBool,
}

impl GenerationState {
    /// Claim the in-flight slot; false if a batch is already running
    pub fn try_begin(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn finish(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Releases the in-flight slot on every exit path of a generate command
pub(crate) struct InFlightGuard<'a>(pub &'a GenerationState);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.finish();
    }
}
