//! Tauri application state.
//!
//! `AppState` is managed via `app.manage(...)` and injected into command
//! handlers by Tauri's `State<'_, AppState>` extractor.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use lingocast_core::{CaptionEngine, ModelLibrary};
use parking_lot::Mutex;
use serde::Serialize;

use crate::settings::AppSettings;

/// Shared application state — available in every `#[tauri::command]`.
pub struct AppState {
    /// The core engine. Wrapped in `Arc` so it can be cloned into
    /// event-forwarding tasks started during setup.
    pub engine: Arc<CaptionEngine>,
    /// Local-model panel state and simulated installer.
    pub models: Arc<ModelLibrary>,
    /// Persisted app settings cache.
    pub settings: Arc<Mutex<AppSettings>>,
    /// Absolute path to `settings.json`.
    pub settings_path: PathBuf,
    /// Count of utterances delivered by the webview recognizer.
    pub utterances_pushed: Arc<AtomicUsize>,
}

impl AppState {
    pub fn diagnostics_snapshot(&self) -> AppDiagnostics {
        let intake = self.engine.intake_diagnostics_snapshot();
        AppDiagnostics {
            utterances_pushed: self.utterances_pushed.load(Ordering::Relaxed),
            intake_received: intake.utterances_received,
            intake_rejected: intake.utterances_rejected,
            translate_calls: intake.translate_calls,
            translate_failures: intake.translate_failures,
            parse_fallbacks: intake.parse_fallbacks,
            entries_appended: intake.entries_appended,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDiagnostics {
    pub utterances_pushed: usize,
    pub intake_received: usize,
    pub intake_rejected: usize,
    pub translate_calls: usize,
    pub translate_failures: usize,
    pub parse_fallbacks: usize,
    pub entries_appended: usize,
}
