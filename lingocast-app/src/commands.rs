//! Tauri command handlers.
//!
//! Each function is registered with `tauri::Builder::invoke_handler` and
//! callable from the frontend via `invoke(...)`.

use std::sync::{atomic::Ordering, Arc};

use lingocast_core::{
    audio::device::DeviceInfo, CaptionEntry, LocalModel, SessionStatus, WordFilter,
};
use tauri::{Manager, State};
use tracing::info;

use crate::settings::{save_settings, RuntimeSettings};
use crate::state::{AppDiagnostics, AppState};

/// Window label of the transparent broadcast overlay.
pub const OVERLAY_WINDOW: &str = "overlay";

/// Begin a caption session: apply current settings to the engine and go live.
#[tauri::command]
pub async fn start_session(state: State<'_, AppState>) -> Result<(), String> {
    {
        let settings = state.settings.lock();
        state.engine.set_japanese_enabled(settings.japanese_enabled);
        state.engine.set_word_filters(settings.word_filters.clone());
    }
    state.engine.start().map_err(|e| e.to_string())
}

/// Stop the caption session. Translations in flight still land in history.
#[tauri::command]
pub async fn stop_session(state: State<'_, AppState>) -> Result<(), String> {
    state.engine.stop().map_err(|e| e.to_string())?;
    let diag = state.diagnostics_snapshot();
    info!(
        utterances_pushed = diag.utterances_pushed,
        entries_appended = diag.entries_appended,
        translate_failures = diag.translate_failures,
        "app diagnostics snapshot on stop"
    );
    Ok(())
}

/// Return the current session status.
#[tauri::command]
pub async fn get_status(state: State<'_, AppState>) -> Result<SessionStatus, String> {
    Ok(state.engine.status())
}

/// Deliver one finalized utterance from the webview recognizer.
#[tauri::command]
pub async fn push_utterance(state: State<'_, AppState>, text: String) -> Result<(), String> {
    state.utterances_pushed.fetch_add(1, Ordering::Relaxed);
    state
        .engine
        .submit_utterance(&text)
        .map_err(|e| e.to_string())
}

/// Full caption feed, newest first.
#[tauri::command]
pub async fn get_history(state: State<'_, AppState>) -> Result<Vec<CaptionEntry>, String> {
    Ok(state.engine.history().snapshot())
}

/// The overlay slice: two most recent entries, oldest first.
#[tauri::command]
pub async fn get_overlay_feed(state: State<'_, AppState>) -> Result<Vec<CaptionEntry>, String> {
    Ok(state.engine.history().overlay_view())
}

/// Return a list of available audio input devices.
#[tauri::command]
pub async fn list_audio_devices(_state: State<'_, AppState>) -> Result<Vec<DeviceInfo>, String> {
    Ok(lingocast_core::audio::device::list_input_devices())
}

/// Return persisted settings for the panel (API key redacted to a flag).
#[tauri::command]
pub async fn get_settings(state: State<'_, AppState>) -> Result<RuntimeSettings, String> {
    Ok(state.settings.lock().runtime_settings())
}

/// Persist settings and apply the pipeline-facing ones immediately.
#[tauri::command]
#[allow(clippy::too_many_arguments)]
pub async fn set_settings(
    state: State<'_, AppState>,
    japanese_enabled: Option<bool>,
    font_scale: Option<u32>,
    anime_style: Option<bool>,
    use_gpu: Option<bool>,
    models_dir: Option<String>,
    preferred_input_device: Option<String>,
    word_filters: Option<Vec<WordFilter>>,
    gemini_api_key: Option<String>,
) -> Result<RuntimeSettings, String> {
    let mut settings = state.settings.lock();

    if let Some(v) = japanese_enabled {
        settings.japanese_enabled = v;
    }
    if let Some(v) = font_scale {
        settings.font_scale = v;
    }
    if let Some(v) = anime_style {
        settings.anime_style = v;
    }
    if let Some(v) = use_gpu {
        settings.use_gpu = v;
    }
    if let Some(v) = models_dir {
        settings.models_dir = v;
    }
    if let Some(v) = preferred_input_device {
        settings.preferred_input_device = Some(v);
    }
    if let Some(v) = word_filters {
        settings.word_filters = v;
    }
    if let Some(v) = gemini_api_key {
        settings.gemini_api_key = Some(v);
    }
    settings.normalize();

    // Pipeline-facing settings take effect on the next submission.
    state.engine.set_japanese_enabled(settings.japanese_enabled);
    state.engine.set_word_filters(settings.word_filters.clone());

    save_settings(&state.settings_path, &settings).map_err(|e| e.to_string())?;
    Ok(settings.runtime_settings())
}

/// The local-model panel, in catalog order.
#[tauri::command]
pub async fn get_model_catalog(state: State<'_, AppState>) -> Result<Vec<LocalModel>, String> {
    Ok(state.models.snapshot())
}

/// Kick off a simulated install for one model.
#[tauri::command]
pub async fn install_model(state: State<'_, AppState>, id: String) -> Result<(), String> {
    Arc::clone(&state.models)
        .begin_install(&id)
        .map_err(|e| e.to_string())
}

/// Return an installed model to the idle state.
#[tauri::command]
pub async fn remove_model(state: State<'_, AppState>, id: String) -> Result<(), String> {
    state.models.remove(&id).map_err(|e| e.to_string())
}

/// Show or hide the transparent broadcast overlay window.
#[tauri::command]
pub async fn set_overlay_visible(app: tauri::AppHandle, visible: bool) -> Result<(), String> {
    let window = app
        .get_webview_window(OVERLAY_WINDOW)
        .ok_or_else(|| "overlay window not created".to_string())?;
    if visible {
        window.show().map_err(|e| e.to_string())?;
    } else {
        window.hide().map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Counters for the diagnostics pane.
#[tauri::command]
pub async fn get_diagnostics(state: State<'_, AppState>) -> Result<AppDiagnostics, String> {
    Ok(state.diagnostics_snapshot())
}
