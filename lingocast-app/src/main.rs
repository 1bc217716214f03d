//! LingoCast desktop application entry point.
//!
//! ## Runtime note
//!
//! Tauri v2 manages its own Tokio runtime internally.
//! We use `tauri::async_runtime::spawn` (not `tokio::spawn`) so our tasks
//! share Tauri's runtime and can safely call Tauri APIs.

#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

mod commands;
mod settings;
mod state;

use std::sync::{atomic::AtomicUsize, Arc};

use lingocast_core::{
    CaptionEngine, EchoTranslator, EngineConfig, GeminiConfig, GeminiTranslator, ModelLibrary,
    TranslatorHandle,
};
use parking_lot::Mutex;
use settings::{default_settings_path, load_settings};
use state::AppState;
use tauri::{Emitter, Manager};
use tracing::info;

/// Env override for the hosted-translation API key.
const API_KEY_ENV: &str = "LINGOCAST_GEMINI_API_KEY";

fn build_translator(configured_key: Option<&str>) -> TranslatorHandle {
    let key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| configured_key.map(str::to_string));

    match key {
        Some(key) => {
            info!("using hosted Gemini translation backend");
            TranslatorHandle::new(GeminiTranslator::new(GeminiConfig::new(key)))
        }
        None => {
            tracing::warn!("no Gemini API key configured — using EchoTranslator");
            TranslatorHandle::new(EchoTranslator)
        }
    }
}

fn ensure_overlay_window<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> tauri::Result<()> {
    if app.get_webview_window(commands::OVERLAY_WINDOW).is_some() {
        return Ok(());
    }

    tauri::WebviewWindowBuilder::new(
        app,
        commands::OVERLAY_WINDOW,
        tauri::WebviewUrl::App("overlay.html".into()),
    )
    .title("LingoCast Overlay")
    .inner_size(1280.0, 360.0)
    .resizable(true)
    .focused(false)
    .transparent(true)
    .decorations(false)
    .always_on_top(true)
    .visible_on_all_workspaces(true)
    .skip_taskbar(true)
    .shadow(false)
    .visible(false)
    .background_color(tauri::window::Color(0, 0, 0, 0))
    .build()?;
    Ok(())
}

fn main() {
    // ── Tracing ───────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingocast=info".parse().unwrap()),
        )
        .init();

    info!("LingoCast starting");

    let settings_path = default_settings_path();
    let app_settings = load_settings(&settings_path);
    info!(
        settings_path = ?settings_path,
        japanese_enabled = app_settings.japanese_enabled,
        font_scale = app_settings.font_scale,
        word_filters = app_settings.word_filters.len(),
        "runtime settings loaded"
    );

    // ── Engine setup ──────────────────────────────────────────────────────
    let translator = build_translator(app_settings.gemini_api_key.as_deref());
    let engine = Arc::new(CaptionEngine::new(EngineConfig::default(), translator));
    engine.set_japanese_enabled(app_settings.japanese_enabled);
    engine.set_word_filters(app_settings.word_filters.clone());

    let models = Arc::new(ModelLibrary::new());
    let settings_state = Arc::new(Mutex::new(app_settings));

    // ── Tauri app ─────────────────────────────────────────────────────────
    let engine_for_setup = Arc::clone(&engine);
    let models_for_setup = Arc::clone(&models);

    tauri::Builder::default()
        .setup(move |app| {
            let app_handle = app.handle().clone();

            // ── Forward core events → Tauri event bus ─────────────────────
            // Use tauri::async_runtime::spawn to share Tauri's Tokio runtime.

            let mut caption_rx = engine_for_setup.subscribe_captions();
            let handle1 = app_handle.clone();
            tauri::async_runtime::spawn(async move {
                loop {
                    match caption_rx.recv().await {
                        Ok(event) => {
                            if let Err(e) = handle1.emit("lingocast://caption", &event) {
                                tracing::warn!("emit caption: {e}");
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!("caption receiver lagged by {n} events");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            });

            let mut status_rx = engine_for_setup.subscribe_status();
            let handle2 = app_handle.clone();
            tauri::async_runtime::spawn(async move {
                loop {
                    match status_rx.recv().await {
                        Ok(event) => {
                            if let Err(e) = handle2.emit("lingocast://status", &event) {
                                tracing::warn!("emit status: {e}");
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!("status receiver lagged by {n} events");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            });

            let mut progress_rx = models_for_setup.subscribe();
            let handle3 = app_handle.clone();
            tauri::async_runtime::spawn(async move {
                loop {
                    match progress_rx.recv().await {
                        Ok(event) => {
                            if let Err(e) = handle3.emit("lingocast://model-progress", &event) {
                                tracing::warn!("emit model progress: {e}");
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!("model progress receiver lagged by {n} events");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            });

            ensure_overlay_window(&app_handle)?;

            Ok(())
        })
        .manage(AppState {
            engine: Arc::clone(&engine),
            models: Arc::clone(&models),
            settings: settings_state,
            settings_path,
            utterances_pushed: Arc::new(AtomicUsize::new(0)),
        })
        .invoke_handler(tauri::generate_handler![
            commands::start_session,
            commands::stop_session,
            commands::get_status,
            commands::push_utterance,
            commands::get_history,
            commands::get_overlay_feed,
            commands::list_audio_devices,
            commands::get_settings,
            commands::set_settings,
            commands::get_model_catalog,
            commands::install_model,
            commands::remove_model,
            commands::set_overlay_visible,
            commands::get_diagnostics,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Tauri application");
}
