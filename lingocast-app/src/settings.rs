//! Persistent application settings (JSON file in app data directory).

use std::fs;
use std::path::{Path, PathBuf};

use lingocast_core::WordFilter;
use serde::{Deserialize, Serialize};

/// Bounds of the display-scale slider.
const FONT_SCALE_MIN: u32 = 16;
const FONT_SCALE_MAX: u32 = 64;

const MAX_WORD_FILTERS: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AppSettings {
    /// Secondary-language toggle: when on, utterances translate in Dual mode.
    pub japanese_enabled: bool,
    /// Caption font size in px, applied by the webview.
    pub font_scale: u32,
    /// Stylised caption rendering toggle.
    pub anime_style: bool,
    /// Hardware-acceleration preference surfaced in the settings panel.
    pub use_gpu: bool,
    /// Directory shown in the local-model panel.
    pub models_dir: String,
    pub preferred_input_device: Option<String>,
    pub word_filters: Vec<WordFilter>,
    pub gemini_api_key: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            japanese_enabled: true,
            font_scale: 28,
            anime_style: true,
            use_gpu: true,
            models_dir: default_models_dir().to_string_lossy().into_owned(),
            preferred_input_device: None,
            word_filters: Vec::new(),
            gemini_api_key: None,
        }
    }
}

/// Settings view handed to the frontend — excludes the raw API key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSettings {
    pub japanese_enabled: bool,
    pub font_scale: u32,
    pub anime_style: bool,
    pub use_gpu: bool,
    pub models_dir: String,
    pub preferred_input_device: Option<String>,
    pub word_filters: Vec<WordFilter>,
    pub has_gemini_api_key: bool,
}

impl AppSettings {
    pub fn normalize(&mut self) {
        self.font_scale = self.font_scale.clamp(FONT_SCALE_MIN, FONT_SCALE_MAX);
        if self.models_dir.trim().is_empty() {
            self.models_dir = default_models_dir().to_string_lossy().into_owned();
        }
        self.preferred_input_device = self
            .preferred_input_device
            .as_ref()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.gemini_api_key = self
            .gemini_api_key
            .as_ref()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self.word_filters = normalize_word_filters(&self.word_filters);
    }

    pub fn runtime_settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            japanese_enabled: self.japanese_enabled,
            font_scale: self.font_scale,
            anime_style: self.anime_style,
            use_gpu: self.use_gpu,
            models_dir: self.models_dir.clone(),
            preferred_input_device: self.preferred_input_device.clone(),
            word_filters: self.word_filters.clone(),
            has_gemini_api_key: self.gemini_api_key.is_some(),
        }
    }
}

fn normalize_word_filters(raw: &[WordFilter]) -> Vec<WordFilter> {
    let mut out: Vec<WordFilter> = Vec::new();
    for filter in raw {
        let pattern = filter.pattern.trim();
        if pattern.is_empty() {
            continue;
        }
        if out
            .iter()
            .any(|f: &WordFilter| f.pattern.eq_ignore_ascii_case(pattern))
        {
            continue;
        }
        out.push(WordFilter {
            id: filter.id.trim().to_string(),
            pattern: pattern.to_string(),
            replacement: filter.replacement.trim().to_string(),
            is_active: filter.is_active,
        });
        if out.len() >= MAX_WORD_FILTERS {
            break;
        }
    }
    out
}

fn data_root() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Kaiwa Labs")
            .join("LingoCast")
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".local")
                    .join("share")
            })
            .join("lingocast")
    }
}

pub fn default_settings_path() -> PathBuf {
    data_root().join("settings.json")
}

pub fn default_models_dir() -> PathBuf {
    data_root().join("models")
}

pub fn load_settings(path: &Path) -> AppSettings {
    let mut settings = fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<AppSettings>(&raw).ok())
        .unwrap_or_default();
    settings.normalize();
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;
    fs::write(path, json)
}
