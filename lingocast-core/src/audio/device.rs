//! Input device enumeration for the source picker.

use serde::{Deserialize, Serialize};

/// Metadata about an audio input device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Human-readable device name reported by the OS.
    pub name: String,
    /// Whether this is the system default input device.
    pub is_default: bool,
    /// Heuristic flag for devices that capture system playback or a virtual
    /// cable rather than a voice.
    pub is_playback_capture: bool,
}

/// Substrings that mark a device as capturing playback instead of a voice.
/// Streamer setups are full of these (broadcast software loopbacks, virtual
/// mixing cables, "stereo mix" style endpoints).
const PLAYBACK_CAPTURE_MARKERS: &[&str] = &[
    "stereo mix",
    "loopback",
    "monitor of",
    "what u hear",
    "cable output",
    "voicemeeter out",
    "virtual audio",
    "obs virtual",
    "mezcla estereo",
];

/// Best-effort heuristic for playback-capture / virtual-cable devices.
pub fn is_playback_capture_name(name: &str) -> bool {
    let lowered = name.trim().to_ascii_lowercase();
    PLAYBACK_CAPTURE_MARKERS.iter().any(|m| lowered.contains(m))
}

/// List all available audio input devices on the system.
///
/// Voice-like devices sort first, the default device ahead of its peers.
/// Returns an empty `Vec` when enumeration fails — the picker then simply
/// shows no options rather than erroring.
#[cfg(feature = "audio-cpal")]
pub fn list_input_devices() -> Vec<DeviceInfo> {
    use cpal::traits::{DeviceTrait, HostTrait};

    let host = cpal::default_host();
    let default_name = host.default_input_device().and_then(|d| d.name().ok());

    let devices = match host.input_devices() {
        Ok(devices) => devices,
        Err(e) => {
            tracing::warn!("failed to enumerate input devices: {e}");
            return Vec::new();
        }
    };

    let mut list = devices
        .enumerate()
        .map(|(idx, device)| {
            let name = device
                .name()
                .unwrap_or_else(|_| format!("Input Device {}", idx + 1));
            let is_default = default_name.as_deref() == Some(name.as_str());
            let is_playback_capture = is_playback_capture_name(&name);
            DeviceInfo {
                name,
                is_default,
                is_playback_capture,
            }
        })
        .collect::<Vec<_>>();

    list.sort_by_key(|d| {
        (
            d.is_playback_capture,
            !d.is_default,
            d.name.to_ascii_lowercase(),
        )
    });
    list
}

#[cfg(not(feature = "audio-cpal"))]
pub fn list_input_devices() -> Vec<DeviceInfo> {
    Vec::new()
}
