//! Event types emitted over the Tauri IPC channel.
//!
//! ## Channel names
//!
//! | Event | Channel |
//! |-------|---------|
//! | `CaptionEvent` | `"lingocast://caption"` |
//! | `SessionStatusEvent` | `"lingocast://status"` |
//! | `ModelProgressEvent` | `"lingocast://model-progress"` |

use serde::{Deserialize, Serialize};

use crate::history::CaptionEntry;
use crate::models::ModelStatus;

// ---------------------------------------------------------------------------
// Caption events
// ---------------------------------------------------------------------------

/// Emitted on channel `"lingocast://caption"` for every appended entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionEvent {
    /// Monotonically increasing event sequence number, matching feed order.
    pub seq: u64,
    /// The entry as it now appears at the front of the feed.
    pub entry: CaptionEntry,
}

// ---------------------------------------------------------------------------
// Session status events
// ---------------------------------------------------------------------------

/// Emitted on channel `"lingocast://status"` when the session state changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusEvent {
    pub status: SessionStatus,
    /// Optional human-readable detail (e.g. error message).
    pub detail: Option<String>,
}

/// Current state of the caption session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Engine created but `start()` not yet called.
    Idle,
    /// Accepting utterances and translating.
    Live,
    /// Session stopped; in-flight translations may still land.
    Stopped,
    /// Unrecoverable error — restart required.
    Error,
}

// ---------------------------------------------------------------------------
// Model installer events
// ---------------------------------------------------------------------------

/// Emitted on channel `"lingocast://model-progress"` for each install tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProgressEvent {
    pub id: String,
    pub status: ModelStatus,
    /// Install progress in percent, 0–100.
    pub progress: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_event_serializes_with_camel_case_fields() {
        let event = CaptionEvent {
            seq: 7,
            entry: CaptionEntry {
                id: "cap-7".into(),
                original: "hola chat".into(),
                english: "hello chat".into(),
                japanese: Some("こんにちは".into()),
                created_at: 1_720_000_000_000,
            },
        };

        let json = serde_json::to_value(&event).expect("serialize caption event");
        assert_eq!(json["seq"], 7);
        assert_eq!(json["entry"]["id"], "cap-7");
        assert_eq!(json["entry"]["original"], "hola chat");
        assert_eq!(json["entry"]["english"], "hello chat");
        assert_eq!(json["entry"]["japanese"], "こんにちは");
        assert_eq!(json["entry"]["createdAt"], 1_720_000_000_000i64);

        let round_trip: CaptionEvent =
            serde_json::from_value(json).expect("deserialize caption event");
        assert_eq!(round_trip.seq, 7);
        assert_eq!(round_trip.entry.japanese.as_deref(), Some("こんにちは"));
    }

    #[test]
    fn caption_entry_without_japanese_serializes_null() {
        let entry = CaptionEntry {
            id: "cap-0".into(),
            original: "hola".into(),
            english: "hello".into(),
            japanese: None,
            created_at: 0,
        };
        let json = serde_json::to_value(&entry).expect("serialize entry");
        assert!(json["japanese"].is_null());
    }

    #[test]
    fn session_status_event_serializes_with_lowercase_status() {
        let event = SessionStatusEvent {
            status: SessionStatus::Live,
            detail: None,
        };

        let json = serde_json::to_value(&event).expect("serialize status event");
        assert_eq!(json["status"], "live");
        assert!(json["detail"].is_null());

        let round_trip: SessionStatusEvent =
            serde_json::from_value(json).expect("deserialize status event");
        assert_eq!(round_trip.status, SessionStatus::Live);
    }

    #[test]
    fn session_status_rejects_non_lowercase_values() {
        let invalid = r#""Live""#;
        let err = serde_json::from_str::<SessionStatus>(invalid);
        assert!(err.is_err(), "expected invalid casing to fail");
    }

    #[test]
    fn model_progress_event_serializes_with_lowercase_status() {
        let event = ModelProgressEvent {
            id: "wh-base".into(),
            status: ModelStatus::Downloading,
            progress: 45,
        };

        let json = serde_json::to_value(&event).expect("serialize model event");
        assert_eq!(json["id"], "wh-base");
        assert_eq!(json["status"], "downloading");
        assert_eq!(json["progress"], 45);
    }
}
