//! # lingocast-core
//!
//! Reusable live-caption pipeline SDK.
//!
//! ## Architecture
//!
//! ```text
//! Recognizer (webview) → CaptionEngine::submit_utterance
//!                              │  word filters + mode snapshot
//!                        Translator::translate   (sole await point)
//!                              │
//!                        parse_reply
//!                              │
//!                        CaptionEntry → HistoryStore (bounded, newest-first)
//!                              │
//!                        broadcast::Sender<CaptionEvent>
//! ```
//!
//! Each utterance runs as its own task, so the feed orders by translation
//! completion rather than speech order. A failed or timed-out translation
//! still produces an entry — utterances are never dropped.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod audio;
pub mod engine;
pub mod error;
pub mod filter;
pub mod history;
pub mod ipc;
pub mod models;
pub mod translate;

// Convenience re-exports for downstream crates
pub use engine::{CaptionEngine, EngineConfig, PipelineSettings};
pub use error::LingoError;
pub use filter::WordFilter;
pub use history::{CaptionEntry, HistoryStore, HISTORY_CAP, OVERLAY_CAP};
pub use ipc::events::{CaptionEvent, ModelProgressEvent, SessionStatus, SessionStatusEvent};
pub use models::{LocalModel, ModelLibrary, ModelStatus};
pub use translate::{
    EchoTranslator, GeminiConfig, GeminiTranslator, TranslationMode, Translator, TranslatorHandle,
};
