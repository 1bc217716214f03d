//! Translation backend abstraction.
//!
//! The `Translator` trait decouples the intake pipeline from any specific
//! backend (hosted Gemini endpoint, echo stub). Backends are stateless
//! request/response clients, so `translate` takes `&self` and the shared
//! handle is a plain `Arc` — no mutex around calls.

pub mod gemini;
pub mod parse;
pub mod stub;

pub use gemini::{GeminiConfig, GeminiTranslator};
pub use stub::EchoTranslator;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which language(s) an utterance should be rendered into.
///
/// Selected per utterance from current settings: `Dual` when the secondary
/// language is enabled, `English` otherwise. Not stored on entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    English,
    Japanese,
    Dual,
}

impl TranslationMode {
    /// Target-language sentence spliced into the system instruction.
    pub fn target_description(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Japanese => "Japanese",
            Self::Dual => "Both English and Japanese",
        }
    }

    /// Dual mode asks the service for a machine-parseable JSON reply.
    pub fn wants_structured_reply(self) -> bool {
        matches!(self, Self::Dual)
    }
}

/// Contract for translation backends.
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Translate one finalized utterance.
    ///
    /// On success the reply text is returned unmodified — Dual-mode replies
    /// are interpreted later by [`parse::parse_reply`], not here.
    ///
    /// # Errors
    /// Transport, auth, and service-side failures. The intake layer converts
    /// every error into the absence sentinel; nothing here reaches the feed.
    async fn translate(&self, text: &str, mode: TranslationMode) -> Result<String>;

    /// Short backend name used in logs.
    fn name(&self) -> &str;
}

/// Cheap-clone shared handle to any `Translator` implementor.
#[derive(Clone)]
pub struct TranslatorHandle(pub Arc<dyn Translator>);

impl TranslatorHandle {
    /// Wrap any `Translator` in a `TranslatorHandle`.
    pub fn new<T: Translator>(translator: T) -> Self {
        Self(Arc::new(translator))
    }
}

impl std::fmt::Debug for TranslatorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorHandle")
            .field("backend", &self.0.name())
            .finish()
    }
}
