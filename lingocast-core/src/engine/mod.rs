//! `CaptionEngine` — top-level session controller.
//!
//! ## Lifecycle
//!
//! ```text
//! CaptionEngine::new()
//!     └─► start()                → status = Live, utterances accepted
//!         └─► submit_utterance() → one intake task per finalized phrase
//!             └─► stop()         → status = Stopped; in-flight translations
//!                                  still complete and land in history
//! ```
//!
//! `start()`/`stop()` are idempotent: calling them in the wrong state returns
//! an error rather than panicking.
//!
//! ## Concurrency
//!
//! Each utterance runs as an independent Tokio task; the translation call is
//! the sole suspension point. The history lock is the only shared mutation
//! point, so feed order follows translation completion, not speech order.

pub mod intake;

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::{
    error::{LingoError, Result},
    filter::WordFilter,
    history::HistoryStore,
    ipc::events::{CaptionEvent, SessionStatus, SessionStatusEvent},
    translate::{TranslationMode, TranslatorHandle},
};

/// Broadcast channel capacity: 256 events buffered for slow consumers.
const BROADCAST_CAP: usize = 256;

/// Configuration fixed at engine construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on one translation call. The original enforced none; the
    /// bound exists so a hung request degrades like any other soft failure
    /// instead of pinning a task forever.
    pub translation_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            translation_timeout: Duration::from_secs(15),
        }
    }
}

/// Settings the pipeline reads once per submission.
///
/// Held behind a mutex and snapshotted at invocation time — an utterance in
/// flight keeps the mode it started with even if the toggle flips.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// When enabled, utterances are translated in Dual mode (English +
    /// Japanese); otherwise English only.
    pub japanese_enabled: bool,
    /// Active word filters applied to the utterance before translation.
    pub word_filters: Vec<WordFilter>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            japanese_enabled: true,
            word_filters: Vec::new(),
        }
    }
}

impl PipelineSettings {
    /// Mode derived from the secondary-language flag.
    pub fn mode(&self) -> TranslationMode {
        if self.japanese_enabled {
            TranslationMode::Dual
        } else {
            TranslationMode::English
        }
    }
}

/// The top-level engine handle.
///
/// `CaptionEngine` is `Send + Sync` — all fields use interior mutability.
/// Wrap in `Arc<CaptionEngine>` to share between the Tauri app state and
/// event-forwarding async tasks.
pub struct CaptionEngine {
    config: EngineConfig,
    translator: TranslatorHandle,
    history: Arc<HistoryStore>,
    settings: Mutex<PipelineSettings>,
    /// `true` while the session accepts utterances.
    running: AtomicBool,
    /// Canonical status (written atomically via Mutex, read from commands).
    status: Mutex<SessionStatus>,
    /// Broadcast sender for status events.
    status_tx: broadcast::Sender<SessionStatusEvent>,
    /// Identity counter for caption entries.
    entry_seq: Arc<AtomicU64>,
    /// Shared intake diagnostics counters.
    diagnostics: Arc<intake::IntakeDiagnostics>,
}

impl CaptionEngine {
    /// Create a new engine. Does not accept utterances — call `start()`.
    pub fn new(config: EngineConfig, translator: TranslatorHandle) -> Self {
        let (caption_tx, _) = broadcast::channel(BROADCAST_CAP);
        let (status_tx, _) = broadcast::channel(BROADCAST_CAP);

        Self {
            config,
            translator,
            history: Arc::new(HistoryStore::new(caption_tx)),
            settings: Mutex::new(PipelineSettings::default()),
            running: AtomicBool::new(false),
            status: Mutex::new(SessionStatus::Idle),
            status_tx,
            entry_seq: Arc::new(AtomicU64::new(0)),
            diagnostics: Arc::new(intake::IntakeDiagnostics::default()),
        }
    }

    /// Start accepting utterances.
    ///
    /// # Errors
    /// - `LingoError::AlreadyLive` if already started.
    pub fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(LingoError::AlreadyLive);
        }
        self.diagnostics.reset();
        self.set_status(SessionStatus::Live, None);
        info!(backend = self.translator.0.name(), "session live");
        Ok(())
    }

    /// Stop accepting utterances.
    ///
    /// Translations already in flight are not cancelled — they complete and
    /// append to history.
    ///
    /// # Errors
    /// - `LingoError::NotLive` if not currently live.
    pub fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(LingoError::NotLive);
        }
        self.set_status(SessionStatus::Stopped, None);
        let snap = self.diagnostics.snapshot();
        info!(
            utterances_received = snap.utterances_received,
            utterances_rejected = snap.utterances_rejected,
            translate_calls = snap.translate_calls,
            translate_failures = snap.translate_failures,
            parse_fallbacks = snap.parse_fallbacks,
            entries_appended = snap.entries_appended,
            "session stopped — diagnostics"
        );
        Ok(())
    }

    /// Entry point called once per finalized utterance.
    ///
    /// Snapshots settings, applies word filters, then spawns an independent
    /// intake task: translate → parse → record. Failures inside the task
    /// degrade to an entry with empty fields; the utterance is never dropped
    /// once accepted.
    ///
    /// # Errors
    /// - `LingoError::NotLive` if the session has not been started.
    pub fn submit_utterance(&self, utterance: &str) -> Result<()> {
        if !self.running.load(Ordering::SeqCst) {
            self.diagnostics.note_rejected();
            return Err(LingoError::NotLive);
        }

        let (mode, filters) = {
            let settings = self.settings.lock();
            (settings.mode(), settings.word_filters.clone())
        };

        let filtered = crate::filter::apply_filters(utterance, &filters);
        if filtered.trim().is_empty() {
            self.diagnostics.note_rejected();
            debug!("ignoring empty utterance");
            return Ok(());
        }

        self.diagnostics.note_received();
        let ctx = intake::IntakeContext {
            translator: self.translator.clone(),
            history: Arc::clone(&self.history),
            entry_seq: Arc::clone(&self.entry_seq),
            diagnostics: Arc::clone(&self.diagnostics),
            timeout: self.config.translation_timeout,
        };
        tokio::spawn(intake::run(ctx, filtered, mode));
        Ok(())
    }

    /// Current session status (snapshot).
    pub fn status(&self) -> SessionStatus {
        *self.status.lock()
    }

    /// The bounded caption feed.
    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Subscribe to live caption events.
    pub fn subscribe_captions(&self) -> broadcast::Receiver<CaptionEvent> {
        self.history.subscribe()
    }

    /// Subscribe to live status change events.
    pub fn subscribe_status(&self) -> broadcast::Receiver<SessionStatusEvent> {
        self.status_tx.subscribe()
    }

    /// Toggle the secondary (Japanese) language for future submissions.
    pub fn set_japanese_enabled(&self, enabled: bool) {
        self.settings.lock().japanese_enabled = enabled;
    }

    /// Replace the word filter set used for future submissions.
    pub fn set_word_filters(&self, filters: Vec<WordFilter>) {
        self.settings.lock().word_filters = filters;
    }

    /// Snapshot of intake counters for observability.
    pub fn intake_diagnostics_snapshot(&self) -> intake::DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    fn set_status(&self, new_status: SessionStatus, detail: Option<String>) {
        *self.status.lock() = new_status;
        let _ = self.status_tx.send(SessionStatusEvent {
            status: new_status,
            detail,
        });
    }
}
