//! Per-utterance intake flow.
//!
//! ## Stages (strictly sequential, one task per utterance)
//!
//! ```text
//! 1. Received   — filtered utterance + mode snapshot from the engine
//! 2. Translating — the sole await point, bounded by the configured timeout
//! 3. Parsed     — reply interpreted per mode; failures degrade, never raise
//! 4. Recorded   — entry constructed (fresh id, timestamp = now) and appended
//! ```
//!
//! Every failure path still reaches Recorded: the worst outcome is an entry
//! with an empty English field, never a silently dropped utterance.

use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::{
    history::{CaptionEntry, HistoryStore},
    translate::{parse::parse_reply, TranslationMode, TranslatorHandle},
};

#[derive(Default)]
pub struct IntakeDiagnostics {
    pub utterances_received: AtomicUsize,
    pub utterances_rejected: AtomicUsize,
    pub translate_calls: AtomicUsize,
    pub translate_failures: AtomicUsize,
    pub parse_fallbacks: AtomicUsize,
    pub entries_appended: AtomicUsize,
}

impl IntakeDiagnostics {
    pub fn note_received(&self) {
        self.utterances_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn note_rejected(&self) {
        self.utterances_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.utterances_received.store(0, Ordering::Relaxed);
        self.utterances_rejected.store(0, Ordering::Relaxed);
        self.translate_calls.store(0, Ordering::Relaxed);
        self.translate_failures.store(0, Ordering::Relaxed);
        self.parse_fallbacks.store(0, Ordering::Relaxed);
        self.entries_appended.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            utterances_received: self.utterances_received.load(Ordering::Relaxed),
            utterances_rejected: self.utterances_rejected.load(Ordering::Relaxed),
            translate_calls: self.translate_calls.load(Ordering::Relaxed),
            translate_failures: self.translate_failures.load(Ordering::Relaxed),
            parse_fallbacks: self.parse_fallbacks.load(Ordering::Relaxed),
            entries_appended: self.entries_appended.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DiagnosticsSnapshot {
    pub utterances_received: usize,
    pub utterances_rejected: usize,
    pub translate_calls: usize,
    pub translate_failures: usize,
    pub parse_fallbacks: usize,
    pub entries_appended: usize,
}

/// All context one intake task needs, passed as one struct so the spawn
/// site stays tidy.
pub struct IntakeContext {
    pub translator: TranslatorHandle,
    pub history: Arc<HistoryStore>,
    pub entry_seq: Arc<AtomicU64>,
    pub diagnostics: Arc<IntakeDiagnostics>,
    pub timeout: Duration,
}

/// Run one utterance through translate → parse → record.
pub async fn run(ctx: IntakeContext, utterance: String, mode: TranslationMode) {
    ctx.diagnostics
        .translate_calls
        .fetch_add(1, Ordering::Relaxed);

    let raw = match tokio::time::timeout(
        ctx.timeout,
        ctx.translator.0.translate(&utterance, mode),
    )
    .await
    {
        Ok(Ok(reply)) => Some(reply),
        Ok(Err(e)) => {
            ctx.diagnostics
                .translate_failures
                .fetch_add(1, Ordering::Relaxed);
            warn!(
                backend = ctx.translator.0.name(),
                error = %e,
                "translation failed — recording entry with empty fields"
            );
            None
        }
        Err(_) => {
            ctx.diagnostics
                .translate_failures
                .fetch_add(1, Ordering::Relaxed);
            warn!(
                backend = ctx.translator.0.name(),
                timeout_ms = ctx.timeout.as_millis() as u64,
                "translation timed out — recording entry with empty fields"
            );
            None
        }
    };

    let parsed = parse_reply(raw.as_deref(), mode);
    if raw.is_some() && mode.wants_structured_reply() && parsed.japanese.is_none() {
        ctx.diagnostics
            .parse_fallbacks
            .fetch_add(1, Ordering::Relaxed);
    }

    let n = ctx.entry_seq.fetch_add(1, Ordering::Relaxed);
    let entry = CaptionEntry {
        id: format!("cap-{n}"),
        original: utterance,
        english: parsed.english,
        japanese: parsed.japanese,
        created_at: Utc::now().timestamp_millis(),
    };

    info!(
        entry_id = %entry.id,
        mode = ?mode,
        english_len = entry.english.len(),
        has_japanese = entry.japanese.is_some(),
        "caption recorded"
    );
    ctx.history.append(entry);
    ctx.diagnostics
        .entries_appended
        .fetch_add(1, Ordering::Relaxed);
}
