use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lingocast_core::{
    CaptionEngine, CaptionEvent, EchoTranslator, EngineConfig, LingoError, TranslationMode,
    Translator, TranslatorHandle, HISTORY_CAP,
};
use tokio::sync::broadcast;
use tokio::time::timeout;

/// Per-utterance delays keyed by text, so completion order can be scripted.
struct DelayByTextTranslator {
    delays: HashMap<String, Duration>,
}

impl DelayByTextTranslator {
    fn new(delays: &[(&str, u64)]) -> Self {
        Self {
            delays: delays
                .iter()
                .map(|(text, ms)| (text.to_string(), Duration::from_millis(*ms)))
                .collect(),
        }
    }
}

#[async_trait]
impl Translator for DelayByTextTranslator {
    async fn translate(
        &self,
        text: &str,
        _mode: TranslationMode,
    ) -> Result<String, LingoError> {
        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }
        Ok(format!("en:{text}"))
    }

    fn name(&self) -> &str {
        "delay-by-text"
    }
}

async fn recv_caption(rx: &mut broadcast::Receiver<CaptionEvent>) -> CaptionEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for caption event")
        .expect("caption channel closed")
}

#[tokio::test]
async fn first_caption_lands_under_500ms() {
    let engine = CaptionEngine::new(
        EngineConfig::default(),
        TranslatorHandle::new(DelayByTextTranslator::new(&[("hola", 20)])),
    );
    engine.set_japanese_enabled(false);
    engine.start().expect("start");
    let mut rx = engine.subscribe_captions();

    let start = Instant::now();
    engine.submit_utterance("hola").expect("submit");
    let event = recv_caption(&mut rx).await;
    let elapsed = start.elapsed();

    assert_eq!(event.entry.english, "en:hola");
    assert!(
        elapsed < Duration::from_millis(500),
        "first caption took {elapsed:?}"
    );
}

#[tokio::test]
async fn feed_orders_by_completion_not_submission() {
    // The first utterance translates slowly, the second quickly; the quick
    // one must land first and the slow one end up newest.
    let engine = CaptionEngine::new(
        EngineConfig::default(),
        TranslatorHandle::new(DelayByTextTranslator::new(&[
            ("primera", 120),
            ("segunda", 5),
        ])),
    );
    engine.set_japanese_enabled(false);
    engine.start().expect("start");
    let mut rx = engine.subscribe_captions();

    engine.submit_utterance("primera").expect("submit first");
    engine.submit_utterance("segunda").expect("submit second");

    let first = recv_caption(&mut rx).await;
    let second = recv_caption(&mut rx).await;
    assert_eq!(first.entry.original, "segunda");
    assert_eq!(second.entry.original, "primera");

    let snap = engine.history().snapshot();
    assert_eq!(snap[0].original, "primera");
    assert_eq!(snap[1].original, "segunda");
    // Identity is assigned at record time, so it follows completion order too.
    assert_eq!(snap[1].id, "cap-0");
    assert_eq!(snap[0].id, "cap-1");
}

#[tokio::test]
async fn feed_stays_bounded_across_twenty_utterances() {
    let engine = CaptionEngine::new(
        EngineConfig::default(),
        TranslatorHandle::new(EchoTranslator),
    );
    engine.set_japanese_enabled(false);
    engine.start().expect("start");
    let mut rx = engine.subscribe_captions();

    for n in 0..20 {
        engine
            .submit_utterance(&format!("frase {n}"))
            .expect("submit");
        // Await each completion so feed order is deterministic.
        recv_caption(&mut rx).await;
    }

    let snap = engine.history().snapshot();
    assert_eq!(snap.len(), HISTORY_CAP);
    assert_eq!(snap[0].original, "frase 19");
    assert_eq!(snap[14].original, "frase 5");
    assert_eq!(engine.intake_diagnostics_snapshot().entries_appended, 20);

    let overlay = engine.history().overlay_view();
    assert_eq!(overlay.len(), 2);
    assert_eq!(overlay[0].original, "frase 18");
    assert_eq!(overlay[1].original, "frase 19");
}

#[tokio::test]
async fn dual_mode_end_to_end_through_the_engine() {
    let engine = CaptionEngine::new(
        EngineConfig::default(),
        TranslatorHandle::new(EchoTranslator),
    );
    engine.start().expect("start");
    let mut rx = engine.subscribe_captions();

    engine.submit_utterance("hola chat").expect("submit");
    let event = recv_caption(&mut rx).await;

    assert_eq!(event.entry.original, "hola chat");
    assert_eq!(event.entry.english, "hola chat");
    assert_eq!(event.entry.japanese.as_deref(), Some("hola chat"));
}
