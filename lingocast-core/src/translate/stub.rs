//! `EchoTranslator` — placeholder backend that echoes the utterance without
//! calling the hosted service.
//!
//! Used when no API key is configured so the caption pipeline, event bus and
//! UI can still be exercised end-to-end.

use async_trait::async_trait;
use tracing::debug;

use super::{TranslationMode, Translator};
use crate::error::Result;

/// Echo-style stub translator.
///
/// Single-language modes return the utterance unchanged; Dual mode returns a
/// structured reply with the utterance in both fields, matching the shape
/// the hosted service is asked for.
pub struct EchoTranslator;

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, text: &str, mode: TranslationMode) -> Result<String> {
        debug!("EchoTranslator::translate — no remote call");
        if mode.wants_structured_reply() {
            Ok(serde_json::json!({ "en": text, "jp": text }).to_string())
        } else {
            Ok(text.to_string())
        }
    }

    fn name(&self) -> &str {
        "echo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::parse::parse_reply;

    #[tokio::test]
    async fn dual_echo_round_trips_through_the_parser() {
        let raw = EchoTranslator
            .translate("hola chat", TranslationMode::Dual)
            .await
            .expect("echo translate");
        let parsed = parse_reply(Some(&raw), TranslationMode::Dual);
        assert_eq!(parsed.english, "hola chat");
        assert_eq!(parsed.japanese.as_deref(), Some("hola chat"));
    }

    #[tokio::test]
    async fn single_mode_echo_is_verbatim() {
        let raw = EchoTranslator
            .translate("hola chat", TranslationMode::English)
            .await
            .expect("echo translate");
        assert_eq!(raw, "hola chat");
    }
}
