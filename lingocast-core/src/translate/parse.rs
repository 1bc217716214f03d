//! Reply interpretation for the caption pipeline.
//!
//! The hosted service returns plain text for single-language modes and a
//! two-field JSON object for Dual mode. Interpretation must never fail the
//! pipeline: a malformed structured reply degrades to plain text and a
//! missing reply degrades to empty fields.

use serde::Deserialize;

use super::TranslationMode;

/// Field names fixed by the response schema sent in Dual-mode requests.
#[derive(Debug, Deserialize)]
struct BilingualReply {
    #[serde(default)]
    en: String,
    #[serde(default)]
    jp: String,
}

/// Display strings extracted from a raw translator reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub english: String,
    pub japanese: Option<String>,
}

/// Interpret `raw` according to the mode the request was made with.
///
/// - `None` (soft failure upstream) → empty english, no japanese.
/// - Single-language modes → the reply verbatim in the english slot,
///   whichever language was actually requested.
/// - Dual → both JSON fields, each defaulting to empty when missing. A
///   reply that is not a valid bilingual object is kept verbatim in the
///   english slot instead.
pub fn parse_reply(raw: Option<&str>, mode: TranslationMode) -> ParsedReply {
    let Some(raw) = raw else {
        return ParsedReply {
            english: String::new(),
            japanese: None,
        };
    };

    if !mode.wants_structured_reply() {
        return ParsedReply {
            english: raw.to_string(),
            japanese: None,
        };
    }

    match serde_json::from_str::<BilingualReply>(raw) {
        Ok(reply) => ParsedReply {
            english: reply.en,
            japanese: Some(reply.jp),
        },
        Err(e) => {
            tracing::debug!("dual reply was not structured JSON ({e}); keeping raw text");
            ParsedReply {
                english: raw.to_string(),
                japanese: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_reply_with_both_fields() {
        let raw = r#"{"en":"Hello chat","jp":"こんにちは"}"#;
        let parsed = parse_reply(Some(raw), TranslationMode::Dual);
        assert_eq!(parsed.english, "Hello chat");
        assert_eq!(parsed.japanese.as_deref(), Some("こんにちは"));
    }

    #[test]
    fn dual_reply_with_missing_field_defaults_to_empty() {
        let parsed = parse_reply(Some(r#"{"en":"Hello chat"}"#), TranslationMode::Dual);
        assert_eq!(parsed.english, "Hello chat");
        assert_eq!(parsed.japanese.as_deref(), Some(""));
    }

    #[test]
    fn dual_reply_that_is_not_json_falls_back_to_raw_text() {
        let parsed = parse_reply(Some("not json"), TranslationMode::Dual);
        assert_eq!(parsed.english, "not json");
        assert!(parsed.japanese.is_none());
    }

    #[test]
    fn dual_reply_that_is_a_json_string_still_falls_back() {
        // Valid JSON, wrong shape — must degrade like any other malformed reply.
        let parsed = parse_reply(Some(r#""Hello chat""#), TranslationMode::Dual);
        assert_eq!(parsed.english, r#""Hello chat""#);
        assert!(parsed.japanese.is_none());
    }

    #[test]
    fn single_language_modes_keep_reply_verbatim() {
        let parsed = parse_reply(Some("Hey everyone"), TranslationMode::English);
        assert_eq!(parsed.english, "Hey everyone");
        assert!(parsed.japanese.is_none());

        // Japanese-only output lands in the same slot; the slot is
        // language-agnostic for single-language modes.
        let parsed = parse_reply(Some("みなさんこんにちは"), TranslationMode::Japanese);
        assert_eq!(parsed.english, "みなさんこんにちは");
        assert!(parsed.japanese.is_none());
    }

    #[test]
    fn absent_reply_degrades_to_empty_fields() {
        for mode in [
            TranslationMode::English,
            TranslationMode::Japanese,
            TranslationMode::Dual,
        ] {
            let parsed = parse_reply(None, mode);
            assert_eq!(parsed.english, "");
            assert!(parsed.japanese.is_none());
        }
    }
}
