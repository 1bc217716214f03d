//! Hosted Gemini translator backend.
//!
//! One `generateContent` request per utterance. Dual mode declares a JSON
//! response schema with fixed `en`/`jp` string fields; single-language modes
//! request plain text. The reply's text parts are returned joined and
//! otherwise untouched.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{TranslationMode, Translator};
use crate::error::{LingoError, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for the hosted endpoint.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model resource name, e.g. `gemini-3-flash-preview`.
    pub model: String,
    /// Whole-request timeout enforced by the HTTP client.
    pub request_timeout: Duration,
    /// Override point for tests and regional endpoints.
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            request_timeout: DEFAULT_TIMEOUT,
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Translator backed by the hosted Gemini `generateContent` endpoint.
pub struct GeminiTranslator {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiTranslator {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("failed to create HTTP client");

        Self { client, config }
    }

    fn system_instruction(mode: TranslationMode) -> String {
        format!(
            "You are a professional real-time translator for streamers.\n\
             Source: Spanish.\n\
             Target: {}.\n\
             Rules:\n\
             - Keep the tone natural and informal (streaming context).\n\
             - If dual mode, return a JSON object with \"en\" and \"jp\" fields.\n\
             - Preserve emojis and emotions.",
            mode.target_description()
        )
    }

    fn request_body(text: &str, mode: TranslationMode) -> GenerateContentRequest {
        let generation_config = if mode.wants_structured_reply() {
            GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: Some(json!({
                    "type": "OBJECT",
                    "properties": {
                        "en": { "type": "STRING" },
                        "jp": { "type": "STRING" },
                    },
                    "required": ["en", "jp"],
                })),
            }
        } else {
            GenerationConfig {
                response_mime_type: "text/plain".into(),
                response_schema: None,
            }
        };

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: text.into() }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: Self::system_instruction(mode),
                }],
            },
            generation_config,
        }
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, text: &str, mode: TranslationMode) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&Self::request_body(text, mode))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LingoError::TranslationTimeout
                } else {
                    LingoError::TranslationRequest(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LingoError::TranslationService { status, body });
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LingoError::TranslationRequest(format!("reply decode error: {e}")))?;

        let reply_text = reply
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if reply_text.is_empty() {
            return Err(LingoError::EmptyReply);
        }

        Ok(reply_text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translator_name() {
        let translator = GeminiTranslator::new(GeminiConfig::new("test-key"));
        assert_eq!(translator.name(), "gemini");
    }

    #[test]
    fn dual_request_declares_json_schema() {
        let body = GeminiTranslator::request_body("hola chat", TranslationMode::Dual);
        let json = serde_json::to_value(&body).expect("serialize request");

        assert_eq!(json["contents"][0]["parts"][0]["text"], "hola chat");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let schema = &json["generationConfig"]["responseSchema"];
        assert_eq!(schema["properties"]["en"]["type"], "STRING");
        assert_eq!(schema["properties"]["jp"]["type"], "STRING");
        assert_eq!(schema["required"][0], "en");
        assert_eq!(schema["required"][1], "jp");
    }

    #[test]
    fn single_language_request_asks_for_plain_text() {
        let body = GeminiTranslator::request_body("hola chat", TranslationMode::English);
        let json = serde_json::to_value(&body).expect("serialize request");

        assert_eq!(json["generationConfig"]["responseMimeType"], "text/plain");
        assert!(json["generationConfig"].get("responseSchema").is_none());
        let instruction = json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .expect("system instruction text");
        assert!(instruction.contains("Target: English."));
    }

    #[test]
    fn dual_instruction_names_both_languages() {
        let body = GeminiTranslator::request_body("hola", TranslationMode::Dual);
        let json = serde_json::to_value(&body).expect("serialize request");
        let instruction = json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .expect("system instruction text");
        assert!(instruction.contains("Both English and Japanese"));
    }

    #[test]
    fn reply_text_parts_are_joined() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "chat" }] }
            }]
        }"#;
        let reply: GenerateContentResponse = serde_json::from_str(raw).expect("decode reply");
        let text = reply
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        assert_eq!(text, "Hello chat");
    }
}
