use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Finish reasons returned by `generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum FinishReason {
    FINISH_REASON_UNSPECIFIED,
    STOP,
    MAX_TOKENS,
    SAFETY,
    RECITATION,
    LANGUAGE,
    OTHER,
    BLOCKLIST,
    PROHIBITED_CONTENT,
    SPII,
    MALFORMED_FUNCTION_CALL,
    IMAGE_SAFETY,
    #[serde(other)]
    UNKNOWN,
}

/// Base64 image payload sent inline with the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct InlineData {
    pub mimeType: String,
    pub data: String,
}

/// One part of a turn: text or inline image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inlineData: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inlineData: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: String) -> Self {
        Self {
            text: None,
            inlineData: Some(InlineData {
                mimeType: mime_type.into(),
                data,
            }),
        }
    }
}

/// Chat content payload, used both in requests and in candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[allow(non_snake_case)]
pub struct GenerationConfig {
    pub responseMimeType: String,
}

/// `generateContent` request body.
#[derive(Debug, Clone, Serialize)]
#[allow(non_snake_case)]
pub struct GenerateContentRequest {
    pub contents: Vec<Chat>,
    pub generationConfig: GenerationConfig,
}

/// Response candidate wrapper.
#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Chat>,
    #[serde(default)]
    pub finishReason: Option<FinishReason>,
}

/// `generateContent` response payload.
#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usageMetadata: Option<Value>,
    #[serde(default)]
    pub modelVersion: Option<String>,
    #[serde(default)]
    pub promptFeedback: Option<Value>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate, if it has any.
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }

    /// Finish reason of the first candidate, or the prompt block reason, for diagnostics.
    pub fn finish_reason(&self) -> String {
        if let Some(reason) = self
            .candidates
            .first()
            .and_then(|c| c.finishReason.as_ref())
        {
            return format!("{reason:?}");
        }
        self.promptFeedback
            .as_ref()
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
            .unwrap_or("none")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_text_joins_parts_of_first_candidate() {
        let resp: GeminiResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]}, "finishReason": "STOP"},
                    {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
                ],
                "modelVersion": "gemini-flash-latest"
            }"#,
        )
        .unwrap();
        assert_eq!(resp.first_text().as_deref(), Some("{\"a\":1}"));
        assert_eq!(resp.finish_reason(), "STOP");
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let resp: GeminiResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(resp.first_text(), None);
        assert_eq!(resp.finish_reason(), "SAFETY");
    }

    #[test]
    fn unknown_finish_reason_still_decodes() {
        let resp: GeminiResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": []}, "finishReason": "SOMETHING_NEW"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.first_text(), None);
        assert_eq!(resp.candidates[0].finishReason, Some(FinishReason::UNKNOWN));
    }

    #[test]
    fn request_serializes_in_wire_casing() {
        let req = GenerateContentRequest {
            contents: vec![Chat {
                role: "user".to_string(),
                parts: vec![Part::text("hi"), Part::inline("image/png", "AAAA".to_string())],
            }],
            generationConfig: GenerationConfig {
                responseMimeType: "application/json".to_string(),
            },
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["contents"][0]["parts"][0], serde_json::json!({"text": "hi"}));
        assert_eq!(
            v["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(v["generationConfig"]["responseMimeType"], "application/json");
    }
}
