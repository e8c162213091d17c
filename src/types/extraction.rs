use image::RgbImage;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::NexusError;

/// One side of the identity document, decoded to 8-bit RGB.
#[derive(Debug, Clone)]
pub struct DocumentImage {
    pub filename: String,
    pub pixels: RgbImage,
}

/// The five fields read off a document. Values are kept exactly as the model returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_of_birth: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub document_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
}

impl ExtractedFields {
    /// Decode model output: strip code fences, then require a JSON object.
    pub fn from_model_text(text: &str) -> Result<Self, NexusError> {
        let cleaned = strip_code_fence(text);
        let value: Value = serde_json::from_str(&cleaned)?;
        if !value.is_object() {
            return Err(NexusError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Remove markdown code-fence markers anywhere in the text and trim the rest.
pub fn strip_code_fence(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

// null -> "", numbers/bools -> their text; arrays and objects are rejected.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string field, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_is_decoded() {
        let text = "```json\n{\"full_name\":\"A B\",\"gender\":\"M\",\"date_of_birth\":\"1990-01-01\",\"document_number\":\"123\",\"address\":\"X\"}\n```";
        let fields = ExtractedFields::from_model_text(text).unwrap();
        assert_eq!(fields.full_name, "A B");
        assert_eq!(fields.date_of_birth, "1990-01-01");
        assert_eq!(fields.document_number, "123");
    }

    #[test]
    fn missing_null_and_numeric_values_are_tolerated() {
        let fields = ExtractedFields::from_model_text(
            r#"{"full_name": null, "document_number": 123456789012, "gender": "F"}"#,
        )
        .unwrap();
        assert_eq!(fields.full_name, "");
        assert_eq!(fields.document_number, "123456789012");
        assert_eq!(fields.address, "");
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(matches!(
            ExtractedFields::from_model_text("Sorry, I cannot read this card."),
            Err(NexusError::Json(_))
        ));
        assert!(matches!(
            ExtractedFields::from_model_text("[1, 2]"),
            Err(NexusError::NotAnObject)
        ));
        assert!(matches!(
            ExtractedFields::from_model_text(r#"{"address": {"line1": "X"}}"#),
            Err(NexusError::Json(_))
        ));
    }

    #[test]
    fn strip_code_fence_leaves_plain_json_alone() {
        assert_eq!(strip_code_fence("  {\"a\":1}\n"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }
}
