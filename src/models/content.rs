use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

pub const DEFAULT_OUTPUT_MIME_TYPE: &str = "image/png";

/// One part of a `generateContent` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineData,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String, // Base64 encoded
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub role: String,
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

impl GenerateContentRequest {
    /// Wraps the parts into a single user turn.
    pub fn from_parts(parts: Vec<ContentPart>) -> Self {
        GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts,
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<ResponseInlineData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInlineData {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, alias = "mime_type")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// `None` when the provider sent an inline part without a payload.
    pub data: Option<String>,
    pub mime_type: String,
}

impl GenerateContentResponse {
    /// The first inline-data part of the first candidate, in part order.
    ///
    /// A response without `candidates[0].content.parts` is malformed and
    /// yields an error; a well-formed response with no inline part yields
    /// `Ok(None)`.
    pub fn first_inline_image(&self) -> Result<Option<GeneratedImage>> {
        let candidate = self
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .ok_or_else(|| self.missing("candidates[0]"))?;

        let parts = candidate
            .content
            .as_ref()
            .ok_or_else(|| self.missing("candidates[0].content"))?
            .parts
            .as_ref()
            .ok_or_else(|| self.missing("candidates[0].content.parts"))?;

        Ok(parts.iter().find_map(|part| {
            part.inline_data.as_ref().map(|inline| GeneratedImage {
                data: inline.data.clone(),
                mime_type: inline
                    .mime_type
                    .clone()
                    .filter(|mime| !mime.is_empty())
                    .unwrap_or_else(|| DEFAULT_OUTPUT_MIME_TYPE.to_string()),
            })
        }))
    }

    fn missing(&self, field: &str) -> GenerationError {
        let block_reason = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref());
        match block_reason {
            Some(reason) => GenerationError::ResponseError(format!(
                "response has no {field} (prompt blocked: {reason})"
            )),
            None => GenerationError::ResponseError(format!("response has no {field}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parts_serialize_in_provider_shape() {
        let request = GenerateContentRequest::from_parts(vec![
            ContentPart::text("a cat"),
            ContentPart::InlineData {
                inline_data: InlineData {
                    mime_type: "image/png".into(),
                    data: "AAAA".into(),
                },
            },
        ]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "a cat" },
                        { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn first_inline_part_wins() {
        let resp = response(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "here you go" },
                    { "inlineData": { "data": "FIRST", "mimeType": "image/webp" } },
                    { "inlineData": { "data": "SECOND", "mimeType": "image/png" } }
                ]}
            }]
        }));
        assert_eq!(
            resp.first_inline_image().unwrap(),
            Some(GeneratedImage {
                data: Some("FIRST".into()),
                mime_type: "image/webp".into()
            })
        );
    }

    #[test]
    fn missing_or_empty_mime_type_defaults_to_png() {
        let resp = response(json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": { "data": "AAAA" } }] } }]
        }));
        let image = resp.first_inline_image().unwrap().unwrap();
        assert_eq!(image.mime_type, "image/png");

        let resp = response(json!({
            "candidates": [{ "content": { "parts": [
                { "inline_data": { "data": "AAAA", "mime_type": "" } }
            ] } }]
        }));
        let image = resp.first_inline_image().unwrap().unwrap();
        assert_eq!(image.data.as_deref(), Some("AAAA"));
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn inline_part_without_data_still_counts() {
        let resp = response(json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": {} }] } }]
        }));
        assert_eq!(
            resp.first_inline_image().unwrap(),
            Some(GeneratedImage {
                data: None,
                mime_type: "image/png".into()
            })
        );
    }

    #[test]
    fn text_only_parts_yield_none() {
        let resp = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I cannot draw that" }] } }]
        }));
        assert_eq!(resp.first_inline_image().unwrap(), None);

        let resp = response(json!({ "candidates": [{ "content": { "parts": [] } }] }));
        assert_eq!(resp.first_inline_image().unwrap(), None);
    }

    #[test]
    fn only_the_first_candidate_is_scanned() {
        let resp = response(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "no image" }] } },
                { "content": { "parts": [{ "inlineData": { "data": "AAAA" } }] } }
            ]
        }));
        assert_eq!(resp.first_inline_image().unwrap(), None);
    }

    #[test]
    fn malformed_responses_are_errors() {
        let err = response(json!({})).first_inline_image().unwrap_err();
        assert_eq!(err.to_string(), "Response error: response has no candidates[0]");

        let err = response(json!({ "candidates": [] }))
            .first_inline_image()
            .unwrap_err();
        assert_eq!(err.to_string(), "Response error: response has no candidates[0]");

        let err = response(json!({ "candidates": [{ "finishReason": "SAFETY" }] }))
            .first_inline_image()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Response error: response has no candidates[0].content"
        );

        let err = response(json!({ "candidates": [{ "content": { "role": "model" } }] }))
            .first_inline_image()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Response error: response has no candidates[0].content.parts"
        );
    }

    #[test]
    fn block_reason_is_reported() {
        let err = response(json!({ "promptFeedback": { "blockReason": "PROHIBITED_CONTENT" } }))
            .first_inline_image()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Response error: response has no candidates[0] (prompt blocked: PROHIBITED_CONTENT)"
        );
    }
}
