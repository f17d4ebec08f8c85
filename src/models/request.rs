use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::content::{ContentPart, InlineData};

pub const DEFAULT_INPUT_MIME_TYPE: &str = "image/jpeg";

static DATA_URL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/[a-z]+;base64,").unwrap());

/// Body accepted by the image generation endpoint. Both naming conventions
/// are accepted; see [`GenerationRequest::prompt`] and
/// [`GenerationRequest::image`] for precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub prompt_text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_base64: Option<String>,
}

impl GenerationRequest {
    /// Parses a raw request body. An empty body, or any JSON value that is
    /// not an object (`null`, arrays, scalars), is an empty request rather
    /// than an error.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        match serde_json::from_slice::<Value>(body)? {
            object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
            _ => Ok(Self::default()),
        }
    }

    pub fn prompt(&self) -> Option<&str> {
        resolve_alias(self.prompt.as_deref(), self.prompt_text.as_deref())
    }

    pub fn image(&self) -> Option<&str> {
        resolve_alias(self.image.as_deref(), self.image_base64.as_deref())
    }

    /// Ordered provider contents: the prompt text, then the image if any.
    /// Returns `None` when no prompt survives alias resolution.
    pub fn to_contents(&self) -> Option<Vec<ContentPart>> {
        let prompt = self.prompt()?;
        let mut contents = vec![ContentPart::text(prompt)];
        if let Some(image) = self.image() {
            contents.push(ImagePayload::from_image(image).into());
        }
        Some(contents)
    }
}

/// `primary` when it is present and non-empty, otherwise `fallback` under the
/// same condition.
pub fn resolve_alias<'a>(primary: Option<&'a str>, fallback: Option<&'a str>) -> Option<&'a str> {
    primary
        .filter(|value| !value.is_empty())
        .or_else(|| fallback.filter(|value| !value.is_empty()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

impl ImagePayload {
    /// Splits a raw base64 string or data URL into mime type and payload.
    ///
    /// The two halves are derived independently: any `data:` prefix yields a
    /// mime type, but only `data:image/<lowercase>;base64,` is stripped from
    /// the payload. `data:application/pdf;base64,...` therefore keeps its
    /// prefix in `data` while reporting `application/pdf`.
    pub fn from_image(image: &str) -> Self {
        ImagePayload {
            mime_type: detect_mime_type(image),
            data: DATA_URL_PREFIX.replace(image, "").into_owned(),
        }
    }
}

fn detect_mime_type(image: &str) -> String {
    if !image.starts_with("data:") {
        return DEFAULT_INPUT_MIME_TYPE.to_string();
    }
    image
        .split(';')
        .next()
        .and_then(|header| header.split(':').nth(1))
        .unwrap_or_default()
        .to_string()
}

impl From<ImagePayload> for ContentPart {
    fn from(payload: ImagePayload) -> Self {
        ContentPart::InlineData {
            inline_data: InlineData {
                mime_type: payload.mime_type,
                data: payload.data,
            },
        }
    }
}
