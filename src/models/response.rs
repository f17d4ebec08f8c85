use serde::{Deserialize, Serialize};

use crate::models::content::GeneratedImage;

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const NO_IMAGE_GENERATED: &str = "No image generated";
pub const GENERATION_FAILED: &str = "Failed to generate image";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>, // Base64 encoded
    pub mime_type: String,
}

impl From<GeneratedImage> for ImageGenerationResponse {
    fn from(image: GeneratedImage) -> Self {
        ImageGenerationResponse {
            success: true,
            image: image.data,
            mime_type: image.mime_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
