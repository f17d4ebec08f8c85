use crate::{
    error::Result,
    gemini::ContentGenerator,
    logger,
    models::{ContentPart, GeneratedImage},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct ImageClient {
    generator: Arc<dyn ContentGenerator>,
    model: String,
}

impl ImageClient {
    pub fn new(generator: Arc<dyn ContentGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One `generateContent` round trip. `Ok(None)` means the provider
    /// answered but returned no inline image.
    pub async fn generate(&self, contents: Vec<ContentPart>) -> Result<Option<GeneratedImage>> {
        log::info!(
            "Generating image with model: {} ({} part(s))",
            self.model,
            contents.len()
        );

        let response = {
            let _timer = logger::timer(format!("generateContent {}", self.model));
            self.generator.generate_content(&self.model, contents).await?
        };

        let image = response.first_inline_image()?;
        match &image {
            Some(image) => log::debug!(
                "Received {} image ({} base64 chars)",
                image.mime_type,
                image.data.as_ref().map_or(0, String::len)
            ),
            None => log::warn!("Model {} returned no inline image", self.model),
        }
        Ok(image)
    }
}
