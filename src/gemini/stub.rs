use crate::{
    error::{GenerationError, Result},
    gemini::ContentGenerator,
    models::{ContentPart, GenerateContentResponse},
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

type Reply = Box<dyn Fn() -> Result<GenerateContentResponse> + Send + Sync>;

/// In-memory provider that records every call.
pub(crate) struct StubGenerator {
    reply: Reply,
    calls: Mutex<Vec<(String, Vec<ContentPart>)>>,
}

impl StubGenerator {
    pub(crate) fn responding(body: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(move || -> Result<GenerateContentResponse> {
                Ok(serde_json::from_value(body.clone())?)
            }),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn failing(error: fn() -> GenerationError) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(move || -> Result<GenerateContentResponse> { Err(error()) }),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<ContentPart>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate_content(
        &self,
        model: &str,
        parts: Vec<ContentPart>,
    ) -> Result<GenerateContentResponse> {
        self.calls.lock().unwrap().push((model.to_string(), parts));
        (self.reply)()
    }
}
