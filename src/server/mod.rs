pub mod handler;

use crate::{
    config::Config,
    error::Result,
    gemini::{GeminiClient, ImageClient},
};
use actix_web::{web, App, HttpServer};
use std::sync::Arc;

pub use handler::generate_image;

pub const GENERATE_IMAGE_PATH: &str = "/api/generate-image";

/// Read-only state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub images: ImageClient,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(images: ImageClient) -> Self {
        Self {
            images,
            expose_error_details: true,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let gemini = GeminiClient::new(config.gemini.clone())?;
        let model = gemini.config().model.clone();
        let images = ImageClient::new(Arc::new(gemini), model);
        Ok(Self::new(images).with_error_details(config.server.expose_error_details))
    }

    pub fn with_error_details(mut self, enabled: bool) -> Self {
        self.expose_error_details = enabled;
        self
    }
}

/// Every method is routed to the handler so that it can answer 405 itself.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(GENERATE_IMAGE_PATH, web::route().to(handler::generate_image));
}

pub async fn run(config: Config) -> Result<()> {
    let state = web::Data::new(AppState::from_config(&config)?);
    let payload_limit = config.server.max_body_bytes;

    log::info!(
        "🖼️  Serving {} with model {}",
        GENERATE_IMAGE_PATH,
        state.images.model()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(payload_limit))
            .configure(configure)
    })
    .bind(config.bind_address())?
    .run()
    .await?;

    log::info!("👋 Server stopped");
    Ok(())
}
