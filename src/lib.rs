pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod server;

pub use config::{Config, GeminiConfig, ServerConfig};
pub use error::{GenerationError, Result};
pub use gemini::{ContentGenerator, GeminiClient, ImageClient};
pub use models::*;
pub use server::AppState;
