use std::env;
use std::time::Duration;

pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Include the underlying error text as `details` in 500 responses.
    pub expose_error_details: bool,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        GeminiConfig {
            api_key: non_empty("GOOGLE_AI_API_KEY").or_else(|| non_empty("GEMINI_API_KEY")),
            base_url: non_empty("GEMINI_API_BASE").unwrap_or(defaults.base_url),
            model: non_empty("GEMINI_IMAGE_MODEL").unwrap_or(defaults.model),
            timeout: non_empty("GEMINI_TIMEOUT_SECS")
                .and_then(|secs| secs.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            expose_error_details: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        ServerConfig {
            host: lookup("HOST")
                .filter(|host| !host.trim().is_empty())
                .unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|port| port.trim().parse().ok())
                .unwrap_or(defaults.port),
            expose_error_details: lookup("EXPOSE_ERROR_DETAILS")
                .map_or(defaults.expose_error_details, |val| {
                    !matches!(val.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no")
                }),
            max_body_bytes: lookup("MAX_BODY_BYTES")
                .and_then(|bytes| bytes.trim().parse().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_error_details(mut self, enabled: bool) -> Self {
        self.expose_error_details = enabled;
        self
    }

    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            server: ServerConfig::from_env(),
            gemini: GeminiConfig::from_env(),
        }
    }

    pub fn with_server(mut self, config: ServerConfig) -> Self {
        self.server = config;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn defaults_use_the_image_preview_model() {
        let config = Config::new();
        assert_eq!(config.gemini.model, "gemini-2.5-flash-image-preview");
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.server.port, 3000);
        assert!(config.server.expose_error_details);
    }

    #[test]
    fn api_key_prefers_google_ai_variable() {
        let vars = HashMap::from([("GOOGLE_AI_API_KEY", "primary"), ("GEMINI_API_KEY", "secondary")]);
        let config = GeminiConfig::from_lookup(lookup(&vars));
        assert_eq!(config.api_key.as_deref(), Some("primary"));

        let vars = HashMap::from([("GOOGLE_AI_API_KEY", "  "), ("GEMINI_API_KEY", "secondary")]);
        let config = GeminiConfig::from_lookup(lookup(&vars));
        assert_eq!(config.api_key.as_deref(), Some("secondary"));
    }

    #[test]
    fn gemini_overrides_and_bad_timeout() {
        let vars = HashMap::from([
            ("GEMINI_API_BASE", "http://127.0.0.1:9999"),
            ("GEMINI_IMAGE_MODEL", "gemini-2.5-flash-image"),
            ("GEMINI_TIMEOUT_SECS", "soon"),
        ]);
        let config = GeminiConfig::from_lookup(lookup(&vars));
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.model, "gemini-2.5-flash-image");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn server_config_from_lookup() {
        let vars = HashMap::from([
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("EXPOSE_ERROR_DETAILS", "False"),
            ("MAX_BODY_BYTES", "1048576"),
        ]);
        let config = ServerConfig::from_lookup(lookup(&vars));
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert!(!config.expose_error_details);

        let vars = HashMap::from([("PORT", "not-a-port")]);
        let config = ServerConfig::from_lookup(lookup(&vars));
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.expose_error_details);
    }

    #[test]
    fn builders_chain() {
        let config = Config::new()
            .with_server(ServerConfig::new().with_host("localhost").with_port(4000))
            .with_gemini(GeminiConfig::new().with_api_key("key").with_model("m"));
        assert_eq!(config.bind_address(), ("localhost".to_string(), 4000));
        assert_eq!(config.gemini.api_key.as_deref(), Some("key"));
        assert_eq!(config.gemini.model, "m");
    }
}
