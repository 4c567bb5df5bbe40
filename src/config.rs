use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BACKEND_URL must be set")]
    MissingBackendUrl,
}

/// Runtime settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub backend_url: String,
    pub backend_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url =
            std::env::var("BACKEND_URL").map_err(|_| ConfigError::MissingBackendUrl)?;
        let backend_api_key = std::env::var("BACKEND_API_KEY").ok();
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        Ok(Self {
            port,
            backend_url,
            backend_api_key,
        })
    }
}
