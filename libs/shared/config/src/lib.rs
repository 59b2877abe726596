use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_anon_key: String,
    pub api_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("API_BASE_URL not set, using empty value");
                    String::new()
                }),
            api_anon_key: env::var("API_ANON_KEY")
                .unwrap_or_else(|_| {
                    warn!("API_ANON_KEY not set, using empty value");
                    String::new()
                }),
            api_timeout_secs: env::var("API_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_else(|| {
                    warn!("API_TIMEOUT_SECS not set or invalid, using default");
                    30
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }
}
