use anyhow::Result;

/// Address the resume service listens on when nothing is configured.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

/// Application configuration loaded from environment variables.
/// Every variable has a default or is optional, so loading never fails on
/// a bare environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_url: String,
    pub api_key: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            service_url: std::env::var("RESUME_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string()),
            api_key: std::env::var("RESUME_SERVICE_API_KEY").ok(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
