//! Runtime configuration from the environment.

use anyhow::{Context, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absent in offline modes; `require_api_key` gates dispatch.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl AppConfig {
    /// Read configuration from the environment, loading a `.env` file when
    /// one is present. A model passed on the command line wins over the
    /// environment, which wins over the default.
    pub fn from_env(model_override: Option<String>) -> Self {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        let model = model_override
            .or_else(|| std::env::var("OPENAI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            api_key,
            model,
            base_url,
        }
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("OPENAI_API_KEY is not set")
    }
}
