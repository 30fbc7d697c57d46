use crate::domain::quote::FeeSchedule;
use crate::error::{ReconcileError, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Base URL of the escrow backend, without a trailing slash.
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Wait before the single post-redirect verification attempt.
    pub auto_verify_delay: Duration,
    pub fees: FeeSchedule,
    /// Name shown on the hosted checkout.
    pub merchant_name: String,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            auto_verify_delay: Duration::from_millis(1000),
            fees: FeeSchedule::default(),
            merchant_name: "Vision Match".to_string(),
        }
    }
}

impl ReconcilerConfig {
    /// Reads `ESCROW_API_URL`, `ESCROW_HTTP_TIMEOUT_SECS` and
    /// `ESCROW_AUTO_VERIFY_DELAY_MS`, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("ESCROW_API_URL") {
            config = config.with_api_base_url(url)?;
        }
        if let Some(secs) = lookup("ESCROW_HTTP_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse_number("ESCROW_HTTP_TIMEOUT_SECS", &secs)?);
        }
        if let Some(ms) = lookup("ESCROW_AUTO_VERIFY_DELAY_MS") {
            config.auto_verify_delay =
                Duration::from_millis(parse_number("ESCROW_AUTO_VERIFY_DELAY_MS", &ms)?);
        }

        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ReconcileError::Config(format!(
                "API URL must start with http:// or https://, got '{}'",
                url
            )));
        }
        self.api_base_url = trimmed.to_string();
        Ok(self)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ReconcileError::Config(format!("{} must be a number, got '{}'", key, value)))
}
