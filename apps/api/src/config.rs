use std::str::FromStr;

use anyhow::{Context, Result};

use crate::llm_client::{
    LlmConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// A missing API key is allowed at startup; analysis requests then fail with
/// a configuration error.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Config {
            llm: LlmConfig {
                api_key: var("NVIDIA_API_KEY"),
                base_url: var("NVIDIA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: var("NVIDIA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout_secs: parse_or(
                    var("LLM_TIMEOUT_SECS"),
                    "LLM_TIMEOUT_SECS",
                    DEFAULT_TIMEOUT_SECS,
                )?,
                max_retries: parse_or(
                    var("LLM_MAX_RETRIES"),
                    "LLM_MAX_RETRIES",
                    DEFAULT_MAX_RETRIES,
                )?,
            },
            port: parse_or(var("PORT"), "PORT", DEFAULT_PORT)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: parse_or(
                var("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_any_variables() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_upload_bytes, 10_485_760);
        assert_eq!(config.llm.base_url, "https://integrate.api.nvidia.com/v1");
        assert_eq!(config.llm.model, "nvidia/llama-3.3-nemotron-super-49b-v1.5");
        assert_eq!(config.llm.timeout_secs, 60);
        assert_eq!(config.llm.max_retries, 2);
        assert!(config.llm.api_key.is_none());
        assert!(!config.llm.is_configured());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            ("NVIDIA_API_KEY", "nvapi-123"),
            ("NVIDIA_BASE_URL", "http://localhost:9000/v1"),
            ("NVIDIA_MODEL", "local/model"),
            ("LLM_TIMEOUT_SECS", "15"),
            ("LLM_MAX_RETRIES", "0"),
            ("PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("nvapi-123"));
        assert_eq!(config.llm.base_url, "http://localhost:9000/v1");
        assert_eq!(config.llm.model, "local/model");
        assert_eq!(config.llm.timeout_secs, 15);
        assert_eq!(config.llm.max_retries, 0);
        assert_eq!(config.port, 3000);
        assert!(config.llm.is_configured());
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = config_from(&[("NVIDIA_API_KEY", "  ")]).unwrap();
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_malformed_number_names_the_variable() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT must be a valid number"));

        let err = config_from(&[("LLM_TIMEOUT_SECS", "-1")]).unwrap_err();
        assert!(err.to_string().contains("LLM_TIMEOUT_SECS"));
    }
}
