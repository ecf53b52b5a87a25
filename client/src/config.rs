use std::env;

use reqwest::Url;
use shared_libs::json_templates::PAGE_SIZE;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.unsplash.com";

/// Checked in order, the second name is what older deployments of the gallery used.
const API_KEY_VARS: [&str; 2] = ["UNSPLASH_ACCESS_KEY", "REACT_APP_UNSPLASH_ACCESS_KEY"];
const API_URL_VAR: &str = "UNSPLASH_API_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no api key configured, set {} in the environment or a .env file", API_KEY_VARS[0])]
    MissingApiKey,
    #[error("invalid api url {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The access key sent as `client_id` on every request
    pub api_key: String,
    /// The root of the photo api, requests are made relative to this
    pub api_base_url: Url,
    /// The number of photos requested per gallery page
    pub page_size: u32,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Config {
        Config {
            api_key: api_key.into(),
            // constant, always parses
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default api url is valid"),
            page_size: PAGE_SIZE,
        }
    }

    /// Load the configuration from the process environment, reading a `.env` file first if present.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        Config::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let config = Config::new(api_key);
        match lookup(API_URL_VAR) {
            Some(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
            _ => Ok(config),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Config, ConfigError> {
        let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidApiUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidApiUrl {
                url: url.to_string(),
                reason: String::from("expected an http(s) base url"),
            });
        }

        self.api_base_url = parsed;
        Ok(self)
    }

    pub fn with_page_size(mut self, page_size: u32) -> Config {
        self.page_size = page_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_unsplash_and_twelve_per_page() {
        let config = Config::new("key");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.api_base_url.as_str(), "https://api.unsplash.com/");
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn missing_key_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert_eq!(result, Err(ConfigError::MissingApiKey));

        let result = Config::from_lookup(lookup_from(&[("UNSPLASH_ACCESS_KEY", "   ")]));
        assert_eq!(result, Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn falls_back_to_legacy_key_name() {
        let config =
            Config::from_lookup(lookup_from(&[("REACT_APP_UNSPLASH_ACCESS_KEY", "legacy")])).unwrap();
        assert_eq!(config.api_key, "legacy");
    }

    #[test]
    fn primary_key_wins() {
        let config = Config::from_lookup(lookup_from(&[
            ("UNSPLASH_ACCESS_KEY", "primary"),
            ("REACT_APP_UNSPLASH_ACCESS_KEY", "legacy"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "primary");
    }

    #[test]
    fn api_url_override() {
        let config = Config::from_lookup(lookup_from(&[
            ("UNSPLASH_ACCESS_KEY", "k"),
            ("UNSPLASH_API_URL", "http://127.0.0.1:3030"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:3030/");
    }

    #[test]
    fn rejects_non_http_url() {
        let err = Config::new("k").with_base_url("mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl { .. }));

        let err = Config::new("k").with_base_url("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl { .. }));
    }

    #[test]
    fn page_size_is_at_least_one() {
        assert_eq!(Config::new("k").with_page_size(0).page_size, 1);
    }
}
