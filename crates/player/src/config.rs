//! Front-end configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const API_URL_VAR: &str = "CHESS_API_URL";
pub const TIMEOUT_VAR: &str = "CHESS_API_TIMEOUT_SECS";
pub const OPPONENT_NAME_VAR: &str = "OPPONENT_NAME";

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_OPPONENT_NAME: &str = "LLaMA 3";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the remote chess service, without a trailing slash
    pub api_url: String,

    /// Upper bound on a single remote call
    pub request_timeout: Duration,

    /// Name used for the opponent in status lines
    pub opponent_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, e.g. the environment with CLI
    /// overrides layered on top.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(API_URL_VAR))?;
        let api_url = normalize_base_url(&raw_url)?;

        let request_timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid(TIMEOUT_VAR, raw.clone()))?;
                if secs == 0 {
                    return Err(ConfigError::Invalid(TIMEOUT_VAR, raw));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let opponent_name = lookup(OPPONENT_NAME_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_OPPONENT_NAME.to_string());

        Ok(Self {
            api_url,
            request_timeout,
            opponent_name,
        })
    }
}

/// Check the URL is absolute http(s) and strip trailing slashes so endpoint
/// paths can be appended directly.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = reqwest::Url::parse(trimmed)
        .map_err(|_| ConfigError::Invalid(API_URL_VAR, raw.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid(API_URL_VAR, raw.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[(API_URL_VAR, "http://localhost:8080")])).unwrap();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.opponent_name, "LLaMA 3");
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = Config::from_lookup(lookup(&[(API_URL_VAR, " https://chess.example.com/api/ ")])).unwrap();
        assert_eq!(config.api_url, "https://chess.example.com/api");
    }

    #[test]
    fn test_missing_url() {
        assert!(matches!(
            Config::from_lookup(lookup(&[])),
            Err(ConfigError::Missing(API_URL_VAR))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(API_URL_VAR, "  ")])),
            Err(ConfigError::Missing(API_URL_VAR))
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(API_URL_VAR, "not a url")])),
            Err(ConfigError::Invalid(API_URL_VAR, _))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(API_URL_VAR, "ftp://example.com")])),
            Err(ConfigError::Invalid(API_URL_VAR, _))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(API_URL_VAR, "http://x"), (TIMEOUT_VAR, "soon")])),
            Err(ConfigError::Invalid(TIMEOUT_VAR, _))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(API_URL_VAR, "http://x"), (TIMEOUT_VAR, "0")])),
            Err(ConfigError::Invalid(TIMEOUT_VAR, _))
        ));
    }

    #[test]
    fn test_from_env() {
        // only this test touches the process environment
        std::env::set_var(API_URL_VAR, "http://localhost:9000/");
        std::env::set_var(OPPONENT_NAME_VAR, "Mistral");
        std::env::remove_var(TIMEOUT_VAR);

        let config = Config::from_env().unwrap();
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.opponent_name, "Mistral");
        assert_eq!(config.request_timeout, Duration::from_secs(120));

        std::env::remove_var(API_URL_VAR);
        assert!(matches!(Config::from_env(), Err(ConfigError::Missing(API_URL_VAR))));
        std::env::remove_var(OPPONENT_NAME_VAR);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (API_URL_VAR, "http://x"),
            (TIMEOUT_VAR, "15"),
            (OPPONENT_NAME_VAR, "Hermes"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.opponent_name, "Hermes");
    }
}
