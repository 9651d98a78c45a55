use thiserror::Error;

use crate::insight::InsightConfig;

pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub insight: InsightConfig,
}

impl AppConfig {
    /// Reads settings from the process environment; `dotenvy::var` also loads `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| dotenvy::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("DEEPSEEK_API_KEY")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing {
                var: "DEEPSEEK_API_KEY",
            })?;

        let api_url = lookup("DEEPSEEK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let model = lookup("DEEPSEEK_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let port = match lookup("PORT") {
            Some(value) => parse_var("PORT", &value)?,
            None => DEFAULT_PORT,
        };

        let mut insight = InsightConfig::new(api_url, api_key, model);
        if let Some(value) = lookup("INSIGHT_TIMEOUT_MS") {
            insight = insight.with_timeout_ms(parse_var("INSIGHT_TIMEOUT_MS", &value)?);
        }

        Ok(Self { port, insight })
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var,
        reason: format!("{value:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn applies_defaults_when_only_key_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[("DEEPSEEK_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.insight.api_url(), DEFAULT_API_URL);
        assert_eq!(config.insight.model(), DEFAULT_MODEL);
        assert_eq!(config.insight.timeout_ms(), None);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DEEPSEEK_API_KEY", "sk-test"),
            ("DEEPSEEK_API_URL", "http://127.0.0.1:9/v1/chat"),
            ("DEEPSEEK_MODEL", "deepseek-reasoner"),
            ("INSIGHT_TIMEOUT_MS", "1500"),
            ("PORT", "8081"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.insight.api_url(), "http://127.0.0.1:9/v1/chat");
        assert_eq!(config.insight.model(), "deepseek-reasoner");
        assert_eq!(config.insight.timeout_ms(), Some(1500));
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "8081")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                var: "DEEPSEEK_API_KEY"
            }
        );
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        let err = AppConfig::from_lookup(lookup_from(&[("DEEPSEEK_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DEEPSEEK_API_KEY", "sk-test"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }
}
