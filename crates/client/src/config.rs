use anyhow::{Context, Result};
use domain::PlaceRule;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    /// `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
    pub place_rule: PlaceRule,
}

impl ClientConfig {
    /// Reads `RACE_API_URL`, `RACE_API_TIMEOUT_SECS` and `RACE_PLACE_RULE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("RACE_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = lookup("RACE_API_TIMEOUT_SECS")
            .map(|secs| {
                secs.trim()
                    .parse::<u64>()
                    .context("RACE_API_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?
            .map(Duration::from_secs);

        let place_rule = lookup("RACE_PLACE_RULE")
            .map(|rule| rule.parse::<PlaceRule>().map_err(anyhow::Error::msg))
            .transpose()
            .context("Cannot load RACE_PLACE_RULE env variable")?
            .unwrap_or_default();

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
            place_rule,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
            place_rule: PlaceRule::default(),
        }
    }
}
