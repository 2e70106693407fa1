use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_WEBHOOK_ADDR: &str = "0.0.0.0:8443";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("{name} must be set")]
  Missing { name: &'static str },
  #[error("{name} has invalid value {value:?}: {reason}")]
  Invalid {
    name: &'static str,
    value: String,
    reason: String,
  },
}

#[derive(Debug, Clone)]
pub struct Config {
  pub bot_token: String,
  pub weather_api_key: String,
  pub maps_api_key: String,
  pub webhook: Option<WebhookConfig>,
  pub http_timeout: Duration,
  pub pending_ttl: Option<Duration>,
  pub geocoding_url: String,
  pub weather_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
  pub url: Url,
  pub addr: SocketAddr,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_vars(|name| env::var(name).ok())
  }

  pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let bot_token = var("BOT_TOKEN")
      .or_else(|| var("TELOXIDE_TOKEN"))
      .or_else(|| var("TOKEN"))
      .ok_or(ConfigError::Missing { name: "BOT_TOKEN" })?;
    let weather_api_key = var("WEATHER_API_KEY")
      .or_else(|| var("API_TOKEN"))
      .ok_or(ConfigError::Missing {
        name: "WEATHER_API_KEY",
      })?;
    let maps_api_key = var("MAPS_API_KEY")
      .or_else(|| var("MAPS_API_TOKEN"))
      .ok_or(ConfigError::Missing { name: "MAPS_API_KEY" })?;

    let webhook = match var("WEBHOOK_URL") {
      None => None,
      Some(raw) => {
        let url = Url::parse(&raw).map_err(|err| ConfigError::Invalid {
          name: "WEBHOOK_URL",
          value: raw.clone(),
          reason: err.to_string(),
        })?;
        let addr_raw = var("WEBHOOK_ADDR").unwrap_or_else(|| DEFAULT_WEBHOOK_ADDR.to_string());
        let addr = addr_raw.parse::<SocketAddr>().map_err(|err| ConfigError::Invalid {
          name: "WEBHOOK_ADDR",
          value: addr_raw.clone(),
          reason: err.to_string(),
        })?;
        Some(WebhookConfig { url, addr })
      },
    };

    let http_timeout = match var("HTTP_TIMEOUT_SECS") {
      None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
      Some(raw) => parse_secs("HTTP_TIMEOUT_SECS", &raw)?,
    };
    let pending_ttl = var("PENDING_TTL_SECS")
      .map(|raw| parse_secs("PENDING_TTL_SECS", &raw))
      .transpose()?;

    Ok(Self {
      bot_token,
      weather_api_key,
      maps_api_key,
      webhook,
      http_timeout,
      pending_ttl,
      geocoding_url: var("GEOCODING_URL").unwrap_or_else(|| DEFAULT_GEOCODING_URL.to_string()),
      weather_url: var("WEATHER_URL").unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
    })
  }
}

fn parse_secs(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
  let invalid = |reason: &str| ConfigError::Invalid {
    name,
    value: raw.to_string(),
    reason: reason.to_string(),
  };
  let secs = raw.parse::<u64>().map_err(|err| invalid(&err.to_string()))?;
  if secs == 0 {
    return Err(invalid("must be greater than zero"));
  }
  Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;
  use std::time::Duration;

  use super::Config;
  use super::ConfigError;
  use super::DEFAULT_GEOCODING_URL;
  use super::parse_secs;

  fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Config::from_vars(|name| vars.get(name).cloned())
  }

  const REQUIRED: [(&str, &str); 3] = [
    ("BOT_TOKEN", "123:abc"),
    ("WEATHER_API_KEY", "weather"),
    ("MAPS_API_KEY", "maps"),
  ];

  #[test]
  fn loads_required_values_with_defaults() {
    let config = load(&REQUIRED).unwrap();
    assert_eq!(config.bot_token, "123:abc");
    assert_eq!(config.weather_api_key, "weather");
    assert_eq!(config.maps_api_key, "maps");
    assert!(config.webhook.is_none());
    assert!(config.pending_ttl.is_none());
    assert_eq!(config.http_timeout, Duration::from_secs(10));
    assert_eq!(config.geocoding_url, DEFAULT_GEOCODING_URL);
  }

  #[test]
  fn accepts_legacy_variable_names() {
    let config = load(&[
      ("TOKEN", "tok"),
      ("API_TOKEN", "weather"),
      ("MAPS_API_TOKEN", "maps"),
    ])
    .unwrap();
    assert_eq!(config.bot_token, "tok");
    assert_eq!(config.weather_api_key, "weather");
    assert_eq!(config.maps_api_key, "maps");
  }

  #[test]
  fn missing_credentials_are_fatal() {
    let err = load(&[("BOT_TOKEN", "tok"), ("WEATHER_API_KEY", "w")]).unwrap_err();
    assert_eq!(err, ConfigError::Missing { name: "MAPS_API_KEY" });

    let err = load(&[("BOT_TOKEN", "  "), ("WEATHER_API_KEY", "w"), ("MAPS_API_KEY", "m")]).unwrap_err();
    assert_eq!(err, ConfigError::Missing { name: "BOT_TOKEN" });
  }

  #[test]
  fn webhook_mode_uses_default_bind_address() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("WEBHOOK_URL", "https://example.com/hook"));
    let webhook = load(&pairs).unwrap().webhook.unwrap();
    assert_eq!(webhook.url.as_str(), "https://example.com/hook");
    assert_eq!(webhook.addr.port(), 8443);
  }

  #[test]
  fn rejects_malformed_webhook_url() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("WEBHOOK_URL", "not a url"));
    let err = load(&pairs).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "WEBHOOK_URL", .. }));
  }

  #[test]
  fn parses_timeouts() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("HTTP_TIMEOUT_SECS", "3"));
    pairs.push(("PENDING_TTL_SECS", "600"));
    let config = load(&pairs).unwrap();
    assert_eq!(config.http_timeout, Duration::from_secs(3));
    assert_eq!(config.pending_ttl, Some(Duration::from_secs(600)));
  }

  #[test]
  fn rejects_zero_and_garbage_seconds() {
    assert!(parse_secs("HTTP_TIMEOUT_SECS", "0").is_err());
    assert!(parse_secs("HTTP_TIMEOUT_SECS", "ten").is_err());
    assert_eq!(parse_secs("HTTP_TIMEOUT_SECS", "7"), Ok(Duration::from_secs(7)));
  }
}
