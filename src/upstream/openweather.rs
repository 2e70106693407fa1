use async_trait::async_trait;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use tracing::instrument;

use super::UpstreamError;
use super::WeatherSource;
use crate::models::WeatherReport;
use crate::util::truncate_body;

/// OpenWeather "current weather" client, metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
  http: Client,
  endpoint: String,
  api_key: String,
}

impl OpenWeatherClient {
  pub fn new(http: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      http,
      endpoint: endpoint.into(),
      api_key: api_key.into(),
    }
  }

  fn request(&self, latitude: f64, longitude: f64) -> RequestBuilder {
    let lat = latitude.to_string();
    let lon = longitude.to_string();
    self.http.get(&self.endpoint).query(&[
      ("lat", lat.as_str()),
      ("lon", lon.as_str()),
      ("appid", self.api_key.as_str()),
      ("units", "metric"),
    ])
  }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
  #[instrument(skip(self))]
  async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherReport, UpstreamError> {
    let res = self.request(latitude, longitude).send().await?;
    let status = res.status();
    let body = res.text().await?;
    debug!(%status, bytes = body.len(), "weather response received");
    decode_response(status, &body)
  }
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
  weather: Vec<OwWeather>,
  main: OwMain,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
  description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
  temp: f64,
  #[serde(default)]
  feels_like: Option<f64>,
  #[serde(default)]
  humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
  message: String,
}

fn decode_response(status: StatusCode, body: &str) -> Result<WeatherReport, UpstreamError> {
  if !status.is_success() {
    let message = serde_json::from_str::<OwErrorBody>(body)
      .map(|err| err.message)
      .unwrap_or_else(|_| truncate_body(body));
    return Err(UpstreamError::Status {
      status: status.as_u16(),
      message,
    });
  }

  let parsed: OwCurrentResponse = serde_json::from_str(body)?;
  let description = parsed
    .weather
    .into_iter()
    .next()
    .map(|w| w.description)
    .ok_or_else(|| UpstreamError::Decode("weather conditions array is empty".to_string()))?;

  Ok(WeatherReport {
    description,
    temperature_c: parsed.main.temp,
    feels_like_c: parsed.main.feels_like,
    humidity_pct: parsed.main.humidity,
  })
}
