use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use tracing::instrument;

use super::Geocoder;
use super::UpstreamError;
use crate::models::ResolvedLocation;
use crate::util::encode_query_value;
use crate::util::truncate_body;

/// Google Maps Geocoding API client.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
  http: Client,
  endpoint: String,
  api_key: String,
}

impl GoogleGeocoder {
  pub fn new(http: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      http,
      endpoint: endpoint.into(),
      api_key: api_key.into(),
    }
  }

  fn request_url(&self, address: &str) -> String {
    format!(
      "{}?address={}&key={}",
      self.endpoint,
      encode_query_value(address),
      encode_query_value(&self.api_key),
    )
  }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
  #[instrument(skip(self))]
  async fn geocode(&self, address: &str) -> Result<ResolvedLocation, UpstreamError> {
    let res = self.http.get(self.request_url(address)).send().await?;
    let status = res.status();
    let body = res.text().await?;
    debug!(%status, bytes = body.len(), "geocoding response received");
    decode_response(status, &body)
  }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
  status: String,
  #[serde(default)]
  error_message: Option<String>,
  #[serde(default)]
  results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
  formatted_address: String,
  geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
  location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
  lat: f64,
  lng: f64,
}

fn decode_response(status: StatusCode, body: &str) -> Result<ResolvedLocation, UpstreamError> {
  if !status.is_success() {
    let message = serde_json::from_str::<GeocodeResponse>(body)
      .ok()
      .and_then(|parsed| parsed.error_message)
      .unwrap_or_else(|| truncate_body(body));
    return Err(UpstreamError::Status {
      status: status.as_u16(),
      message,
    });
  }

  let parsed: GeocodeResponse = serde_json::from_str(body)?;
  match parsed.status.as_str() {
    "OK" => {},
    "ZERO_RESULTS" => return Err(UpstreamError::NoResults),
    other => {
      return Err(UpstreamError::Status {
        status: status.as_u16(),
        message: parsed.error_message.unwrap_or_else(|| other.to_string()),
      });
    },
  }

  let first = parsed.results.into_iter().next().ok_or(UpstreamError::NoResults)?;
  Ok(ResolvedLocation {
    formatted_address: first.formatted_address,
    latitude: first.geometry.location.lat,
    longitude: first.geometry.location.lng,
  })
}
