//! Third-party HTTP APIs the bot depends on: address geocoding and current
//! weather conditions. Each call is attempted once; failures are returned as
//! typed errors and never panic.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::models::ResolvedLocation;
use crate::models::WeatherReport;

pub mod geocoding;
pub mod openweather;

pub use geocoding::GoogleGeocoder;
pub use openweather::OpenWeatherClient;

#[derive(Debug, Error)]
pub enum UpstreamError {
  #[error("request failed: {0}")]
  Network(#[from] reqwest::Error),
  #[error("upstream responded with status {status}: {message}")]
  Status { status: u16, message: String },
  #[error("unexpected response body: {0}")]
  Decode(String),
  #[error("no results")]
  NoResults,
}

impl From<serde_json::Error> for UpstreamError {
  fn from(err: serde_json::Error) -> Self {
    Self::Decode(err.to_string())
  }
}

#[derive(Debug, Error)]
pub enum LookupError {
  #[error("location {address:?} not found: {cause}")]
  LocationNotFound {
    address: String,
    #[source]
    cause: UpstreamError,
  },
  #[error("weather for {address:?} not found: {cause}")]
  WeatherNotFound {
    address: String,
    #[source]
    cause: UpstreamError,
  },
}

impl LookupError {
  /// Short explanation meant to be embedded in a reply sentence.
  pub fn user_message(&self) -> String {
    match self {
      Self::LocationNotFound {
        address,
        cause: UpstreamError::NoResults,
      } => format!("we could not find \"{address}\""),
      Self::LocationNotFound { cause, .. } => describe_cause("the map service", cause),
      Self::WeatherNotFound { cause, .. } => describe_cause("the weather service", cause),
    }
  }
}

fn describe_cause(service: &str, cause: &UpstreamError) -> String {
  match cause {
    UpstreamError::Network(err) if err.is_timeout() => format!("{service} took too long to answer"),
    UpstreamError::Network(_) => format!("{service} could not be reached"),
    UpstreamError::Status { message, .. } => format!("{service} said \"{message}\""),
    UpstreamError::Decode(_) => "something went wrong on our side".to_string(),
    UpstreamError::NoResults => format!("{service} returned nothing"),
  }
}

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
  async fn geocode(&self, address: &str) -> Result<ResolvedLocation, UpstreamError>;
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
  async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherReport, UpstreamError>;
}

pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
  Client::builder().timeout(timeout).build()
}

/// Resolves an address and fetches the weather there, in that order.
#[derive(Debug, Clone)]
pub struct WeatherService {
  geocoder: Arc<dyn Geocoder>,
  weather: Arc<dyn WeatherSource>,
}

impl WeatherService {
  pub fn new(geocoder: Arc<dyn Geocoder>, weather: Arc<dyn WeatherSource>) -> Self {
    Self { geocoder, weather }
  }

  #[instrument(skip(self))]
  pub async fn lookup(&self, address: &str) -> Result<(ResolvedLocation, WeatherReport), LookupError> {
    let location = self.geocoder.geocode(address).await.map_err(|cause| {
      warn!(error = %cause, "geocoding failed");
      LookupError::LocationNotFound {
        address: address.to_string(),
        cause,
      }
    })?;
    info!(
      formatted_address = %location.formatted_address,
      latitude = location.latitude,
      longitude = location.longitude,
      "resolved location"
    );

    let report = self
      .weather
      .current(location.latitude, location.longitude)
      .await
      .map_err(|cause| {
        warn!(error = %cause, "weather lookup failed");
        LookupError::WeatherNotFound {
          address: location.formatted_address.clone(),
          cause,
        }
      })?;
    Ok((location, report))
  }
}

#[cfg(test)]
pub(crate) mod testing {
  use std::sync::Mutex;
  use std::sync::atomic::AtomicUsize;
  use std::sync::atomic::Ordering;

  use async_trait::async_trait;

  use super::Geocoder;
  use super::UpstreamError;
  use super::WeatherSource;
  use crate::models::ResolvedLocation;
  use crate::models::WeatherReport;

  /// Canned outcome for a fake upstream call.
  #[derive(Debug, Clone)]
  pub enum Canned<T> {
    Ok(T),
    NoResults,
    Status(u16, &'static str),
    Decode,
  }

  impl<T: Clone> Canned<T> {
    fn produce(&self) -> Result<T, UpstreamError> {
      match self {
        Self::Ok(value) => Ok(value.clone()),
        Self::NoResults => Err(UpstreamError::NoResults),
        Self::Status(status, message) => Err(UpstreamError::Status {
          status: *status,
          message: message.to_string(),
        }),
        Self::Decode => Err(UpstreamError::Decode("missing field `results`".to_string())),
      }
    }
  }

  #[derive(Debug)]
  pub struct FakeGeocoder {
    outcome: Canned<ResolvedLocation>,
    pub calls: AtomicUsize,
    pub last_address: Mutex<Option<String>>,
  }

  impl FakeGeocoder {
    pub fn new(outcome: Canned<ResolvedLocation>) -> Self {
      Self {
        outcome,
        calls: AtomicUsize::new(0),
        last_address: Mutex::new(None),
      }
    }

    pub fn paris() -> Self {
      Self::new(Canned::Ok(ResolvedLocation {
        formatted_address: "Paris, France".to_string(),
        latitude: 48.856614,
        longitude: 2.3522219,
      }))
    }

    pub fn call_count(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl Geocoder for FakeGeocoder {
    async fn geocode(&self, address: &str) -> Result<ResolvedLocation, UpstreamError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      *self.last_address.lock().unwrap() = Some(address.to_string());
      self.outcome.produce()
    }
  }

  #[derive(Debug)]
  pub struct FakeWeather {
    outcome: Canned<WeatherReport>,
    pub calls: AtomicUsize,
    pub last_coordinates: Mutex<Option<(f64, f64)>>,
  }

  impl FakeWeather {
    pub fn new(outcome: Canned<WeatherReport>) -> Self {
      Self {
        outcome,
        calls: AtomicUsize::new(0),
        last_coordinates: Mutex::new(None),
      }
    }

    pub fn mild() -> Self {
      Self::new(Canned::Ok(WeatherReport {
        description: "light rain".to_string(),
        temperature_c: 14.237,
        feels_like_c: Some(13.5),
        humidity_pct: Some(81),
      }))
    }

    pub fn call_count(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl WeatherSource for FakeWeather {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherReport, UpstreamError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      *self.last_coordinates.lock().unwrap() = Some((latitude, longitude));
      self.outcome.produce()
    }
  }
}
