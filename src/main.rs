mod app;
mod bot;
mod config;
mod models;
mod telemetry;
mod upstream;
mod util;

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::Bot;
use tracing::info;

use crate::bot::AppContext;
use crate::bot::InMemPendingStore;
use crate::upstream::GoogleGeocoder;
use crate::upstream::OpenWeatherClient;
use crate::upstream::WeatherService;

#[tokio::main]
async fn main() -> Result<()> {
  telemetry::init()?;
  let config = config::Config::from_env()?;
  info!(
    webhook = config.webhook.is_some(),
    http_timeout_secs = config.http_timeout.as_secs(),
    pending_ttl_secs = config.pending_ttl.map(|ttl| ttl.as_secs()),
    "starting bot"
  );

  let http = upstream::http_client(config.http_timeout)?;
  let geocoder = GoogleGeocoder::new(http.clone(), config.geocoding_url.as_str(), config.maps_api_key.as_str());
  let weather = OpenWeatherClient::new(http, config.weather_url.as_str(), config.weather_api_key.as_str());
  let context = AppContext::new(
    Arc::new(InMemPendingStore::new(config.pending_ttl)),
    WeatherService::new(Arc::new(geocoder), Arc::new(weather)),
  );

  let bot = Bot::new(config.bot_token.clone());
  let app = app::App::new(bot, context, config.webhook);
  app.run().await
}
