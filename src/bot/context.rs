use std::sync::Arc;

use crate::bot::state::PendingStore;
use crate::upstream::WeatherService;

#[derive(Clone)]
pub struct AppContext {
  pending: Arc<dyn PendingStore>,
  weather: WeatherService,
}

impl AppContext {
  pub fn new(pending: Arc<dyn PendingStore>, weather: WeatherService) -> Self {
    Self { pending, weather }
  }

  pub fn pending(&self) -> &dyn PendingStore {
    self.pending.as_ref()
  }

  pub fn weather(&self) -> &WeatherService {
    &self.weather
  }
}
