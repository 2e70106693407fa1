/// First geocoding match for a free-text address.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
  pub formatted_address: String,
  pub latitude: f64,
  pub longitude: f64,
}

/// Current conditions at a coordinate, temperatures in Celsius.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
  pub description: String,
  pub temperature_c: f64,
  pub feels_like_c: Option<f64>,
  pub humidity_pct: Option<u8>,
}
