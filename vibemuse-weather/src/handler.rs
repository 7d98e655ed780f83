//! Weather lookup handler for the MCP Weather server.
//!
//! This module provides the `WeatherHandler` struct, the OpenWeatherMap
//! response types, and the condition-to-bucket classification used to pick
//! music that fits the weather outside.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};
use vibemuse_brief::WeatherSnapshot;
use vibemuse_common::config::Config;
use vibemuse_common::error::Error;

/// Wind speed above which the windy bucket wins regardless of conditions (m/s).
pub const WINDY_WIND_SPEED_MS: f64 = 10.0;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Coarse weather bucket driving music selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeatherBucket {
    Sunny,
    Cloudy,
    Rainy,
    Windy,
    Night,
}

impl std::fmt::Display for WeatherBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherBucket::Sunny => write!(f, "sunny"),
            WeatherBucket::Cloudy => write!(f, "cloudy"),
            WeatherBucket::Rainy => write!(f, "rainy"),
            WeatherBucket::Windy => write!(f, "windy"),
            WeatherBucket::Night => write!(f, "night"),
        }
    }
}

/// Map an OpenWeatherMap condition code to a bucket.
///
/// Thunderstorm, drizzle, and rain families all read as rainy; snow and the
/// calm atmospheric conditions read as cloudy; blowing sand, dust, squalls,
/// and tornadoes read as windy. Unrecognized codes fall back to cloudy.
pub fn bucket_for_condition(code: u16) -> WeatherBucket {
    match code {
        200..=232 | 300..=321 | 500..=531 => WeatherBucket::Rainy,
        600..=622 => WeatherBucket::Cloudy,
        701 | 711 | 721 | 741 | 762 => WeatherBucket::Cloudy,
        731 | 751 | 761 | 771 | 781 => WeatherBucket::Windy,
        800 => WeatherBucket::Sunny,
        801..=804 => WeatherBucket::Cloudy,
        _ => WeatherBucket::Cloudy,
    }
}

/// Classify a full observation into a bucket.
///
/// Priority: observation time outside [sunrise, sunset] wins as night, then
/// strong wind, then the condition-code table.
pub fn classify(observation: &Observation) -> WeatherBucket {
    if observation.dt < observation.sys.sunrise || observation.dt > observation.sys.sunset {
        return WeatherBucket::Night;
    }

    let wind_speed = observation.wind.as_ref().map(|w| w.speed).unwrap_or(0.0);
    if wind_speed > WINDY_WIND_SPEED_MS {
        return WeatherBucket::Windy;
    }

    observation
        .weather
        .first()
        .map(|condition| bucket_for_condition(condition.id))
        .unwrap_or(WeatherBucket::Cloudy)
}

/// Current weather for a city plus its music bucket.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    /// City name as reported by the weather service
    pub city: String,
    /// Weather description, e.g. "light rain"
    pub description: String,
    /// Temperature in degrees Celsius
    pub temperature_c: f64,
    /// Relative humidity percentage, 0-100
    pub humidity: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Bucket assigned by classification
    pub bucket: WeatherBucket,
}

impl From<&WeatherReport> for WeatherSnapshot {
    fn from(report: &WeatherReport) -> Self {
        WeatherSnapshot {
            location: report.city.clone(),
            description: report.description.clone(),
            temperature_c: report.temperature_c,
            humidity: report.humidity,
            wind_speed: Some(report.wind_speed),
            bucket: Some(report.bucket.to_string()),
        }
    }
}

/// Weather lookup handler.
///
/// Fetches current weather from the OpenWeatherMap API. Holds an explicitly
/// constructed HTTP client and configuration; the caller owns its lifecycle.
pub struct WeatherHandler {
    /// Application configuration.
    pub config: Config,
    /// HTTP client for API requests.
    pub http: reqwest::Client,
}

impl WeatherHandler {
    /// Create a new WeatherHandler with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Fetch current weather for a city and classify it into a bucket.
    ///
    /// # Returns
    /// * `Ok(WeatherReport)` - Current conditions plus the assigned bucket
    /// * `Err(Error)` - If the city is empty, the API key is missing, or the
    ///   API call fails
    #[instrument(level = "info", name = "get_weather", skip(self))]
    pub async fn get_weather(&self, city: &str) -> Result<WeatherReport, Error> {
        let city = city.trim();
        if city.is_empty() {
            return Err(Error::validation("City cannot be empty"));
        }

        let api_key = self.config.require_openweather_key()?;
        let endpoint = &self.config.weather_endpoint;

        debug!(endpoint = %endpoint, city, "Fetching current weather");

        let response = self
            .http
            .get(endpoint)
            .timeout(REQUEST_TIMEOUT)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| Error::api(endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(endpoint, status.as_u16(), body));
        }

        let observation: Observation = response.json().await.map_err(|e| {
            Error::api(endpoint, status.as_u16(), format!("Failed to parse response: {}", e))
        })?;

        let report = report_from(observation);
        info!(city = %report.city, bucket = %report.bucket, "Classified weather");
        Ok(report)
    }
}

/// Flatten an observation into the report handed to callers.
fn report_from(observation: Observation) -> WeatherReport {
    let bucket = classify(&observation);
    let description = observation
        .weather
        .first()
        .map(|condition| condition.description.clone())
        .unwrap_or_default();
    let wind_speed = observation.wind.as_ref().map(|w| w.speed).unwrap_or(0.0);

    WeatherReport {
        city: observation.name,
        description,
        temperature_c: observation.main.temp,
        humidity: observation.main.humidity,
        wind_speed,
        bucket,
    }
}

// =============================================================================
// API Response Types
// =============================================================================

/// OpenWeatherMap current-weather observation.
#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    /// Active weather conditions, most significant first
    pub weather: Vec<Condition>,
    /// Temperature and humidity readings
    pub main: MainMetrics,
    /// Wind readings, absent in calm conditions
    #[serde(default)]
    pub wind: Option<Wind>,
    /// Sunrise/sunset times for the location
    pub sys: SunTimes,
    /// Observation time, unix seconds
    pub dt: i64,
    /// City name
    pub name: String,
}

/// A single weather condition entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    /// OpenWeatherMap condition code
    pub id: u16,
    /// Human-readable description
    pub description: String,
}

/// Temperature and humidity block.
#[derive(Debug, Clone, Deserialize)]
pub struct MainMetrics {
    /// Temperature in degrees Celsius (metric units requested)
    pub temp: f64,
    /// Relative humidity percentage
    pub humidity: f64,
}

/// Wind block.
#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    /// Wind speed in m/s
    pub speed: f64,
}

/// Sunrise/sunset block.
#[derive(Debug, Clone, Deserialize)]
pub struct SunTimes {
    /// Sunrise time, unix seconds
    pub sunrise: i64,
    /// Sunset time, unix seconds
    pub sunset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Daytime observation with the given condition code and wind speed.
    fn observation(condition: u16, wind_speed: f64, dt: i64) -> Observation {
        Observation {
            weather: vec![Condition {
                id: condition,
                description: "test conditions".to_string(),
            }],
            main: MainMetrics {
                temp: 18.0,
                humidity: 60.0,
            },
            wind: Some(Wind { speed: wind_speed }),
            sys: SunTimes {
                sunrise: 1000,
                sunset: 2000,
            },
            dt,
            name: "Testville".to_string(),
        }
    }

    #[test]
    fn test_clear_sky_is_sunny() {
        assert_eq!(bucket_for_condition(800), WeatherBucket::Sunny);
    }

    #[test]
    fn test_cloud_family_is_cloudy() {
        for code in [801, 802, 803, 804] {
            assert_eq!(bucket_for_condition(code), WeatherBucket::Cloudy, "code {}", code);
        }
    }

    #[test]
    fn test_rain_families_are_rainy() {
        // Thunderstorm, drizzle, rain
        for code in [200, 211, 232, 300, 312, 321, 500, 511, 531] {
            assert_eq!(bucket_for_condition(code), WeatherBucket::Rainy, "code {}", code);
        }
    }

    #[test]
    fn test_snow_is_cloudy() {
        for code in [600, 601, 602, 611, 622] {
            assert_eq!(bucket_for_condition(code), WeatherBucket::Cloudy, "code {}", code);
        }
    }

    #[test]
    fn test_atmosphere_split() {
        // Calm atmospheric conditions read as cloudy
        for code in [701, 711, 721, 741, 762] {
            assert_eq!(bucket_for_condition(code), WeatherBucket::Cloudy, "code {}", code);
        }
        // Blowing conditions read as windy
        for code in [731, 751, 761, 771, 781] {
            assert_eq!(bucket_for_condition(code), WeatherBucket::Windy, "code {}", code);
        }
    }

    #[test]
    fn test_unknown_code_defaults_to_cloudy() {
        assert_eq!(bucket_for_condition(0), WeatherBucket::Cloudy);
        assert_eq!(bucket_for_condition(999), WeatherBucket::Cloudy);
    }

    #[test]
    fn test_night_wins_over_conditions() {
        // Before sunrise
        assert_eq!(classify(&observation(800, 2.0, 500)), WeatherBucket::Night);
        // After sunset
        assert_eq!(classify(&observation(800, 2.0, 2500)), WeatherBucket::Night);
        // Even over heavy rain
        assert_eq!(classify(&observation(502, 15.0, 2500)), WeatherBucket::Night);
    }

    #[test]
    fn test_strong_wind_wins_over_conditions_during_day() {
        assert_eq!(classify(&observation(800, 12.5, 1500)), WeatherBucket::Windy);
        assert_eq!(classify(&observation(500, 10.1, 1500)), WeatherBucket::Windy);
    }

    #[test]
    fn test_daytime_calm_uses_condition_table() {
        assert_eq!(classify(&observation(800, 3.0, 1500)), WeatherBucket::Sunny);
        assert_eq!(classify(&observation(500, 3.0, 1500)), WeatherBucket::Rainy);
    }

    #[test]
    fn test_missing_wind_block_is_calm() {
        let mut obs = observation(800, 0.0, 1500);
        obs.wind = None;
        assert_eq!(classify(&obs), WeatherBucket::Sunny);
    }

    #[test]
    fn test_missing_conditions_default_to_cloudy() {
        let mut obs = observation(800, 3.0, 1500);
        obs.weather.clear();
        assert_eq!(classify(&obs), WeatherBucket::Cloudy);
    }

    #[test]
    fn test_report_flattening() {
        let report = report_from(observation(500, 4.0, 1500));
        assert_eq!(report.city, "Testville");
        assert_eq!(report.description, "test conditions");
        assert_eq!(report.temperature_c, 18.0);
        assert_eq!(report.humidity, 60.0);
        assert_eq!(report.wind_speed, 4.0);
        assert_eq!(report.bucket, WeatherBucket::Rainy);
    }

    #[test]
    fn test_snapshot_conversion() {
        let report = report_from(observation(800, 2.0, 1500));
        let snapshot: WeatherSnapshot = (&report).into();

        assert_eq!(snapshot.location, "Testville");
        assert_eq!(snapshot.description, "test conditions");
        assert_eq!(snapshot.temperature_c, 18.0);
        assert_eq!(snapshot.humidity, 60.0);
        assert_eq!(snapshot.wind_speed, Some(2.0));
        assert_eq!(snapshot.bucket.as_deref(), Some("sunny"));
    }

    #[test]
    fn test_bucket_wire_format() {
        assert_eq!(serde_json::to_string(&WeatherBucket::Night).unwrap(), "\"night\"");
        let parsed: WeatherBucket = serde_json::from_str("\"rainy\"").unwrap();
        assert_eq!(parsed, WeatherBucket::Rainy);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Classification is total: every condition code lands in a bucket,
        /// and never in night (night is time-based only).
        #[test]
        fn condition_mapping_is_total(code in 0u16..=1000) {
            let bucket = bucket_for_condition(code);
            prop_assert_ne!(bucket, WeatherBucket::Night);
        }

        /// Observations outside daylight hours always classify as night.
        #[test]
        fn night_always_wins(
            code in 0u16..=1000,
            wind in 0.0f64..50.0,
            offset in 1i64..100_000,
        ) {
            let before_sunrise = Observation {
                weather: vec![Condition { id: code, description: String::new() }],
                main: MainMetrics { temp: 10.0, humidity: 50.0 },
                wind: Some(Wind { speed: wind }),
                sys: SunTimes { sunrise: 1_000_000, sunset: 2_000_000 },
                dt: 1_000_000 - offset,
                name: "X".to_string(),
            };
            prop_assert_eq!(classify(&before_sunrise), WeatherBucket::Night);
        }

        /// Daytime gusts above the threshold always classify as windy.
        #[test]
        fn strong_wind_wins_during_day(
            code in 0u16..=1000,
            wind in 10.01f64..50.0,
        ) {
            let gusty_noon = Observation {
                weather: vec![Condition { id: code, description: String::new() }],
                main: MainMetrics { temp: 10.0, humidity: 50.0 },
                wind: Some(Wind { speed: wind }),
                sys: SunTimes { sunrise: 0, sunset: 10_000 },
                dt: 5_000,
                name: "X".to_string(),
            };
            prop_assert_eq!(classify(&gusty_noon), WeatherBucket::Windy);
        }
    }
}
