//! Configuration module for loading environment variables and settings.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Default ElevenLabs music endpoint.
pub const DEFAULT_MUSIC_ENDPOINT: &str = "https://api.elevenlabs.io/v1/music";

/// Default ElevenLabs music model.
pub const DEFAULT_MUSIC_MODEL: &str = "music_v1";

/// Default ElevenLabs output format.
pub const DEFAULT_MUSIC_FORMAT: &str = "mp3_44100_128";

/// Default directory for generated audio files.
pub const DEFAULT_MUSIC_OUTPUT_DIR: &str = "/tmp/vibemuse-music";

/// Default OpenWeatherMap endpoint.
pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// ElevenLabs API key (required for music generation)
    pub elevenlabs_api_key: Option<String>,
    /// OpenWeatherMap API key (required for weather lookups)
    pub openweather_api_key: Option<String>,
    /// ElevenLabs music generation endpoint
    pub music_endpoint: String,
    /// ElevenLabs music model identifier
    pub music_model: String,
    /// ElevenLabs audio output format
    pub music_output_format: String,
    /// Directory where generated audio files are written
    pub music_output_dir: PathBuf,
    /// OpenWeatherMap current-weather endpoint
    pub weather_endpoint: String,
    /// HTTP server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// API keys are optional at load time; handlers that need one fail with
    /// a configuration error at call time instead.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if PORT is set but not a valid
    /// port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let elevenlabs_api_key = std::env::var("ELEVENLABS_API_KEY").ok();
        let openweather_api_key = std::env::var("OPENWEATHER_API_KEY").ok();

        let music_endpoint = std::env::var("ELEVENLABS_MUSIC_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_MUSIC_ENDPOINT.to_string());
        let music_model = std::env::var("ELEVENLABS_MUSIC_MODEL")
            .unwrap_or_else(|_| DEFAULT_MUSIC_MODEL.to_string());
        let music_output_format = std::env::var("ELEVENLABS_MUSIC_FORMAT")
            .unwrap_or_else(|_| DEFAULT_MUSIC_FORMAT.to_string());
        let music_output_dir = std::env::var("ELEVENLABS_MUSIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MUSIC_OUTPUT_DIR));

        let weather_endpoint = std::env::var("OPENWEATHER_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_WEATHER_ENDPOINT.to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::invalid_value("PORT", format!("'{}' is not a valid port", raw)))?,
            Err(_) => 8080,
        };

        Ok(Self {
            elevenlabs_api_key,
            openweather_api_key,
            music_endpoint,
            music_model,
            music_output_format,
            music_output_dir,
            weather_endpoint,
            port,
        })
    }

    /// Get the ElevenLabs API key, or a configuration error if it is not set.
    pub fn require_elevenlabs_key(&self) -> Result<&str, ConfigError> {
        self.elevenlabs_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::missing_env_var("ELEVENLABS_API_KEY"))
    }

    /// Get the OpenWeatherMap API key, or a configuration error if it is not set.
    pub fn require_openweather_key(&self) -> Result<&str, ConfigError> {
        self.openweather_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::missing_env_var("OPENWEATHER_API_KEY"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            elevenlabs_api_key: None,
            openweather_api_key: None,
            music_endpoint: DEFAULT_MUSIC_ENDPOINT.to_string(),
            music_model: DEFAULT_MUSIC_MODEL.to_string(),
            music_output_format: DEFAULT_MUSIC_FORMAT.to_string(),
            music_output_dir: PathBuf::from(DEFAULT_MUSIC_OUTPUT_DIR),
            weather_endpoint: DEFAULT_WEATHER_ENDPOINT.to_string(),
            port: 8080,
        }
    }
}
