//! Music generation handler for the MCP Music server.
//!
//! This module provides the `MusicHandler` struct and parameter types for
//! music generation using the ElevenLabs Music REST API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use vibemuse_common::config::Config;
use vibemuse_common::error::Error;
use vibemuse_common::styles::StyleRegistry;

/// Default track duration in seconds.
pub const DEFAULT_DURATION_SECS: u16 = 60;

/// Minimum track duration accepted by this server.
pub const MIN_DURATION_SECS: u16 = 5;

/// Maximum track duration accepted by this server.
pub const MAX_DURATION_SECS: u16 = 180;

// The public API takes milliseconds and clamps to roughly 10s-5min.
const MIN_API_LENGTH_MS: u64 = 10_000;
const MAX_API_LENGTH_MS: u64 = 300_000;

// Music generation is slow; give the API plenty of time to answer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Music generation parameters.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MusicGenerateParams {
    /// Music style (upbeat/chill/cozy/dynamic/ambient/classical/rock/jazz/electronic/acoustic).
    pub style: String,

    /// Custom description for the music to be generated.
    pub description: String,

    /// Duration of the track in seconds (default: 60).
    #[serde(default = "default_duration")]
    pub duration_seconds: u16,

    /// Output file path for saving the audio locally.
    /// If not specified, a file is created in the configured output directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

fn default_duration() -> u16 {
    DEFAULT_DURATION_SECS
}

/// Validation error details for music generation parameters.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl MusicGenerateParams {
    /// Validate the parameters against the server constraints.
    ///
    /// # Returns
    /// - `Ok(())` if all parameters are valid
    /// - `Err(Vec<ValidationError>)` with all validation errors
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if StyleRegistry::resolve(&self.style).is_none() {
            errors.push(ValidationError {
                field: "style".to_string(),
                message: format!(
                    "Invalid style '{}'. Must be one of: {}",
                    self.style,
                    StyleRegistry::ids().join(", ")
                ),
            });
        }

        if self.description.trim().is_empty() {
            errors.push(ValidationError {
                field: "description".to_string(),
                message: "Description cannot be empty".to_string(),
            });
        }

        if self.duration_seconds < MIN_DURATION_SECS || self.duration_seconds > MAX_DURATION_SECS {
            errors.push(ValidationError {
                field: "duration_seconds".to_string(),
                message: format!(
                    "duration_seconds must be between {} and {}, got {}",
                    MIN_DURATION_SECS, MAX_DURATION_SECS, self.duration_seconds
                ),
            });
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Music generation handler.
///
/// Handles music generation requests via the ElevenLabs Music API. Holds an
/// explicitly constructed HTTP client and configuration; the caller owns its
/// lifecycle.
pub struct MusicHandler {
    /// Application configuration.
    pub config: Config,
    /// HTTP client for API requests.
    pub http: reqwest::Client,
}

impl MusicHandler {
    /// Create a new MusicHandler with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Generate music from a style and description.
    ///
    /// The style's base prompt is prepended to the caller's description before
    /// the request is sent.
    ///
    /// # Returns
    /// * `Ok(GeneratedTrack)` - Path and metadata of the saved audio file
    /// * `Err(Error)` - If validation fails, the API call fails, or the file
    ///   cannot be written
    #[instrument(level = "info", name = "generate_music", skip(self, params))]
    pub async fn generate_music(&self, params: MusicGenerateParams) -> Result<GeneratedTrack, Error> {
        params.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            Error::validation(messages.join("; "))
        })?;

        let style = StyleRegistry::resolve(&params.style)
            .ok_or_else(|| Error::validation(format!("Unknown style '{}'", params.style)))?;

        info!(style = style.id, duration = params.duration_seconds, "Generating music");

        let prompt = format!("{}. {}", style.prompt, params.description);
        self.generate_raw(&prompt, params.duration_seconds, params.output_file.as_deref())
            .await
    }

    /// Generate music from a fully formed prompt, bypassing style validation.
    ///
    /// Used by the vibe flow, where the prompt is assembled from a resolved
    /// creative brief whose style tag may fall outside the registry.
    #[instrument(level = "info", name = "generate_raw", skip(self, prompt))]
    pub async fn generate_raw(
        &self,
        prompt: &str,
        duration_seconds: u16,
        output_file: Option<&str>,
    ) -> Result<GeneratedTrack, Error> {
        if prompt.trim().is_empty() {
            return Err(Error::validation("Prompt cannot be empty"));
        }

        let api_key = self.config.require_elevenlabs_key()?;
        let duration_ms = api_length_ms(duration_seconds);
        let endpoint = &self.config.music_endpoint;

        let request = MusicApiRequest {
            prompt,
            music_length_ms: duration_ms,
            model_id: &self.config.music_model,
            output_format: &self.config.music_output_format,
        };

        debug!(endpoint = %endpoint, duration_ms, "Calling ElevenLabs Music API");

        let response = self
            .http
            .post(endpoint)
            .timeout(REQUEST_TIMEOUT)
            .header("xi-api-key", api_key)
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::api(endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Error payloads usually carry a JSON body with a message field
            let message = serde_json::from_str::<MusicApiError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(Error::api(endpoint, status.as_u16(), message));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let audio = response.bytes().await.map_err(|e| {
            Error::api(endpoint, status.as_u16(), format!("Failed to read audio body: {}", e))
        })?;

        if audio.is_empty() {
            return Err(Error::api(endpoint, status.as_u16(), "Empty audio payload returned"));
        }

        let path = self.output_path(output_file, &mime_type);
        persist_audio(&audio, &path).await?;

        info!(file = %path.display(), bytes = audio.len(), "Saved generated track");

        Ok(GeneratedTrack {
            music_file: path.to_string_lossy().into_owned(),
            mime_type,
            duration_seconds: duration_ms as f64 / 1000.0,
        })
    }

    /// Pick the output path: explicit file if given, otherwise a fresh name
    /// under the configured output directory.
    fn output_path(&self, output_file: Option<&str>, mime_type: &str) -> PathBuf {
        match output_file {
            Some(file) => PathBuf::from(file),
            None => {
                let extension = guess_extension(mime_type);
                self.config
                    .music_output_dir
                    .join(format!("vibemuse-{}.{}", Uuid::new_v4().simple(), extension))
            }
        }
    }
}

/// Convert a duration in seconds to the millisecond range the API accepts.
fn api_length_ms(duration_seconds: u16) -> u64 {
    (duration_seconds as u64 * 1000).clamp(MIN_API_LENGTH_MS, MAX_API_LENGTH_MS)
}

/// Write audio bytes to disk, creating parent directories as needed.
async fn persist_audio(data: &[u8], path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, data).await?;
    Ok(())
}

/// Guess a file extension from a Content-Type header value.
pub fn guess_extension(mime_type: &str) -> &'static str {
    let mime = mime_type.to_ascii_lowercase();
    if mime.contains("wav") || mime.contains("x-wav") || mime.contains("wave") {
        "wav"
    } else if mime.contains("ogg") {
        "ogg"
    } else if mime.contains("flac") {
        "flac"
    } else if mime.contains("aac") {
        "aac"
    } else if mime.contains("m4a") {
        "m4a"
    } else if mime.contains("opus") {
        "opus"
    } else {
        "mp3"
    }
}

// =============================================================================
// API Request/Response Types
// =============================================================================

/// ElevenLabs Music API request body.
#[derive(Debug, Serialize)]
struct MusicApiRequest<'a> {
    /// Creative prompt for the track
    prompt: &'a str,
    /// Requested track length in milliseconds
    music_length_ms: u64,
    /// Model identifier
    model_id: &'a str,
    /// Audio output format
    output_format: &'a str,
}

/// ElevenLabs error payload.
#[derive(Debug, Deserialize)]
struct MusicApiError {
    message: String,
}

// =============================================================================
// Result Types
// =============================================================================

/// A generated track persisted to disk.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTrack {
    /// Absolute path of the saved audio file
    pub music_file: String,
    /// MIME type reported by the API
    pub mime_type: String,
    /// Actual requested length in seconds after API clamping
    pub duration_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params: MusicGenerateParams =
            serde_json::from_str(r#"{"style": "jazz", "description": "smoky bar"}"#).unwrap();
        assert_eq!(params.duration_seconds, DEFAULT_DURATION_SECS);
        assert!(params.output_file.is_none());
    }

    #[test]
    fn test_valid_params() {
        let params = MusicGenerateParams {
            style: "chill".to_string(),
            description: "A relaxing evening playlist opener".to_string(),
            duration_seconds: 30,
            output_file: None,
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_style() {
        let params = MusicGenerateParams {
            style: "polka".to_string(),
            description: "A song".to_string(),
            duration_seconds: 60,
            output_file: None,
        };

        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "style"));
        // The error lists the accepted styles
        assert!(errors.iter().any(|e| e.message.contains("upbeat")));
    }

    #[test]
    fn test_style_alias_accepted() {
        let params = MusicGenerateParams {
            style: "lofi".to_string(),
            description: "Beats to study to".to_string(),
            duration_seconds: 60,
            output_file: None,
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_empty_description() {
        let params = MusicGenerateParams {
            style: "jazz".to_string(),
            description: "   ".to_string(),
            duration_seconds: 60,
            output_file: None,
        };

        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "description"));
    }

    #[test]
    fn test_duration_out_of_range() {
        for duration in [0u16, 4, 181, 600] {
            let params = MusicGenerateParams {
                style: "jazz".to_string(),
                description: "A song".to_string(),
                duration_seconds: duration,
                output_file: None,
            };

            let errors = params.validate().unwrap_err();
            assert!(
                errors.iter().any(|e| e.field == "duration_seconds"),
                "duration {} should be rejected",
                duration
            );
        }
    }

    #[test]
    fn test_duration_boundaries_accepted() {
        for duration in [MIN_DURATION_SECS, MAX_DURATION_SECS] {
            let params = MusicGenerateParams {
                style: "jazz".to_string(),
                description: "A song".to_string(),
                duration_seconds: duration,
                output_file: None,
            };
            assert!(params.validate().is_ok(), "duration {} should be valid", duration);
        }
    }

    #[test]
    fn test_api_length_clamping() {
        // Short requests are raised to the API floor
        assert_eq!(api_length_ms(5), 10_000);
        // In-range requests convert directly
        assert_eq!(api_length_ms(60), 60_000);
        assert_eq!(api_length_ms(180), 180_000);
    }

    #[test]
    fn test_guess_extension() {
        assert_eq!(guess_extension("audio/wav"), "wav");
        assert_eq!(guess_extension("audio/x-wav"), "wav");
        assert_eq!(guess_extension("audio/ogg"), "ogg");
        assert_eq!(guess_extension("audio/flac"), "flac");
        assert_eq!(guess_extension("audio/aac"), "aac");
        assert_eq!(guess_extension("audio/m4a"), "m4a");
        assert_eq!(guess_extension("audio/opus"), "opus");
        assert_eq!(guess_extension("audio/mpeg"), "mp3");
        assert_eq!(guess_extension("application/octet-stream"), "mp3");
        assert_eq!(guess_extension(""), "mp3");
    }

    #[test]
    fn test_output_path_respects_explicit_file() {
        let handler = MusicHandler::new(Config::default());
        let path = handler.output_path(Some("/tmp/track.mp3"), "audio/mpeg");
        assert_eq!(path, PathBuf::from("/tmp/track.mp3"));
    }

    #[test]
    fn test_output_path_generates_unique_names() {
        let handler = MusicHandler::new(Config::default());
        let first = handler.output_path(None, "audio/wav");
        let second = handler.output_path(None, "audio/wav");

        assert_ne!(first, second);
        assert!(first.starts_with(&handler.config.music_output_dir));
        assert_eq!(first.extension().and_then(|e| e.to_str()), Some("wav"));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let params = MusicGenerateParams {
            style: "electronic".to_string(),
            description: "Pulsing warehouse set".to_string(),
            duration_seconds: 90,
            output_file: Some("/tmp/output.mp3".to_string()),
        };

        let json = serde_json::to_string(&params).unwrap();
        let deserialized: MusicGenerateParams = serde_json::from_str(&json).unwrap();

        assert_eq!(params.style, deserialized.style);
        assert_eq!(params.description, deserialized.description);
        assert_eq!(params.duration_seconds, deserialized.duration_seconds);
        assert_eq!(params.output_file, deserialized.output_file);
    }
}
