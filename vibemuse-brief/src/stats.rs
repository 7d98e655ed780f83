//! Input types for brief resolution.
//!
//! These types mirror the wire format produced by the room-sensing frontend
//! and upstream vibe analysis: camelCase field names, with optional blocks for
//! caller overrides, a previous vibe decision, and a weather snapshot.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::brief::TransitionDescriptor;

/// Categorical read of the room's dress code / social register.
///
/// Values the detector does not know about deserialize to `Unknown` and fall
/// through to the default style mapping instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StyleIndicator {
    Formal,
    Casual,
    Party,
    Professional,
    #[default]
    Mixed,
    #[serde(other)]
    Unknown,
}

/// Categorical read of the room's lighting behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LightingPattern {
    #[default]
    Steady,
    Dynamic,
    Strobe,
    Dim,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for LightingPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightingPattern::Steady => write!(f, "steady"),
            LightingPattern::Dynamic => write!(f, "dynamic"),
            LightingPattern::Strobe => write!(f, "strobe"),
            LightingPattern::Dim => write!(f, "dim"),
            // Unrecognized patterns read as generic ambient lighting
            LightingPattern::Unknown => write!(f, "ambient"),
        }
    }
}

/// A snapshot of room sensor readings for one resolution call.
///
/// Visual and audio metrics are normalized to [0, 1] by the capture pipeline,
/// but the resolver clamps them again before use. Color temperature is in
/// Kelvin; pitch and spectral centroid are in Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomStats {
    /// Average frame brightness, 0-1
    pub avg_brightness: f64,
    /// Dominant color temperature in Kelvin
    pub color_temp_k: f64,
    /// Overall motion level, 0-1
    pub motion_level: f64,
    /// Per-zone motion levels, 0-1 each
    pub motion_zones: Vec<f64>,
    /// Crowd density estimate, 0-1
    pub crowd_density: f64,
    /// Detected social register of the room
    pub style_indicator: StyleIndicator,
    /// Dominant colors, most prominent first
    pub dominant_colors: Vec<String>,
    /// Color variance across the frame, 0-1
    pub color_variance: f64,
    /// Detected lighting behavior
    pub lighting_pattern: LightingPattern,
    /// Audio volume level
    pub audio_volume: f64,
    /// Audio energy, 0-1
    pub audio_energy: f64,
    /// Background noise level, 0-1
    pub noise_level: f64,
    /// Probability that the audio contains speech, 0-1
    pub speech_probability: f64,
    /// Dominant pitch in Hz
    pub pitch: f64,
    /// Spectral centroid in Hz
    pub spectral_centroid: f64,
}

impl Default for RoomStats {
    fn default() -> Self {
        Self {
            avg_brightness: 0.5,
            color_temp_k: 4500.0,
            motion_level: 0.3,
            motion_zones: Vec::new(),
            crowd_density: 0.3,
            style_indicator: StyleIndicator::default(),
            dominant_colors: Vec::new(),
            color_variance: 0.3,
            lighting_pattern: LightingPattern::default(),
            audio_volume: 0.4,
            audio_energy: 0.3,
            noise_level: 0.3,
            speech_probability: 0.3,
            pitch: 220.0,
            spectral_centroid: 1500.0,
        }
    }
}

/// Caller-supplied overrides for any brief field.
///
/// Any present field short-circuits the corresponding derived default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptMetadata {
    /// Explicit style tag, bypassing indicator/decision mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Full generation prompt, bypassing the description template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Vibe label, bypassing the decision label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibe: Option<String>,
    /// Target tempo, bypassing the motion-derived default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_bpm: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acoustic_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percussion_intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamics: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrumentation_hints: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionDescriptor>,
}

/// An upstream categorical judgment about the room's vibe.
///
/// Used only as a fallback source for style and tempo when the caller's
/// metadata lacks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VibeDecision {
    /// Vibe label, e.g. "party", "chill", "focused", "bored"
    pub vibe_label: String,
    /// Tempo suggested by the upstream analysis
    #[serde(default, rename = "suggestedBPM", skip_serializing_if = "Option::is_none")]
    pub suggested_bpm: Option<u16>,
    /// Playback volume suggested by the upstream analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_volume: Option<f64>,
    /// Short spoken announcement accompanying the decision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken_tip: Option<String>,
}

/// Current weather context, folded into a human-readable summary.
///
/// Weather never affects the numeric axes; it only colors the textual
/// summary attached to the brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Location name, e.g. a city
    pub location: String,
    /// Weather description, e.g. "Light Rain"
    pub description: String,
    /// Temperature in degrees Celsius
    pub temperature_c: f64,
    /// Relative humidity percentage, 0-100
    pub humidity: f64,
    /// Wind speed in m/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    /// Weather bucket assigned by the weather service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_stats_camel_case_wire_format() {
        let stats = RoomStats::default();
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("avgBrightness").is_some());
        assert!(json.get("colorTempK").is_some());
        assert!(json.get("styleIndicator").is_some());
        assert!(json.get("lightingPattern").is_some());
        assert!(json.get("speechProbability").is_some());
    }

    #[test]
    fn test_unknown_style_indicator_tolerated() {
        let json = r#""unrecognized-value""#;
        let indicator: StyleIndicator = serde_json::from_str(json).unwrap();
        assert_eq!(indicator, StyleIndicator::Unknown);
    }

    #[test]
    fn test_unknown_lighting_pattern_tolerated() {
        let json = r#""lava-lamp""#;
        let pattern: LightingPattern = serde_json::from_str(json).unwrap();
        assert_eq!(pattern, LightingPattern::Unknown);
    }

    #[test]
    fn test_known_categoricals_round_trip() {
        for (raw, expected) in [
            ("\"formal\"", StyleIndicator::Formal),
            ("\"casual\"", StyleIndicator::Casual),
            ("\"party\"", StyleIndicator::Party),
            ("\"professional\"", StyleIndicator::Professional),
            ("\"mixed\"", StyleIndicator::Mixed),
        ] {
            let parsed: StyleIndicator = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn test_decision_accepts_uppercase_bpm_key() {
        let json = r#"{"vibeLabel": "party", "suggestedBPM": 124}"#;
        let decision: VibeDecision = serde_json::from_str(json).unwrap();
        assert_eq!(decision.vibe_label, "party");
        assert_eq!(decision.suggested_bpm, Some(124));
    }

    #[test]
    fn test_prompt_metadata_all_fields_optional() {
        let metadata: PromptMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(metadata, PromptMetadata::default());
    }

    #[test]
    fn test_lighting_pattern_display() {
        assert_eq!(LightingPattern::Strobe.to_string(), "strobe");
        assert_eq!(LightingPattern::Dim.to_string(), "dim");
        assert_eq!(LightingPattern::Unknown.to_string(), "ambient");
    }
}
