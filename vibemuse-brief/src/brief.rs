//! The creative brief handed to the music generator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whether the generated track may contain vocals.
///
/// The resolver forces this to `Off` on every path; the other variants exist
/// because upstream briefs may arrive with them set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VocalsMode {
    #[default]
    Off,
    Background,
    Lead,
}

/// Describes how to hand over from the previously playing style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDescriptor {
    /// Style of the track currently playing
    pub from_style: String,
    /// How smooth the crossfade should be, 0-1
    pub smoothness: f64,
}

/// A normalized creative brief for one generated track.
///
/// The seven numeric axes are always within [0, 1] after resolution, and
/// `instrumentation_hints` always contains "no vocals" and
/// "instrumental arrangement" with no duplicate entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreativeMusicBrief {
    /// Musical style tag driving generation
    pub style: String,
    /// Vibe label the track should support
    pub vibe: String,
    /// Target tempo in beats per minute
    pub target_bpm: u16,
    /// Overall intensity, 0-1
    pub energy: f64,
    /// Tonal warmth, 0-1
    pub warmth: f64,
    /// Formality of the arrangement, 0-1
    pub formality: f64,
    /// How much the track should support concentration, 0-1
    pub focus: f64,
    /// Acoustic versus electronic balance, 0-1
    pub acoustic_ratio: f64,
    /// Percussion prominence, 0-1
    pub percussion_intensity: f64,
    /// Dynamic range, 0-1
    pub dynamics: f64,
    /// Always `off`: the generator must never produce vocal tracks
    pub vocals_allowed: VocalsMode,
    /// Instrument suggestions, first occurrence wins, no duplicates
    pub instrumentation_hints: Vec<String>,
    /// Mood keywords for the generation prompt
    pub mood_keywords: Vec<String>,
    /// Human-readable summary of the room state
    pub environment_summary: String,
    /// Human-readable summary of current weather, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_summary: Option<String>,
    /// Free-text prompt for the downstream generator
    pub description: String,
    /// Hand-over from the previously playing style, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionDescriptor>,
}

impl CreativeMusicBrief {
    /// The seven numeric axes in declaration order.
    pub fn axes(&self) -> [f64; 7] {
        [
            self.energy,
            self.warmth,
            self.formality,
            self.focus,
            self.acoustic_ratio,
            self.percussion_intensity,
            self.dynamics,
        ]
    }
}
