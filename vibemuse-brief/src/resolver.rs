//! The creative brief resolver.
//!
//! Given a snapshot of room sensor readings plus optional upstream hints (a
//! caller-declared style, a previous vibe decision, weather data, or a fully
//! formed brief), deterministically produces a normalized creative brief.
//!
//! The resolver is a pure function: no I/O, no mutation of inputs, and the
//! same inputs always produce the same brief. Malformed upstream values
//! (out-of-range floats, unrecognized categoricals) fall through to defaults
//! instead of raising.

use crate::brief::{CreativeMusicBrief, TransitionDescriptor, VocalsMode};
use crate::stats::{
    LightingPattern, PromptMetadata, RoomStats, StyleIndicator, VibeDecision, WeatherSnapshot,
};

/// Hint appended to every brief so the generator avoids vocal tracks.
pub const NO_VOCALS_HINT: &str = "no vocals";

/// Companion hint appended alongside [`NO_VOCALS_HINT`].
pub const INSTRUMENTAL_HINT: &str = "instrumental arrangement";

/// Vibe label used when neither the caller nor the upstream decision names one.
pub const DEFAULT_VIBE: &str = "focused";

// Tempo ramps linearly with motion from a resting 78 BPM up to 138 BPM.
const BPM_BASE: f64 = 78.0;
const BPM_MOTION_SPAN: f64 = 60.0;

// Warmth maps the 1800K-8500K color temperature range onto a 0.6-wide band.
const COLOR_TEMP_FLOOR_K: f64 = 1800.0;
const COLOR_TEMP_CEIL_K: f64 = 8500.0;

/// Resolve a creative brief from sensor readings and optional upstream hints.
///
/// With no `existing` brief this derives every field from `stats`, `metadata`,
/// `decision`, and `weather`. With an `existing` brief it refines instead:
/// the supplied brief is taken as-is, instrumentation and vocals are
/// re-normalized, and only absent summary/keyword fields are filled in.
pub fn resolve(
    stats: &RoomStats,
    metadata: Option<&PromptMetadata>,
    decision: Option<&VibeDecision>,
    weather: Option<&WeatherSnapshot>,
    existing: Option<&CreativeMusicBrief>,
) -> CreativeMusicBrief {
    match existing {
        Some(existing) => refine(existing, stats, weather),
        None => derive(stats, metadata, decision, weather),
    }
}

/// Fresh derivation: build every brief field from the inputs.
fn derive(
    stats: &RoomStats,
    metadata: Option<&PromptMetadata>,
    decision: Option<&VibeDecision>,
    weather: Option<&WeatherSnapshot>,
) -> CreativeMusicBrief {
    // Sensor channels arrive normalized but are not trusted to stay in range.
    let motion = clamp01(stats.motion_level);
    let audio_energy = clamp01(stats.audio_energy);
    let noise = clamp01(stats.noise_level);
    let crowd = clamp01(stats.crowd_density);

    let style = select_style(stats, metadata, decision);

    let vibe = metadata
        .and_then(|m| m.vibe.clone())
        .or_else(|| decision.map(|d| d.vibe_label.clone()))
        .unwrap_or_else(|| DEFAULT_VIBE.to_string());

    let target_bpm = metadata
        .and_then(|m| m.target_bpm)
        .or_else(|| decision.and_then(|d| d.suggested_bpm))
        .unwrap_or_else(|| (BPM_BASE + motion * BPM_MOTION_SPAN).round() as u16);

    let energy = axis(
        metadata.and_then(|m| m.energy),
        motion * 0.6 + audio_energy * 0.4,
    );

    let warmth = axis(
        metadata.and_then(|m| m.warmth),
        0.75
            - ((stats.color_temp_k - COLOR_TEMP_FLOOR_K) / (COLOR_TEMP_CEIL_K - COLOR_TEMP_FLOOR_K))
                * 0.6
            + if stats.avg_brightness < 0.35 { 0.1 } else { 0.0 },
    );

    let formality_base = match stats.style_indicator {
        StyleIndicator::Formal | StyleIndicator::Professional => 0.85,
        StyleIndicator::Casual => 0.35,
        _ => 0.5,
    };
    let formality = axis(
        metadata.and_then(|m| m.formality),
        formality_base + if vibe == "focused" { 0.1 } else { 0.0 }
            - if crowd > 0.7 { 0.1 } else { 0.0 },
    );

    let focus = axis(
        metadata.and_then(|m| m.focus),
        0.6 - noise * 0.35
            + if stats.speech_probability > 0.55 { 0.1 } else { 0.0 }
            + if vibe == "focused" { 0.15 } else { 0.0 },
    );

    let acoustic_bias = match stats.style_indicator {
        StyleIndicator::Casual | StyleIndicator::Formal => 0.65,
        StyleIndicator::Professional => 0.55,
        StyleIndicator::Party => 0.3,
        _ => 0.5,
    };
    let acoustic_ratio = axis(
        metadata.and_then(|m| m.acoustic_ratio),
        acoustic_bias + warmth * 0.2 - audio_energy * 0.2,
    );

    let percussion_intensity = axis(
        metadata.and_then(|m| m.percussion_intensity),
        audio_energy * 0.5 + motion * 0.35 + if vibe == "bored" { 0.2 } else { 0.0 },
    );

    let dynamics = axis(
        metadata.and_then(|m| m.dynamics),
        0.4 + motion * 0.15
            + if stats.avg_brightness < 0.25 { -0.1 } else { 0.0 }
            + if vibe == "party" { 0.1 } else { 0.0 },
    );

    let instrumentation_hints = ensure_instrumental(
        metadata
            .and_then(|m| m.instrumentation_hints.as_ref())
            .filter(|hints| !hints.is_empty())
            .cloned()
            .unwrap_or_else(|| default_instrumentation(&style)),
    );

    let mood_keywords = dedup_first_wins(
        metadata
            .and_then(|m| m.mood_keywords.clone())
            .unwrap_or_else(|| vec![vibe.clone(), style.clone()]),
    );

    let environment_summary = metadata
        .and_then(|m| m.environment_summary.clone())
        .unwrap_or_else(|| describe_environment(stats));

    let weather_summary = metadata
        .and_then(|m| m.weather_summary.clone())
        .or_else(|| weather.map(describe_weather));

    let description = metadata.and_then(|m| m.description.clone()).unwrap_or_else(|| {
        format!(
            "Compose {} music that supports a {} vibe. Keep tempo near {} BPM and respect: {}.",
            style, vibe, target_bpm, environment_summary
        )
    });

    let transition = metadata
        .and_then(|m| m.transition.clone())
        .map(|t| TransitionDescriptor {
            smoothness: clamp01(t.smoothness),
            ..t
        });

    CreativeMusicBrief {
        style,
        vibe,
        target_bpm,
        energy,
        warmth,
        formality,
        focus,
        acoustic_ratio,
        percussion_intensity,
        dynamics,
        vocals_allowed: VocalsMode::Off,
        instrumentation_hints,
        mood_keywords,
        environment_summary,
        weather_summary,
        description,
        transition,
    }
}

/// Refinement: normalize a caller-supplied brief without overwriting it.
fn refine(
    existing: &CreativeMusicBrief,
    stats: &RoomStats,
    weather: Option<&WeatherSnapshot>,
) -> CreativeMusicBrief {
    let mut brief = existing.clone();

    let hints = if brief.instrumentation_hints.is_empty() {
        default_instrumentation(&brief.style)
    } else {
        std::mem::take(&mut brief.instrumentation_hints)
    };
    brief.instrumentation_hints = ensure_instrumental(hints);
    brief.vocals_allowed = VocalsMode::Off;

    if brief.weather_summary.is_none() {
        brief.weather_summary = weather.map(describe_weather);
    }
    if brief.environment_summary.trim().is_empty() {
        brief.environment_summary = describe_environment(stats);
    }
    if brief.mood_keywords.is_empty() {
        brief.mood_keywords =
            dedup_first_wins(vec![brief.vibe.clone(), brief.style.clone()]);
    }

    brief
}

/// Pick the style tag: caller metadata wins, then the decision label mapping,
/// then the room's style indicator, with "chill" as the final fallback.
///
/// Upbeat under strobe or rapidly changing lighting is forced to electronic;
/// pop-leaning upbeat tracks clash with that kind of light show.
fn select_style(
    stats: &RoomStats,
    metadata: Option<&PromptMetadata>,
    decision: Option<&VibeDecision>,
) -> String {
    let chosen = metadata
        .and_then(|m| m.style.clone())
        .or_else(|| {
            decision.and_then(|d| style_for_vibe(&d.vibe_label).map(str::to_string))
        })
        .unwrap_or_else(|| style_for_indicator(stats.style_indicator).to_string());

    if chosen == "upbeat"
        && matches!(
            stats.lighting_pattern,
            LightingPattern::Strobe | LightingPattern::Dynamic
        )
    {
        return "electronic".to_string();
    }

    chosen
}

fn style_for_vibe(vibe: &str) -> Option<&'static str> {
    match vibe {
        "party" => Some("upbeat"),
        "chill" => Some("chill"),
        "focused" => Some("ambient"),
        "bored" => Some("dynamic"),
        _ => None,
    }
}

fn style_for_indicator(indicator: StyleIndicator) -> &'static str {
    match indicator {
        StyleIndicator::Party => "upbeat",
        StyleIndicator::Formal => "classical",
        StyleIndicator::Professional => "ambient",
        StyleIndicator::Casual => "acoustic",
        StyleIndicator::Mixed | StyleIndicator::Unknown => "chill",
    }
}

/// Canonical instrument palette per style; unrecognized styles get a single
/// generic hint naming the style.
fn default_instrumentation(style: &str) -> Vec<String> {
    let hints: &[&str] = match style {
        "upbeat" => &[
            "electric guitar",
            "synth bass",
            "four-on-the-floor kick",
            "claps",
        ],
        "chill" => &["soft electric piano", "warm pads", "brushed drums"],
        "ambient" => &["evolving synth pads", "airy textures", "sub bass drone"],
        "dynamic" => &["driving synths", "punchy drums", "arpeggiated bass"],
        "classical" => &["string ensemble", "grand piano", "woodwinds"],
        "acoustic" => &["acoustic guitar", "upright bass", "light hand percussion"],
        "electronic" => &[
            "analog synths",
            "drum machine",
            "sidechained pads",
            "filtered bass",
        ],
        "jazz" => &["piano trio", "upright bass", "ride cymbal", "muted trumpet"],
        "rock" => &["distorted electric guitars", "bass guitar", "live drum kit"],
        _ => return vec![format!("elements inspired by {}", style)],
    };
    hints.iter().map(|hint| hint.to_string()).collect()
}

/// Append the instrumental constraints and drop duplicates, keeping the first
/// occurrence of each hint.
fn ensure_instrumental(mut hints: Vec<String>) -> Vec<String> {
    hints.push(NO_VOCALS_HINT.to_string());
    hints.push(INSTRUMENTAL_HINT.to_string());
    dedup_first_wins(hints)
}

/// Case-sensitive exact-string dedup, first occurrence wins.
fn dedup_first_wins(items: Vec<String>) -> Vec<String> {
    let mut deduped: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !deduped.contains(&item) {
            deduped.push(item);
        }
    }
    deduped
}

fn describe_environment(stats: &RoomStats) -> String {
    let colors = if stats.dominant_colors.is_empty() {
        "none detected".to_string()
    } else {
        stats
            .dominant_colors
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "motion {}%, crowd {}%, {} lighting, colors {}, audio energy {}%",
        percent(stats.motion_level),
        percent(stats.crowd_density),
        stats.lighting_pattern,
        colors,
        percent(stats.audio_energy),
    )
}

fn describe_weather(weather: &WeatherSnapshot) -> String {
    let mut parts = Vec::new();
    let location = weather.location.trim();
    if !location.is_empty() {
        parts.push(location.to_string());
    }
    let description = weather.description.trim().to_lowercase();
    if !description.is_empty() {
        parts.push(description);
    }
    parts.push(format!("{}°C", weather.temperature_c.round() as i64));
    parts.push(format!("humidity {}%", weather.humidity.round() as i64));
    parts.join(", ")
}

/// Metadata override wins verbatim; either way the axis lands in [0, 1].
fn axis(override_value: Option<f64>, computed: f64) -> f64 {
    clamp01(override_value.unwrap_or(computed))
}

fn percent(value: f64) -> i64 {
    (clamp01(value) * 100.0).round() as i64
}

fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn indicator_strategy() -> impl Strategy<Value = StyleIndicator> {
        prop_oneof![
            Just(StyleIndicator::Formal),
            Just(StyleIndicator::Casual),
            Just(StyleIndicator::Party),
            Just(StyleIndicator::Professional),
            Just(StyleIndicator::Mixed),
            Just(StyleIndicator::Unknown),
        ]
    }

    fn lighting_strategy() -> impl Strategy<Value = LightingPattern> {
        prop_oneof![
            Just(LightingPattern::Steady),
            Just(LightingPattern::Dynamic),
            Just(LightingPattern::Strobe),
            Just(LightingPattern::Dim),
            Just(LightingPattern::Unknown),
        ]
    }

    prop_compose! {
        /// Sensor snapshots including deliberately out-of-range channels.
        fn room_stats_strategy()(
            avg_brightness in -0.5f64..1.5,
            color_temp_k in 0.0f64..12000.0,
            motion_level in -1.0f64..3.0,
            crowd_density in -1.0f64..3.0,
            style_indicator in indicator_strategy(),
            color_variance in 0.0f64..1.0,
            lighting_pattern in lighting_strategy(),
            audio_volume in 0.0f64..2.0,
            audio_energy in -1.0f64..3.0,
            noise_level in -1.0f64..3.0,
            speech_probability in 0.0f64..1.0,
            pitch in 20.0f64..2000.0,
            spectral_centroid in 100.0f64..8000.0,
        ) -> RoomStats {
            RoomStats {
                avg_brightness,
                color_temp_k,
                motion_level,
                motion_zones: Vec::new(),
                crowd_density,
                style_indicator,
                dominant_colors: Vec::new(),
                color_variance,
                lighting_pattern,
                audio_volume,
                audio_energy,
                noise_level,
                speech_probability,
                pitch,
                spectral_centroid,
            }
        }
    }

    proptest! {
        /// Every numeric axis lands in [0, 1] for any sensor snapshot.
        #[test]
        fn axes_always_bounded(stats in room_stats_strategy()) {
            let brief = resolve(&stats, None, None, None, None);
            for (i, value) in brief.axes().iter().enumerate() {
                prop_assert!(
                    (0.0..=1.0).contains(value),
                    "axis {} out of bounds: {}",
                    i,
                    value
                );
            }
        }

        /// Axis overrides are clamped, so the bounds hold for any metadata too.
        #[test]
        fn axes_bounded_under_overrides(
            stats in room_stats_strategy(),
            energy in -5.0f64..5.0,
            warmth in -5.0f64..5.0,
            dynamics in -5.0f64..5.0,
        ) {
            let metadata = PromptMetadata {
                energy: Some(energy),
                warmth: Some(warmth),
                dynamics: Some(dynamics),
                ..PromptMetadata::default()
            };
            let brief = resolve(&stats, Some(&metadata), None, None, None);
            for value in brief.axes() {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }

        /// Vocals are off for every input.
        #[test]
        fn vocals_always_off(stats in room_stats_strategy()) {
            let brief = resolve(&stats, None, None, None, None);
            prop_assert_eq!(brief.vocals_allowed, VocalsMode::Off);
        }

        /// The instrumental constraints are present and hints never repeat.
        #[test]
        fn hints_deduped_with_constraints(stats in room_stats_strategy()) {
            let brief = resolve(&stats, None, None, None, None);
            let hints = &brief.instrumentation_hints;

            prop_assert!(hints.contains(&NO_VOCALS_HINT.to_string()));
            prop_assert!(hints.contains(&INSTRUMENTAL_HINT.to_string()));

            let mut sorted = hints.clone();
            sorted.sort_unstable();
            let before = sorted.len();
            sorted.dedup();
            prop_assert_eq!(before, sorted.len(), "duplicate hints in {:?}", hints);
        }

        /// Resolution is deterministic: identical inputs, identical briefs.
        #[test]
        fn resolution_is_deterministic(stats in room_stats_strategy()) {
            let first = resolve(&stats, None, None, None, None);
            let second = resolve(&stats, None, None, None, None);
            prop_assert_eq!(first, second);
        }

        /// Target tempo stays within the motion-driven range when derived.
        #[test]
        fn derived_bpm_in_range(stats in room_stats_strategy()) {
            let brief = resolve(&stats, None, None, None, None);
            prop_assert!((78..=138).contains(&brief.target_bpm), "bpm {}", brief.target_bpm);
        }
    }
}
