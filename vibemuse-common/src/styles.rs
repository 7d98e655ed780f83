//! Music style definitions and registry.
//!
//! This module provides static style definitions and a registry for resolving
//! style names and aliases to their full definitions. Each style carries the
//! base prompt text handed to the music generation API.

use serde::Serialize;

/// Music style definition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MusicStyle {
    /// Canonical style identifier
    pub id: &'static str,
    /// Style aliases for convenience
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    /// Base prompt describing the style to the music generator
    pub prompt: &'static str,
}

// =============================================================================
// Static Style Definitions
// =============================================================================

/// Upbeat: energetic, positive music for parties and celebrations
pub const STYLE_UPBEAT: MusicStyle = MusicStyle {
    id: "upbeat",
    aliases: &["party", "energetic"],
    prompt: "Upbeat energetic pop music with bright melodies and positive vibes",
};

/// Chill: relaxed ambient vibes for studying or relaxing
pub const STYLE_CHILL: MusicStyle = MusicStyle {
    id: "chill",
    aliases: &["lofi", "relaxed"],
    prompt: "Chill ambient indie music with soft acoustic tones and relaxing atmosphere",
};

/// Cozy: warm, intimate music for quiet moments
pub const STYLE_COZY: MusicStyle = MusicStyle {
    id: "cozy",
    aliases: &["warm", "intimate"],
    prompt: "Cozy jazz with gentle piano and warm intimate feeling",
};

/// Dynamic: powerful, driving music with strong energy
pub const STYLE_DYNAMIC: MusicStyle = MusicStyle {
    id: "dynamic",
    aliases: &["driving", "powerful"],
    prompt: "Dynamic electronic music with powerful beats and driving energy",
};

/// Ambient: atmospheric, meditative sounds for deep focus
pub const STYLE_AMBIENT: MusicStyle = MusicStyle {
    id: "ambient",
    aliases: &["atmospheric", "meditative"],
    prompt: "Calm atmospheric ambient music for relaxation and meditation",
};

/// Classical: orchestral arrangements and compositions
pub const STYLE_CLASSICAL: MusicStyle = MusicStyle {
    id: "classical",
    aliases: &["orchestral"],
    prompt: "Beautiful classical music with orchestral arrangements",
};

/// Rock: guitar-driven music with strong rhythm
pub const STYLE_ROCK: MusicStyle = MusicStyle {
    id: "rock",
    aliases: &["guitar"],
    prompt: "Energetic rock music with driving guitars and strong rhythm",
};

/// Jazz: improvised melodies and sophisticated harmonies
pub const STYLE_JAZZ: MusicStyle = MusicStyle {
    id: "jazz",
    aliases: &["smooth-jazz"],
    prompt: "Smooth jazz with improvised melodies and sophisticated harmonies",
};

/// Electronic: synthesized music with digital beats
pub const STYLE_ELECTRONIC: MusicStyle = MusicStyle {
    id: "electronic",
    aliases: &["synth", "edm"],
    prompt: "Modern electronic music with synthesizers and digital beats",
};

/// Acoustic: natural, organic sounds with real instruments
pub const STYLE_ACOUSTIC: MusicStyle = MusicStyle {
    id: "acoustic",
    aliases: &["organic", "unplugged"],
    prompt: "Intimate acoustic music with natural instruments and organic sound",
};

/// All available music styles
pub const MUSIC_STYLES: &[MusicStyle] = &[
    STYLE_UPBEAT,
    STYLE_CHILL,
    STYLE_COZY,
    STYLE_DYNAMIC,
    STYLE_AMBIENT,
    STYLE_CLASSICAL,
    STYLE_ROCK,
    STYLE_JAZZ,
    STYLE_ELECTRONIC,
    STYLE_ACOUSTIC,
];

// =============================================================================
// Style Registry
// =============================================================================

/// Registry for resolving style names and aliases to full definitions.
pub struct StyleRegistry;

impl StyleRegistry {
    /// Resolve a style name or alias to its full definition.
    ///
    /// Lookup is case-insensitive and accepts either the canonical id
    /// (e.g., "upbeat") or any of its aliases (e.g., "party").
    ///
    /// # Examples
    ///
    /// ```
    /// use vibemuse_common::styles::StyleRegistry;
    ///
    /// // Resolve by canonical id
    /// let style = StyleRegistry::resolve("jazz");
    /// assert!(style.is_some());
    ///
    /// // Resolve by alias
    /// let style = StyleRegistry::resolve("lofi");
    /// assert_eq!(style.unwrap().id, "chill");
    /// ```
    pub fn resolve(name: &str) -> Option<&'static MusicStyle> {
        let name = name.trim().to_ascii_lowercase();
        MUSIC_STYLES
            .iter()
            .find(|style| style.id == name || style.aliases.contains(&name.as_str()))
    }

    /// List all available music styles.
    ///
    /// # Examples
    ///
    /// ```
    /// use vibemuse_common::styles::StyleRegistry;
    ///
    /// let styles = StyleRegistry::list();
    /// assert!(!styles.is_empty());
    /// ```
    pub fn list() -> &'static [MusicStyle] {
        MUSIC_STYLES
    }

    /// List the canonical ids of all available styles.
    pub fn ids() -> Vec<&'static str> {
        MUSIC_STYLES.iter().map(|style| style.id).collect()
    }
}
