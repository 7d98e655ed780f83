//! Vibemuse Brief Library
//!
//! This library turns a snapshot of room sensor readings plus optional
//! upstream hints into a normalized creative brief for music generation.
//! Resolution is a pure, deterministic computation with no I/O; it can be
//! invoked concurrently for independent requests with no coordination.

pub mod brief;
pub mod resolver;
pub mod stats;

pub use brief::{CreativeMusicBrief, TransitionDescriptor, VocalsMode};
pub use resolver::{INSTRUMENTAL_HINT, NO_VOCALS_HINT, resolve};
pub use stats::{
    LightingPattern, PromptMetadata, RoomStats, StyleIndicator, VibeDecision, WeatherSnapshot,
};
