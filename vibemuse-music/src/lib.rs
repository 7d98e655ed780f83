//! Vibemuse Music Server Library
//!
//! This library provides instrumental music generation via the ElevenLabs
//! Music API, either directly from a style and description or from a creative
//! brief resolved out of room sensor readings.

pub mod handler;
pub mod server;

pub use handler::{GeneratedTrack, MusicGenerateParams, MusicHandler};
pub use server::MusicServer;
