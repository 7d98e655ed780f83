//! Vibemuse Common Library
//!
//! Shared utilities for configuration, error handling, the music style
//! registry, MCP transports, and tracing across the Vibemuse servers.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod server;
pub mod styles;
pub mod tracing;
pub mod transport;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod server_test;

pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use styles::{MUSIC_STYLES, MusicStyle, StyleRegistry};
pub use transport::{Transport, TransportArgs, TransportMode};
