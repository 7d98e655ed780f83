//! Tracing initialization for the Vibemuse MCP servers.
//!
//! This module provides utilities for initializing the tracing subscriber
//! with environment-based filtering via the `RUST_LOG` environment variable.
//!
//! # Usage
//!
//! ```no_run
//! use vibemuse_common::tracing::init_tracing;
//!
//! fn main() {
//!     // Initialize tracing at the start of your application
//!     init_tracing();
//!
//!     // Now you can use tracing macros
//!     tracing::info!("Application started");
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls the log level and filtering. Examples:
//!   - `RUST_LOG=debug` - Enable debug logging for all modules
//!   - `RUST_LOG=vibemuse_music=debug` - Enable debug for a specific crate
//!   - `RUST_LOG=warn,vibemuse_common=debug` - Warn by default, debug for common

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Initialize the tracing subscriber with environment-based filtering.
///
/// This function sets up the tracing subscriber with:
/// - Environment-based filtering via `RUST_LOG` (defaults to `info`)
/// - Target module names and log levels
///
/// # Panics
///
/// This function will panic if called more than once, as the global
/// subscriber can only be set once.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Initialize tracing with a custom default level.
///
/// Similar to `init_tracing()`, but allows specifying a default log level
/// when `RUST_LOG` is not set.
///
/// # Arguments
///
/// * `default_level` - The default log level (e.g., "debug", "info", "warn")
pub fn init_tracing_with_default(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
