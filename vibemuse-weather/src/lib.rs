//! Vibemuse Weather Server Library
//!
//! This library provides current-weather lookups via the OpenWeatherMap API,
//! classified into coarse buckets (sunny/cloudy/rainy/windy/night) for music
//! selection.

pub mod handler;
pub mod server;

pub use handler::{
    WeatherBucket, WeatherHandler, WeatherReport, bucket_for_condition, classify,
};
pub use server::WeatherServer;
