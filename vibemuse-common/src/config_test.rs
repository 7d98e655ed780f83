//! Tests for the configuration module.
//!
//! These tests verify configuration struct behavior and key-requirement
//! helpers without unsafe environment variable manipulation.

use proptest::prelude::*;

/// Strategy for generating plausible API keys
fn api_key_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{16,48}"
}

/// Strategy for generating valid port numbers
fn port_strategy() -> impl Strategy<Value = u16> {
    1024u16..65535u16
}

#[cfg(test)]
mod config_logic_tests {
    use crate::config::{
        Config, DEFAULT_MUSIC_ENDPOINT, DEFAULT_MUSIC_FORMAT, DEFAULT_MUSIC_MODEL,
        DEFAULT_WEATHER_ENDPOINT,
    };
    use crate::error::ConfigError;

    /// Directly test Config construction with known values
    #[test]
    fn config_struct_holds_values_correctly() {
        let config = Config {
            elevenlabs_api_key: Some("el-key".to_string()),
            openweather_api_key: Some("ow-key".to_string()),
            port: 9090,
            ..Config::default()
        };

        assert_eq!(config.elevenlabs_api_key.as_deref(), Some("el-key"));
        assert_eq!(config.openweather_api_key.as_deref(), Some("ow-key"));
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn default_config_points_at_public_endpoints() {
        let config = Config::default();
        assert_eq!(config.music_endpoint, DEFAULT_MUSIC_ENDPOINT);
        assert_eq!(config.music_model, DEFAULT_MUSIC_MODEL);
        assert_eq!(config.music_output_format, DEFAULT_MUSIC_FORMAT);
        assert_eq!(config.weather_endpoint, DEFAULT_WEATHER_ENDPOINT);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn require_elevenlabs_key_errors_when_absent() {
        let config = Config::default();
        let err = config.require_elevenlabs_key().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref name) if name == "ELEVENLABS_API_KEY"));
    }

    #[test]
    fn require_openweather_key_errors_when_absent() {
        let config = Config::default();
        let err = config.require_openweather_key().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref name) if name == "OPENWEATHER_API_KEY"));
    }

    #[test]
    fn require_helpers_return_key_when_present() {
        let config = Config {
            elevenlabs_api_key: Some("el-key".to_string()),
            openweather_api_key: Some("ow-key".to_string()),
            ..Config::default()
        };

        assert_eq!(config.require_elevenlabs_key().unwrap(), "el-key");
        assert_eq!(config.require_openweather_key().unwrap(), "ow-key");
    }

    /// Test that Config can be cloned
    #[test]
    fn config_is_cloneable() {
        let config = Config {
            elevenlabs_api_key: Some("el-key".to_string()),
            ..Config::default()
        };

        let cloned = config.clone();
        assert_eq!(config.elevenlabs_api_key, cloned.elevenlabs_api_key);
        assert_eq!(config.music_endpoint, cloned.music_endpoint);
        assert_eq!(config.port, cloned.port);
    }
}

/// Property-based tests for configuration invariants
#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::config::Config;

    proptest! {
        /// For any API key, the require helper returns it verbatim.
        #[test]
        fn require_elevenlabs_key_preserves_key(key in api_key_strategy()) {
            let config = Config {
                elevenlabs_api_key: Some(key.clone()),
                ..Config::default()
            };
            prop_assert_eq!(config.require_elevenlabs_key().unwrap(), key.as_str());
        }

        /// For any valid port number, a Config struct preserves it exactly.
        #[test]
        fn config_preserves_port(port in port_strategy()) {
            let config = Config { port, ..Config::default() };
            prop_assert_eq!(config.port, port);
        }
    }
}
