//! Listener settings for the service binaries

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Where a service listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load `{PREFIX}_HOST` / `{PREFIX}_PORT`, falling back to `0.0.0.0` and
    /// `default_port`.
    pub fn from_env(prefix: &str, default_port: u16) -> Result<Self> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_apply_without_environment() {
        unsafe {
            std::env::remove_var("SETTINGS_TEST_HOST");
            std::env::remove_var("SETTINGS_TEST_PORT");
        }

        let config = ServerConfig::from_env("SETTINGS_TEST", 3001).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
    }

    #[test]
    #[serial]
    fn environment_overrides_defaults() {
        unsafe {
            std::env::set_var("SETTINGS_TEST_HOST", "127.0.0.1");
            std::env::set_var("SETTINGS_TEST_PORT", "8088");
        }

        let config = ServerConfig::from_env("SETTINGS_TEST", 3001).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8088);

        unsafe {
            std::env::remove_var("SETTINGS_TEST_HOST");
            std::env::remove_var("SETTINGS_TEST_PORT");
        }
    }

    #[test]
    #[serial]
    fn invalid_port_is_an_error() {
        unsafe {
            std::env::set_var("SETTINGS_TEST_PORT", "not-a-port");
        }

        assert!(ServerConfig::from_env("SETTINGS_TEST", 3001).is_err());

        unsafe {
            std::env::remove_var("SETTINGS_TEST_PORT");
        }
    }
}
