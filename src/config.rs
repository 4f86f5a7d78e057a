use crate::messaging::MessagingConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Messaging configuration
    #[serde(default)]
    pub messaging: MessagingConfig,

    /// Test-data generator configuration
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: TEW_)
            .add_source(
                config::Environment::with_prefix("TEW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
            messaging: MessagingConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Default event generation rate (events per second)
    #[serde(default = "default_generation_rate")]
    pub default_rate_per_second: f64,

    /// Upper bound on events per generation request
    #[serde(default = "default_max_count")]
    pub max_count: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_rate_per_second: default_generation_rate(),
            max_count: default_max_count(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_generation_rate() -> f64 {
    10.0
}

fn default_max_count() -> usize {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_http_port(), 8080);
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_max_count(), 10_000);
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(config.messaging.enabled);
        assert_eq!(config.messaging.input_subject, "events.raw");
        assert_eq!(config.server.http_port, 8080);
    }
}
