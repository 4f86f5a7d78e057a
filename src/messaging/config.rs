//! Messaging configuration

use serde::{Deserialize, Serialize};

/// Messaging layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Whether the worker loop runs at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Subject carrying raw inbound events
    #[serde(default = "default_input_subject")]
    pub input_subject: String,

    /// Prefix of outbound subjects; the routing tag is appended
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// NATS connection settings
    #[serde(default)]
    pub nats: NatsConfig,
}

impl MessagingConfig {
    /// Outbound subject for a routing tag, e.g. `events.enriched.error`
    pub fn output_subject(&self, tag: &str) -> String {
        format!("{}.{}", self.output_prefix, tag)
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            input_subject: default_input_subject(),
            output_prefix: default_output_prefix(),
            nats: NatsConfig::default(),
        }
    }
}

/// NATS connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatsConfig {
    /// NATS server URLs
    #[serde(default = "default_nats_servers")]
    pub servers: Vec<String>,

    /// Connection name reported to the server
    #[serde(default = "default_connection_name")]
    pub connection_name: String,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: default_nats_servers(),
            connection_name: default_connection_name(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_input_subject() -> String {
    "events.raw".to_string()
}

fn default_output_prefix() -> String {
    "events.enriched".to_string()
}

fn default_nats_servers() -> Vec<String> {
    vec!["nats://localhost:4222".to_string()]
}

fn default_connection_name() -> String {
    "text-enrichment-worker".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_subject_appends_tag() {
        let config = MessagingConfig::default();
        assert_eq!(config.output_subject("enriched"), "events.enriched.enriched");
        assert_eq!(config.output_subject("error"), "events.enriched.error");
    }

    #[test]
    fn test_nats_defaults() {
        let config = NatsConfig::default();
        assert!(!config.servers.is_empty());
        assert_eq!(config.connection_name, "text-enrichment-worker");
    }
}
