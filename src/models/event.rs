use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Text-bearing fields of an event, in processing order.
pub const TEXT_FIELDS: [&str; 4] = ["title", "description", "content", "summary"];

/// An inbound event delivered by the transport layer.
///
/// All text fields are optional; unknown JSON fields are ignored so that
/// upstream producers can evolve their payloads without breaking this
/// worker. The event is read-only once handed to the enrichment service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier; assigned before processing if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Short headline text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Longer descriptive text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Full body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Condensed text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Creation time; defaults to ingestion time when absent
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Opaque producer metadata, passed through unchanged
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Event {
    /// Create an event with the two most common text fields populated
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            description: Some(description.into()),
            content: None,
            summary: None,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Assign a fresh id if none is present or the present one is empty
    pub fn ensure_id(&mut self) {
        let missing = self.id.as_deref().map_or(true, str::is_empty);
        if missing {
            self.id = Some(Uuid::new_v4().to_string());
        }
    }

    /// Look up a text field by its wire name
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => self.title.as_deref(),
            "description" => self.description.as_deref(),
            "content" => self.content.as_deref(),
            "summary" => self.summary.as_deref(),
            _ => None,
        }
    }
}

impl Default for Event {
    fn default() -> Self {
        Self {
            id: None,
            title: None,
            description: None,
            content: None,
            summary: None,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_id_assigns_when_missing() {
        let mut event = Event::new("Title", "Description");
        assert!(event.id.is_none());

        event.ensure_id();
        let id = event.id.clone().unwrap();
        assert!(!id.is_empty());

        // A present id is kept
        event.ensure_id();
        assert_eq!(event.id.unwrap(), id);
    }

    #[test]
    fn test_ensure_id_replaces_empty() {
        let mut event = Event {
            id: Some(String::new()),
            ..Event::default()
        };
        event.ensure_id();
        assert!(!event.id.unwrap().is_empty());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{"title":"T","someFutureField":42}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_text_field_lookup() {
        let event = Event {
            content: Some("body".to_string()),
            ..Event::default()
        };
        assert_eq!(event.text_field("content"), Some("body"));
        assert_eq!(event.text_field("title"), None);
        assert_eq!(event.text_field("nope"), None);
    }
}
