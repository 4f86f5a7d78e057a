use crate::enrichment::EventEnrichmentService;
use crate::models::{EnrichedEvent, Event};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use strum::Display;
use tracing::{debug, error, warn};

/// Routing tag for successfully enriched events.
pub const TAG_ENRICHED: &str = "enriched";
/// Routing tag for events passed through without enrichment.
pub const TAG_SKIPPED: &str = "skipped";
/// Routing tag for error envelopes.
pub const TAG_ERROR: &str = "error";

/// Identifier stamped into outbound metadata as `processor`.
pub const PROCESSOR_ID: &str = "text-enrichment-worker";

/// Emergency payload used when even the error envelope cannot be
/// serialized.
const FALLBACK_ERROR_JSON: &str = r#"{"error":"Failed to process message"}"#;

/// Terminal status of a processed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EnrichmentStatus {
    Enriched,
    Skipped,
    Error,
}

/// Envelope published on the error route instead of the event itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Event id when one could be recovered from the payload
    pub id: Option<String>,
    pub error_type: String,
    pub error_message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorEnvelope {
    pub fn new(id: Option<String>, error_type: &str, error_message: impl Into<String>) -> Self {
        Self {
            id,
            error_type: error_type.to_string(),
            error_message: error_message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Classification result for one inbound payload. Every payload maps to
/// exactly one variant; classification itself never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Enriched(EnrichedEvent),
    Skipped(EnrichedEvent),
    Error(ErrorEnvelope),
}

impl Outcome {
    pub fn status(&self) -> EnrichmentStatus {
        match self {
            Outcome::Enriched(_) => EnrichmentStatus::Enriched,
            Outcome::Skipped(_) => EnrichmentStatus::Skipped,
            Outcome::Error(_) => EnrichmentStatus::Error,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Enriched(_) => TAG_ENRICHED,
            Outcome::Skipped(_) => TAG_SKIPPED,
            Outcome::Error(_) => TAG_ERROR,
        }
    }
}

/// A serialized payload ready for publication, with its routing tag.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub payload: Vec<u8>,
    pub tag: &'static str,
}

/// Turns raw inbound bytes into routed outbound messages.
///
/// All failure modes terminate on the error route; no input, however
/// malformed, escapes without producing exactly one outbound message.
pub struct EnrichmentProcessor {
    service: Arc<EventEnrichmentService>,
}

impl EnrichmentProcessor {
    pub fn new(service: Arc<EventEnrichmentService>) -> Self {
        Self { service }
    }

    /// Classify a raw payload into its outcome.
    pub fn classify(&self, payload: &[u8]) -> Outcome {
        let mut event: Event = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "rejecting unparseable payload");
                return Outcome::Error(ErrorEnvelope::new(
                    None,
                    "ENRICHMENT_ERROR",
                    format!("Failed to parse event: {err}"),
                ));
            }
        };
        event.ensure_id();

        if !self.service.can_enrich(&event) {
            debug!(
                event_id = event.id.as_deref().unwrap_or_default(),
                "no text fields, passing through"
            );
            let mut passthrough = EnrichedEvent::new(event);
            Self::stamp(&mut passthrough, EnrichmentStatus::Skipped);
            passthrough.add_metadata("reason", json!("no_text_fields"));
            return Outcome::Skipped(passthrough);
        }

        match self.service.enrich_event(&event) {
            Ok(mut enriched) => {
                Self::stamp(&mut enriched, EnrichmentStatus::Enriched);
                Outcome::Enriched(enriched)
            }
            Err(err) => {
                error!(
                    event_id = event.id.as_deref().unwrap_or_default(),
                    error = %err,
                    "enrichment failed"
                );
                Outcome::Error(ErrorEnvelope::new(
                    event.id,
                    "ENRICHMENT_ERROR",
                    err.to_string(),
                ))
            }
        }
    }

    /// Classify and serialize a payload into its outbound message.
    pub fn process(&self, payload: &[u8]) -> OutboundMessage {
        let outcome = self.classify(payload);

        let serialized = match &outcome {
            Outcome::Enriched(event) | Outcome::Skipped(event) => serde_json::to_vec(event),
            Outcome::Error(envelope) => return Self::serialize_envelope(envelope),
        };

        match serialized {
            Ok(payload) => OutboundMessage {
                payload,
                tag: outcome.tag(),
            },
            Err(err) => {
                error!(error = %err, "failed to serialize enriched event");
                let id = match outcome {
                    Outcome::Enriched(event) | Outcome::Skipped(event) => event.original_event.id,
                    Outcome::Error(_) => None,
                };
                Self::serialize_envelope(&ErrorEnvelope::new(
                    id,
                    "SERIALIZATION_ERROR",
                    err.to_string(),
                ))
            }
        }
    }

    fn serialize_envelope(envelope: &ErrorEnvelope) -> OutboundMessage {
        let payload = serde_json::to_vec(envelope).unwrap_or_else(|err| {
            error!(error = %err, "failed to serialize error envelope");
            FALLBACK_ERROR_JSON.as_bytes().to_vec()
        });
        OutboundMessage {
            payload,
            tag: TAG_ERROR,
        }
    }

    fn stamp(enriched: &mut EnrichedEvent, status: EnrichmentStatus) {
        enriched.add_metadata("status", json!(status.to_string()));
        enriched.add_metadata("processor", json!(PROCESSOR_ID));
        enriched.add_metadata("processedAt", json!(Utc::now().to_rfc3339()));
    }
}
