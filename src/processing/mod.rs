//! Message-level processing: classifies raw inbound payloads into an
//! enriched, skipped, or error outcome and produces the routed outbound
//! message for each.

mod processor;

pub use processor::{
    EnrichmentProcessor, EnrichmentStatus, ErrorEnvelope, Outcome, OutboundMessage,
    PROCESSOR_ID, TAG_ENRICHED, TAG_ERROR, TAG_SKIPPED,
};
