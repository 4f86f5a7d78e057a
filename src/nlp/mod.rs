//! Text enrichment core: sentence segmentation and named-entity
//! extraction over a pluggable model backend.
//!
//! The statistical models (sentence boundary detector, tokenizer, one
//! recognizer per entity type) are opaque capabilities injected through
//! the traits in [`backend`]. Each capability has an independent
//! availability decision made once at startup: a missing capability
//! routes the corresponding sub-engine onto its deterministic rule-based
//! fallback, never onto an error.

mod backend;
mod engine;
mod extraction;
mod segmentation;

pub use backend::{
    EntityHit, EntityRecognizer, NlpBackend, RecognizerHandle, RecognizerSession,
    SentenceDetector, Token, Tokenizer,
};
pub use engine::TextEnrichmentEngine;
pub use extraction::EntityExtractor;
pub use segmentation::SegmentationEngine;
