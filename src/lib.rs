//! Streaming text-enrichment worker.
//!
//! Consumes JSON events, segments their text fields into sentences,
//! tags candidate named entities and republishes each event on an
//! outcome-routed subject (`enriched`, `skipped` or `error`). A small
//! HTTP surface exposes the same pipeline for debugging plus a
//! test-data generator.

pub mod api;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod generator;
pub mod messaging;
pub mod models;
pub mod nlp;
pub mod processing;

pub use config::Config;
pub use enrichment::EventEnrichmentService;
pub use error::{AppError, Result};
pub use nlp::{NlpBackend, TextEnrichmentEngine};
pub use processing::{EnrichmentProcessor, Outcome};
