//! Event-level enrichment: applies the text enrichment engine to every
//! text-bearing field of an event and assembles the enriched output.

mod service;

pub use service::EventEnrichmentService;
