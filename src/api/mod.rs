pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::config::GeneratorConfig;
use crate::generator::TestDataGenerator;
use crate::nlp::TextEnrichmentEngine;
use crate::processing::EnrichmentProcessor;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<EnrichmentProcessor>,
    pub engine: Arc<TextEnrichmentEngine>,
    pub generator: Option<Arc<TestDataGenerator>>,
    pub generator_config: GeneratorConfig,
}

impl AppState {
    pub fn new(processor: Arc<EnrichmentProcessor>, engine: Arc<TextEnrichmentEngine>) -> Self {
        Self {
            processor,
            engine,
            generator: None,
            generator_config: GeneratorConfig::default(),
        }
    }

    /// Attach the test-data generator; absent when messaging is disabled
    pub fn with_generator(
        mut self,
        generator: Arc<TestDataGenerator>,
        config: GeneratorConfig,
    ) -> Self {
        self.generator = Some(generator);
        self.generator_config = config;
        self
    }
}
