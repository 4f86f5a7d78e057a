use crate::error::{AppError, Result};
use crate::models::{EnrichedEvent, Event, TEXT_FIELDS};
use crate::nlp::TextEnrichmentEngine;
use serde_json::json;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Applies text enrichment to each populated text field of an event and
/// records processing metadata on the result.
pub struct EventEnrichmentService {
    engine: Arc<TextEnrichmentEngine>,
}

impl EventEnrichmentService {
    pub fn new(engine: Arc<TextEnrichmentEngine>) -> Self {
        Self { engine }
    }

    /// Whether the event carries at least one non-blank text field.
    pub fn can_enrich(&self, event: &Event) -> bool {
        TEXT_FIELDS
            .iter()
            .any(|field| matches!(event.text_field(field), Some(text) if !text.trim().is_empty()))
    }

    /// Enrich a single event. Fields are processed in a fixed order and
    /// blank fields are skipped; the input event is embedded verbatim in
    /// the output.
    pub fn enrich_event(&self, event: &Event) -> Result<EnrichedEvent> {
        let started = Instant::now();
        let mut enriched = EnrichedEvent::new(event.clone());
        let mut processed_fields = Vec::new();
        let mut total_segments = 0usize;
        let mut total_entities = 0usize;

        for field in TEXT_FIELDS {
            let Some(text) = event.text_field(field) else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }

            // A model fault on one field poisons the whole event rather
            // than silently emitting a partial enrichment.
            let segments = catch_unwind(AssertUnwindSafe(|| self.engine.enrich(text)))
                .map_err(|_| {
                    AppError::Processing(format!("enrichment failed for field '{field}'"))
                })?;

            total_segments += segments.len();
            total_entities += segments
                .iter()
                .map(|segment| segment.named_entities.len())
                .sum::<usize>();

            debug!(
                field,
                segments = segments.len(),
                "field enriched"
            );

            enriched.add_enriched_field(field, segments);
            processed_fields.push(field);
        }

        enriched.add_metadata("processedFields", json!(processed_fields));
        enriched.add_metadata(
            "processingTimeMs",
            json!(started.elapsed().as_millis() as u64),
        );
        enriched.add_metadata("totalSegments", json!(total_segments));
        enriched.add_metadata("totalNamedEntities", json!(total_entities));
        enriched.add_metadata("nlpModelsUsed", json!(self.engine.models_used()));

        info!(
            event_id = event.id.as_deref().unwrap_or("<unassigned>"),
            fields = processed_fields.len(),
            segments = total_segments,
            entities = total_entities,
            "event enriched"
        );

        Ok(enriched)
    }

    /// Enrich a batch, best effort: failing events are logged and
    /// omitted, and input order is preserved among the survivors.
    pub fn enrich_events(&self, events: &[Event]) -> Vec<EnrichedEvent> {
        let mut results = Vec::with_capacity(events.len());

        for event in events {
            match self.enrich_event(event) {
                Ok(enriched) => results.push(enriched),
                Err(err) => {
                    error!(
                        event_id = event.id.as_deref().unwrap_or("<unassigned>"),
                        error = %err,
                        "dropping event from batch"
                    );
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::NlpBackend;

    fn service() -> EventEnrichmentService {
        EventEnrichmentService::new(Arc::new(TextEnrichmentEngine::new(&NlpBackend::default())))
    }

    #[test]
    fn test_can_enrich_requires_one_non_blank_field() {
        assert!(service().can_enrich(&Event::new("Title", "Description")));

        let content_only = Event {
            content: Some("Body text.".to_string()),
            ..Event::default()
        };
        assert!(service().can_enrich(&content_only));

        let blank = Event {
            title: Some("   ".to_string()),
            ..Event::default()
        };
        assert!(!service().can_enrich(&blank));
        assert!(!service().can_enrich(&Event::default()));
    }

    #[test]
    fn test_enrich_event_populates_fields_and_metadata() {
        let event = Event::new("Apple announced results.", "Tim Cook spoke in Cupertino.");
        let enriched = service().enrich_event(&event).unwrap();

        assert_eq!(enriched.original_event, event);
        assert!(enriched.enriched_fields.contains_key("title"));
        assert!(enriched.enriched_fields.contains_key("description"));
        assert!(!enriched.enriched_fields.contains_key("content"));

        let metadata = &enriched.enrichment_metadata;
        assert_eq!(metadata["processedFields"], json!(["title", "description"]));
        assert_eq!(metadata["nlpModelsUsed"], json!("rule-based-fallback"));
        assert!(metadata["processingTimeMs"].is_u64());

        let total_segments = metadata["totalSegments"].as_u64().unwrap() as usize;
        let total_entities = metadata["totalNamedEntities"].as_u64().unwrap() as usize;
        assert_eq!(total_segments, enriched.all_segments().len());
        assert_eq!(total_entities, enriched.all_entities().len());
        assert!(total_entities >= 3);
    }

    #[test]
    fn test_blank_fields_are_skipped_not_recorded() {
        let event = Event {
            title: Some("Real title here.".to_string()),
            description: Some("  \t ".to_string()),
            ..Event::default()
        };
        let enriched = service().enrich_event(&event).unwrap();

        assert_eq!(enriched.enriched_fields.len(), 1);
        assert_eq!(
            enriched.enrichment_metadata["processedFields"],
            json!(["title"])
        );
    }

    #[test]
    fn test_event_with_no_text_still_enriches_empty() {
        let enriched = service().enrich_event(&Event::default()).unwrap();
        assert!(enriched.enriched_fields.is_empty());
        assert_eq!(enriched.enrichment_metadata["totalSegments"], json!(0));
    }

    #[test]
    fn test_batch_preserves_order() {
        let events = vec![
            Event::new("First event.", "One."),
            Event::new("Second event.", "Two."),
        ];
        let enriched = service().enrich_events(&events);

        assert_eq!(enriched.len(), 2);
        assert_eq!(
            enriched[0].original_event.title.as_deref(),
            Some("First event.")
        );
        assert_eq!(
            enriched[1].original_event.title.as_deref(),
            Some("Second event.")
        );
    }
}
