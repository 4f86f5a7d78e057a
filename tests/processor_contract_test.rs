//! Contract tests for message classification and routing: every raw
//! payload maps to exactly one outbound message tagged enriched,
//! skipped or error.

use serde_json::json;
use std::sync::Arc;
use text_enrichment_worker::enrichment::EventEnrichmentService;
use text_enrichment_worker::models::{EnrichedEvent, EntityType, Event};
use text_enrichment_worker::nlp::{
    EntityHit, EntityRecognizer, NlpBackend, TextEnrichmentEngine, Token, Tokenizer,
};
use text_enrichment_worker::processing::{
    EnrichmentProcessor, ErrorEnvelope, Outcome, TAG_ENRICHED, TAG_ERROR, TAG_SKIPPED,
};

fn processor() -> EnrichmentProcessor {
    processor_with_backend(NlpBackend::default())
}

fn processor_with_backend(backend: NlpBackend) -> EnrichmentProcessor {
    let engine = Arc::new(TextEnrichmentEngine::new(&backend));
    EnrichmentProcessor::new(Arc::new(EventEnrichmentService::new(engine)))
}

#[test]
fn test_enriched_event_carries_required_metadata() {
    let message = processor().process(br#"{"title":"Apple opened an office in Paris."}"#);
    assert_eq!(message.tag, TAG_ENRICHED);

    let enriched: EnrichedEvent = serde_json::from_slice(&message.payload).unwrap();
    for key in [
        "processedFields",
        "processingTimeMs",
        "totalSegments",
        "totalNamedEntities",
        "nlpModelsUsed",
        "status",
        "processor",
        "processedAt",
    ] {
        assert!(
            enriched.enrichment_metadata.contains_key(key),
            "missing metadata key {key}"
        );
    }
    assert_eq!(enriched.enrichment_metadata["status"], json!("enriched"));
    assert!(enriched.original_event.id.is_some());
    assert!(!enriched.enriched_fields.is_empty());
}

#[test]
fn test_textless_event_passes_through_as_skipped() {
    let message = processor().process(br#"{"id":"evt-42","metadata":{"k":"v"}}"#);
    assert_eq!(message.tag, TAG_SKIPPED);

    let passthrough: EnrichedEvent = serde_json::from_slice(&message.payload).unwrap();
    assert!(passthrough.enriched_fields.is_empty());
    assert_eq!(passthrough.enrichment_metadata["status"], json!("skipped"));
    assert_eq!(
        passthrough.enrichment_metadata["reason"],
        json!("no_text_fields")
    );
    assert_eq!(passthrough.original_event.id.as_deref(), Some("evt-42"));
    assert_eq!(
        passthrough.original_event.metadata["k"],
        json!("v")
    );
}

#[test]
fn test_blank_only_text_is_skipped() {
    let message = processor().process(br#"{"title":"   ","description":"\t"}"#);
    assert_eq!(message.tag, TAG_SKIPPED);
}

#[test]
fn test_malformed_payload_produces_error_envelope() {
    let message = processor().process(b"{\"title\": unterminated");
    assert_eq!(message.tag, TAG_ERROR);

    let envelope: ErrorEnvelope = serde_json::from_slice(&message.payload).unwrap();
    assert_eq!(envelope.error_type, "ENRICHMENT_ERROR");
    assert!(envelope.id.is_none());
    assert!(!envelope.error_message.is_empty());
}

#[test]
fn test_every_payload_maps_to_exactly_one_tag() {
    let processor = processor();
    let payloads: [&[u8]; 6] = [
        b"",
        b"null",
        b"[]",
        b"{}",
        b"\xff\xfe\x00",
        br#"{"content":"Plain valid text."}"#,
    ];

    for payload in payloads {
        let message = processor.process(payload);
        assert!(
            [TAG_ENRICHED, TAG_SKIPPED, TAG_ERROR].contains(&message.tag),
            "unexpected tag {}",
            message.tag
        );
        // Output is always parseable JSON
        serde_json::from_slice::<serde_json::Value>(&message.payload).unwrap();
    }
}

#[test]
fn test_classification_is_stable_across_runs() {
    let processor = processor();
    let payload = br#"{"id":"evt-7","title":"Stanford released a study. Tesla responded."}"#;

    let first = processor.classify(payload);
    let second = processor.classify(payload);

    let (Outcome::Enriched(a), Outcome::Enriched(b)) = (first, second) else {
        panic!("expected enriched outcomes");
    };
    assert_eq!(a.enriched_fields, b.enriched_fields);
    assert_eq!(
        a.enrichment_metadata["totalNamedEntities"],
        b.enrichment_metadata["totalNamedEntities"]
    );
}

#[test]
fn test_missing_id_is_assigned_before_publication() {
    let outcome = processor().classify(br#"{"title":"Something happened."}"#);
    let Outcome::Enriched(enriched) = outcome else {
        panic!("expected enriched outcome");
    };
    let id = enriched.original_event.id.unwrap();
    assert!(!id.is_empty());
}

// Fault injection through the model path

struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut search_from = 0;
        for word in text.split_whitespace() {
            let start = search_from + text[search_from..].find(word).unwrap();
            tokens.push(Token::new(word, start, start + word.len()));
            search_from = start + word.len();
        }
        tokens
    }
}

struct FaultingRecognizer;

impl EntityRecognizer for FaultingRecognizer {
    fn find(&mut self, tokens: &[Token]) -> Vec<EntityHit> {
        if tokens.iter().any(|t| t.text == "FAULT") {
            panic!("injected recognizer fault");
        }
        Vec::new()
    }

    fn clear_adaptive_data(&mut self) {}
}

fn faulting_processor() -> EnrichmentProcessor {
    let backend = NlpBackend::new()
        .with_tokenizer(Arc::new(WhitespaceTokenizer))
        .with_recognizer(EntityType::Person, Box::new(FaultingRecognizer));
    processor_with_backend(backend)
}

#[test]
fn test_model_fault_routes_event_to_error() {
    let message = faulting_processor().process(br#"{"id":"evt-9","title":"FAULT here."}"#);
    assert_eq!(message.tag, TAG_ERROR);

    let envelope: ErrorEnvelope = serde_json::from_slice(&message.payload).unwrap();
    assert_eq!(envelope.error_type, "ENRICHMENT_ERROR");
    assert_eq!(envelope.id.as_deref(), Some("evt-9"));
}

#[test]
fn test_fault_on_one_event_does_not_poison_the_next() {
    let processor = faulting_processor();

    let failed = processor.process(br#"{"title":"FAULT trigger."}"#);
    assert_eq!(failed.tag, TAG_ERROR);

    let healthy = processor.process(br#"{"title":"Normal text flows."}"#);
    assert_eq!(healthy.tag, TAG_ENRICHED);
}

#[test]
fn test_batch_enrichment_omits_failing_events_in_order() {
    let backend = NlpBackend::new()
        .with_tokenizer(Arc::new(WhitespaceTokenizer))
        .with_recognizer(EntityType::Person, Box::new(FaultingRecognizer));
    let engine = Arc::new(TextEnrichmentEngine::new(&backend));
    let service = EventEnrichmentService::new(engine);

    let events = vec![
        Event::new("First fine event.", "Alpha."),
        Event::new("FAULT in the middle.", "Beta."),
        Event::new("Third fine event.", "Gamma."),
    ];

    let enriched = service.enrich_events(&events);
    assert_eq!(enriched.len(), 2);
    assert_eq!(
        enriched[0].original_event.title.as_deref(),
        Some("First fine event.")
    );
    assert_eq!(
        enriched[1].original_event.title.as_deref(),
        Some("Third fine event.")
    );
}
