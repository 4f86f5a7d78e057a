use crate::models::TextSegment;
use crate::nlp::backend::NlpBackend;
use crate::nlp::extraction::EntityExtractor;
use crate::nlp::segmentation::SegmentationEngine;
use tracing::debug;

/// Composes segmentation and entity extraction into a single text
/// enrichment operation.
///
/// Which path each sub-engine takes (statistical model or rule-based
/// fallback) is fixed at construction from the backend's capabilities;
/// the two decisions are independent.
pub struct TextEnrichmentEngine {
    segmentation: SegmentationEngine,
    extraction: EntityExtractor,
    identifier: String,
}

impl TextEnrichmentEngine {
    pub fn new(backend: &NlpBackend) -> Self {
        let segmentation = SegmentationEngine::new(backend.sentence_detector());
        let extraction = EntityExtractor::new(backend.tokenizer(), backend.recognizers());

        debug!(
            segmentation_model = segmentation.uses_model(),
            extraction_models = extraction.uses_models(),
            "text enrichment engine constructed"
        );

        Self {
            segmentation,
            extraction,
            identifier: backend.identifier().to_string(),
        }
    }

    /// Segment `text` and attach extracted entities to each segment.
    /// Blank input yields an empty result.
    pub fn enrich(&self, text: &str) -> Vec<TextSegment> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut segments = self.segmentation.segment(text);
        for segment in &mut segments {
            segment.named_entities = self
                .extraction
                .extract(&segment.text, segment.start_index);
        }

        debug!(segments = segments.len(), "text enrichment completed");
        segments
    }

    /// Implementation identifier reported as `nlpModelsUsed`
    pub fn models_used(&self) -> &str {
        &self.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityType;

    fn engine() -> TextEnrichmentEngine {
        TextEnrichmentEngine::new(&NlpBackend::default())
    }

    #[test]
    fn test_blank_input_yields_empty() {
        assert!(engine().enrich("").is_empty());
        assert!(engine().enrich("   ").is_empty());
    }

    #[test]
    fn test_entities_attached_with_field_offsets() {
        let text = "Alice met Bob. Then Carol arrived.";
        let segments = engine().enrich(text);

        assert_eq!(segments.len(), 2);

        let first = &segments[0];
        assert_eq!(first.text, "Alice met Bob.");
        let names: Vec<_> = first.named_entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);

        let second = &segments[1];
        assert_eq!(second.start_index, 15);
        let carol = second
            .named_entities
            .iter()
            .find(|e| e.text == "Carol")
            .expect("Carol detected");
        // Offsets are into the parent text, not the segment
        assert_eq!(&text[carol.start_index..carol.end_index], "Carol");
        assert_eq!(carol.entity_type, EntityType::Unknown);
    }

    #[test]
    fn test_models_used_identifier() {
        assert_eq!(engine().models_used(), "rule-based-fallback");
    }
}
