use crate::models::{Event, TEXT_FIELDS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};

/// Entity type vocabulary
///
/// `Unknown` is reserved for candidates produced by the rule-based
/// fallback recognizer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum EntityType {
    Person,
    Location,
    Organization,
    Unknown,
}

/// A named entity extracted from a text segment.
///
/// `start_index`/`end_index` are byte offsets into the parent field's
/// original text (not the segment's local text); they slice the field
/// directly. Note that `end_index - start_index` is not guaranteed to
/// equal `text.len()`: the statistical path joins tokens with single
/// spaces while keeping token-span offsets, and the fallback path strips
/// punctuation from the matched word. Both divergences are part of the
/// output contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntity {
    pub text: String,

    #[serde(rename = "type")]
    pub entity_type: EntityType,

    pub start_index: usize,

    pub end_index: usize,

    /// Model score in [0.0, 1.0]; 1.0 when the model reports none,
    /// fixed 0.5 for fallback candidates
    pub confidence: f64,
}

/// A sentence-level segment of a field's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSegment {
    /// Trimmed segment content
    pub text: String,

    /// Byte offset of the segment within the parent field's text
    pub start_index: usize,

    /// Byte offset one past the segment's end
    pub end_index: usize,

    /// 1-based position among retained segments
    pub segment_number: usize,

    /// Entities in discovery order
    #[serde(default)]
    pub named_entities: Vec<NamedEntity>,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, start_index: usize, end_index: usize, segment_number: usize) -> Self {
        Self {
            text: text.into(),
            start_index,
            end_index,
            segment_number,
            named_entities: Vec::new(),
        }
    }
}

/// The enriched output unit: original event plus per-field annotations
/// and processing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent {
    /// Verbatim copy of the input event
    pub original_event: Event,

    /// Field name -> segments; only processed, non-blank fields appear
    #[serde(default)]
    pub enriched_fields: HashMap<String, Vec<TextSegment>>,

    /// Set at enrichment start
    pub processing_timestamp: DateTime<Utc>,

    /// Open metadata map; see the enrichment service for required keys
    #[serde(default)]
    pub enrichment_metadata: HashMap<String, serde_json::Value>,
}

impl EnrichedEvent {
    pub fn new(original_event: Event) -> Self {
        Self {
            original_event,
            enriched_fields: HashMap::new(),
            processing_timestamp: Utc::now(),
            enrichment_metadata: HashMap::new(),
        }
    }

    /// Store segments for a field; empty lists are not recorded
    pub fn add_enriched_field(&mut self, field_name: &str, segments: Vec<TextSegment>) {
        if !segments.is_empty() {
            self.enriched_fields.insert(field_name.to_string(), segments);
        }
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: serde_json::Value) {
        self.enrichment_metadata.insert(key.to_string(), value);
    }

    /// All segments across enriched fields, in fixed field order
    pub fn all_segments(&self) -> Vec<&TextSegment> {
        TEXT_FIELDS
            .iter()
            .filter_map(|field| self.enriched_fields.get(*field))
            .flatten()
            .collect()
    }

    /// All entities across all segments, in fixed field order
    pub fn all_entities(&self) -> Vec<&NamedEntity> {
        self.all_segments()
            .into_iter()
            .flat_map(|segment| segment.named_entities.iter())
            .collect()
    }
}
