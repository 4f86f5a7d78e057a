use crate::models::TextSegment;
use crate::nlp::backend::SentenceDetector;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// Break after a sentence-terminal punctuation mark followed by
/// whitespace. The match starts on the punctuation character, which
/// stays with the preceding chunk.
static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Splits a text string into non-overlapping sentence-like segments with
/// byte offsets into the input, via the sentence-boundary model when one
/// is loaded and a punctuation-based splitter otherwise.
pub struct SegmentationEngine {
    detector: Option<Arc<dyn SentenceDetector>>,
}

impl SegmentationEngine {
    pub fn new(detector: Option<Arc<dyn SentenceDetector>>) -> Self {
        Self { detector }
    }

    pub fn uses_model(&self) -> bool {
        self.detector.is_some()
    }

    /// Segment `text` into sentences. Empty and blank input yields an
    /// empty result. Segment numbering is dense and 1-based over the
    /// retained (non-blank) segments.
    pub fn segment(&self, text: &str) -> Vec<TextSegment> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        match &self.detector {
            Some(detector) => Self::segment_with_model(detector.as_ref(), text),
            None => Self::segment_fallback(text),
        }
    }

    fn segment_with_model(detector: &dyn SentenceDetector, text: &str) -> Vec<TextSegment> {
        let mut segments = Vec::new();

        for (start, end) in detector.detect_spans(text) {
            // Tolerate a misbehaving model: spans that don't slice cleanly
            // are dropped, not fatal.
            let Some(raw) = text.get(start..end) else {
                debug!(start, end, "discarding unsliceable sentence span");
                continue;
            };
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            segments.push(TextSegment::new(trimmed, start, end, segments.len() + 1));
        }

        segments
    }

    fn segment_fallback(text: &str) -> Vec<TextSegment> {
        let mut chunks = Vec::new();
        let mut last = 0;
        for break_match in SENTENCE_BREAK.find_iter(text) {
            // Keep the terminal punctuation character with its sentence.
            chunks.push(&text[last..break_match.start() + 1]);
            last = break_match.end();
        }
        chunks.push(&text[last..]);

        let mut segments = Vec::new();
        let mut search_from = 0;
        for chunk in chunks {
            let trimmed = chunk.trim();
            if trimmed.is_empty() {
                continue;
            }

            // Relocate the trimmed chunk left-to-right from the previous
            // segment's end so repeated substrings resolve to the right
            // occurrence.
            let Some(relative) = text.get(search_from..).and_then(|rest| rest.find(trimmed))
            else {
                debug!(chunk = trimmed, "segment chunk not found in source text, skipping");
                continue;
            };
            let start = search_from + relative;
            let end = start + trimmed.len();

            segments.push(TextSegment::new(trimmed, start, end, segments.len() + 1));
            search_from = end;
        }

        segments
    }
}
