use crate::models::{EntityType, NamedEntity};
use crate::nlp::backend::{RecognizerHandle, Tokenizer};
use std::sync::Arc;

/// Punctuation stripped from fallback candidate words.
const STRIPPED_PUNCTUATION: [char; 6] = ['.', '!', '?', ',', ':', ';'];

/// Extracts candidate named entities from a segment's text.
///
/// Returned offsets are already translated into the parent field's
/// coordinate space; callers must not add the segment offset again.
pub struct EntityExtractor {
    tokenizer: Option<Arc<dyn Tokenizer>>,
    recognizers: Vec<Arc<RecognizerHandle>>,
}

impl EntityExtractor {
    pub fn new(
        tokenizer: Option<Arc<dyn Tokenizer>>,
        recognizers: Vec<Arc<RecognizerHandle>>,
    ) -> Self {
        Self {
            tokenizer,
            recognizers,
        }
    }

    /// The statistical path needs both a tokenizer and at least one
    /// recognizer; anything less runs the fallback.
    pub fn uses_models(&self) -> bool {
        self.tokenizer.is_some() && !self.recognizers.is_empty()
    }

    /// Extract entities from `text`, a segment whose first byte sits at
    /// `segment_offset` within the parent field. Never fails: arbitrary
    /// input (empty, non-alphabetic, etc.) yields an empty list at worst.
    pub fn extract(&self, text: &str, segment_offset: usize) -> Vec<NamedEntity> {
        if text.is_empty() {
            return Vec::new();
        }

        match &self.tokenizer {
            Some(tokenizer) if !self.recognizers.is_empty() => {
                self.extract_with_models(tokenizer.as_ref(), text, segment_offset)
            }
            _ => Self::extract_fallback(text, segment_offset),
        }
    }

    fn extract_with_models(
        &self,
        tokenizer: &dyn Tokenizer,
        text: &str,
        segment_offset: usize,
    ) -> Vec<NamedEntity> {
        let tokens = tokenizer.tokenize(text);
        let mut entities = Vec::new();

        for handle in &self.recognizers {
            // The session guard resets the recognizer's adaptive state on
            // every exit path, so nothing leaks into later segments.
            let mut session = handle.session();

            for hit in session.find(&tokens) {
                let Some(first) = tokens.get(hit.start_token) else {
                    continue;
                };
                let Some(last) = hit
                    .end_token
                    .checked_sub(1)
                    .and_then(|index| tokens.get(index))
                else {
                    continue;
                };

                // Join covered tokens with single spaces. The offsets come
                // from the token span boundaries instead, so the entity
                // text length and the span width may diverge; that is the
                // defined output.
                let joined = tokens[hit.start_token..hit.end_token]
                    .iter()
                    .map(|token| token.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");

                entities.push(NamedEntity {
                    text: joined,
                    entity_type: handle.entity_type(),
                    start_index: segment_offset + first.start,
                    end_index: segment_offset + last.end,
                    confidence: hit.confidence.unwrap_or(1.0),
                });
            }
        }

        entities
    }

    fn extract_fallback(text: &str, segment_offset: usize) -> Vec<NamedEntity> {
        let mut entities = Vec::new();
        let mut search_from = 0;

        for word in text.split_whitespace() {
            let Some(relative) = text.get(search_from..).and_then(|rest| rest.find(word)) else {
                continue;
            };
            let word_start = search_from + relative;
            let word_end = word_start + word.len();

            let cleaned: String = word
                .chars()
                .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
                .collect();

            let mut chars = cleaned.chars();
            let is_candidate = matches!(chars.next(), Some(first) if first.is_uppercase())
                && chars.next().is_some();

            if is_candidate {
                // The entity text is the cleaned word, and the consumed
                // span is the cleaned length from the original position.
                entities.push(NamedEntity {
                    end_index: segment_offset + word_start + cleaned.len(),
                    start_index: segment_offset + word_start,
                    text: cleaned,
                    entity_type: EntityType::Unknown,
                    confidence: 0.5,
                });
            }

            search_from = word_end;
        }

        entities
    }
}
