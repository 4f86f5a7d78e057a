use crate::models::EntityType;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A token produced by the tokenizer, with its byte span in the
/// tokenized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// An entity found by a recognizer: a token-index span `[start_token,
/// end_token)` plus the model's score, if it reports one.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityHit {
    pub start_token: usize,
    pub end_token: usize,
    pub confidence: Option<f64>,
}

/// Sentence-boundary detection capability.
pub trait SentenceDetector: Send + Sync {
    /// Byte spans of detected sentences, left to right.
    fn detect_spans(&self, text: &str) -> Vec<(usize, usize)>;
}

/// Tokenization capability.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Per-entity-type recognition capability.
///
/// Recognizers may hold adaptive/contextual state across `find` calls;
/// that state must not leak between unrelated segments or events, so
/// callers go through [`RecognizerHandle::session`] which clears it on
/// every exit path.
pub trait EntityRecognizer: Send + Sync {
    fn find(&mut self, tokens: &[Token]) -> Vec<EntityHit>;

    /// Drop any adaptive state accumulated by `find`.
    fn clear_adaptive_data(&mut self);
}

/// A recognizer bound to its entity type, guarded for shared use across
/// concurrent extraction calls.
pub struct RecognizerHandle {
    entity_type: EntityType,
    recognizer: Mutex<Box<dyn EntityRecognizer>>,
}

impl RecognizerHandle {
    pub fn new(entity_type: EntityType, recognizer: Box<dyn EntityRecognizer>) -> Self {
        Self {
            entity_type,
            recognizer: Mutex::new(recognizer),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Acquire the recognizer for one extraction call. The returned
    /// session clears adaptive state when dropped, including on panic
    /// paths, so no context bleeds into the next call.
    pub fn session(&self) -> RecognizerSession<'_> {
        RecognizerSession {
            guard: self.recognizer.lock(),
        }
    }
}

/// Scoped recognizer access; see [`RecognizerHandle::session`].
pub struct RecognizerSession<'a> {
    guard: MutexGuard<'a, Box<dyn EntityRecognizer>>,
}

impl RecognizerSession<'_> {
    pub fn find(&mut self, tokens: &[Token]) -> Vec<EntityHit> {
        self.guard.find(tokens)
    }
}

impl Drop for RecognizerSession<'_> {
    fn drop(&mut self) {
        self.guard.clear_adaptive_data();
    }
}

/// The immutable set of loaded models, constructed once at startup and
/// shared read-only by every enrichment call.
///
/// An empty backend is valid: both sub-engines then run their rule-based
/// fallbacks. Availability is per capability, so it is expected that,
/// say, segmentation uses a model while extraction falls back.
pub struct NlpBackend {
    sentence_detector: Option<Arc<dyn SentenceDetector>>,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    recognizers: Vec<Arc<RecognizerHandle>>,
    identifier: String,
}

impl NlpBackend {
    pub fn new() -> Self {
        Self {
            sentence_detector: None,
            tokenizer: None,
            recognizers: Vec::new(),
            identifier: "rule-based-fallback".to_string(),
        }
    }

    pub fn with_sentence_detector(mut self, detector: Arc<dyn SentenceDetector>) -> Self {
        self.sentence_detector = Some(detector);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Register a recognizer. Registration order is recognition order.
    pub fn with_recognizer(
        mut self,
        entity_type: EntityType,
        recognizer: Box<dyn EntityRecognizer>,
    ) -> Self {
        self.recognizers
            .push(Arc::new(RecognizerHandle::new(entity_type, recognizer)));
        self
    }

    /// Implementation identifier reported in enrichment metadata
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn sentence_detector(&self) -> Option<Arc<dyn SentenceDetector>> {
        self.sentence_detector.clone()
    }

    pub fn tokenizer(&self) -> Option<Arc<dyn Tokenizer>> {
        self.tokenizer.clone()
    }

    pub fn recognizers(&self) -> Vec<Arc<RecognizerHandle>> {
        self.recognizers.clone()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl Default for NlpBackend {
    fn default() -> Self {
        Self::new()
    }
}
