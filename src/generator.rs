//! Test-data generation: publishes synthetic events to the input
//! subject at a configurable rate, for exercising the pipeline without
//! a real upstream producer.

use crate::messaging::{MessageProducer, MessagingResult};
use crate::models::Event;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

struct EventTemplate {
    category: &'static str,
    title: &'static str,
    content: &'static str,
}

const EVENT_TEMPLATES: [EventTemplate; 8] = [
    EventTemplate {
        category: "Tech News",
        title: "Apple Inc. announces breakthrough in artificial intelligence technology",
        content: "The technology giant Apple Inc., based in Cupertino California, announced today that its quarterly results exceeded expectations. The company's focus on machine learning and artificial intelligence continues to drive innovation.",
    },
    EventTemplate {
        category: "Business Update",
        title: "Microsoft and Google partnership drives cloud innovation",
        content: "Software giants Microsoft and Google announced a strategic partnership today. The collaboration focuses on cloud computing services and artificial intelligence development. Amazon's cloud division is expected to respond with new initiatives.",
    },
    EventTemplate {
        category: "Conference Event",
        title: "John Doe speaks at Microsoft conference in Seattle",
        content: "Software engineer John Doe will present his research on artificial intelligence at the Microsoft developer conference in Seattle. The presentation covers machine learning algorithms and their applications in enterprise software.",
    },
    EventTemplate {
        category: "Market Analysis",
        title: "Tesla stock surges after quarterly earnings report",
        content: "Electric vehicle manufacturer Tesla reported strong quarterly earnings today. CEO Elon Musk highlighted the company's progress in autonomous driving technology and battery innovation. Wall Street analysts predict continued growth.",
    },
    EventTemplate {
        category: "Research News",
        title: "Stanford University publishes breakthrough study",
        content: "Researchers at Stanford University in California published groundbreaking research on quantum computing. The study, led by Dr. Sarah Johnson, demonstrates significant advances in quantum error correction.",
    },
    EventTemplate {
        category: "International Event",
        title: "Global climate summit begins in Paris",
        content: "World leaders gather in Paris, France for the annual climate summit. The European Union and United States are expected to announce new environmental initiatives. China and India will also present their sustainability plans.",
    },
    EventTemplate {
        category: "Sports News",
        title: "NBA Finals reach exciting climax",
        content: "The Golden State Warriors face the Boston Celtics in Game 7 of the NBA Finals. Star players Stephen Curry and Jayson Tatum lead their respective teams. The game takes place at TD Garden in Boston, Massachusetts.",
    },
    EventTemplate {
        category: "Healthcare Innovation",
        title: "FDA approves revolutionary cancer treatment",
        content: "The Food and Drug Administration approved a new cancer treatment developed by Pfizer Inc. Clinical trials conducted at Johns Hopkins Hospital in Baltimore, Maryland showed promising results for patients with advanced melanoma.",
    },
];

const SENTENCE_SUBJECTS: [&str; 6] = [
    "The company",
    "Researchers",
    "The team",
    "Industry experts",
    "Analysts",
    "The organization",
];
const SENTENCE_VERBS: [&str; 6] = [
    "announced",
    "discovered",
    "developed",
    "revealed",
    "demonstrated",
    "achieved",
];
const SENTENCE_OBJECTS: [&str; 6] = [
    "significant progress",
    "breakthrough results",
    "innovative solutions",
    "new capabilities",
    "advanced technology",
    "important findings",
];
const SENTENCE_CONTEXTS: [&str; 6] = [
    "in this field",
    "for the industry",
    "with global impact",
    "through collaboration",
    "using cutting-edge methods",
    "ahead of schedule",
];

/// Outcome of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub success_count: usize,
    pub error_count: usize,
}

impl GenerationOutcome {
    pub fn total_count(&self) -> usize {
        self.success_count + self.error_count
    }
}

/// Publishes randomized template events to a subject.
pub struct TestDataGenerator {
    producer: Arc<dyn MessageProducer>,
    subject: String,
}

impl TestDataGenerator {
    pub fn new(producer: Arc<dyn MessageProducer>, subject: impl Into<String>) -> Self {
        Self {
            producer,
            subject: subject.into(),
        }
    }

    /// Generate `count` events at roughly `rate_per_second`. Publish
    /// failures are counted, not fatal.
    pub async fn generate(&self, count: usize, rate_per_second: f64) -> GenerationOutcome {
        info!(
            count,
            rate_per_second,
            subject = %self.subject,
            "starting test data generation"
        );

        let mut outcome = GenerationOutcome {
            success_count: 0,
            error_count: 0,
        };
        if count == 0 {
            return outcome;
        }

        let interval = if rate_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / rate_per_second)
        } else {
            Duration::ZERO
        };
        // StdRng is Send, which the await points below require
        let mut rng = StdRng::from_entropy();

        for sent in 0..count {
            if sent > 0 && !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }

            match self.publish_random_event(&mut rng).await {
                Ok(id) => {
                    debug!(event_id = %id, "test event published");
                    outcome.success_count += 1;
                }
                Err(err) => {
                    error!(error = %err, "failed to publish test event");
                    outcome.error_count += 1;
                }
            }
        }

        info!(
            success = outcome.success_count,
            errors = outcome.error_count,
            "test data generation finished"
        );
        outcome
    }

    async fn publish_random_event(&self, rng: &mut StdRng) -> MessagingResult<String> {
        let event = random_event(rng);
        let id = event.id.clone().unwrap_or_default();
        let payload = serde_json::to_vec(&event)?;
        self.producer.publish_raw(&self.subject, payload).await?;
        Ok(id)
    }
}

fn random_event(rng: &mut StdRng) -> Event {
    let template = &EVENT_TEMPLATES[rng.gen_range(0..EVENT_TEMPLATES.len())];

    let mut event = Event {
        id: Some(Uuid::new_v4().to_string()),
        title: Some(template.title.to_string()),
        content: Some(template.content.to_string()),
        timestamp: Utc::now(),
        ..Event::default()
    };

    // Vary the description between free text and a content excerpt
    event.description = Some(if rng.gen_bool(0.5) {
        format!("Additional details: {}", random_sentence(rng))
    } else {
        let excerpt_len = template
            .content
            .char_indices()
            .nth(100)
            .map_or(template.content.len(), |(index, _)| index);
        format!("{}: {}", template.category, &template.content[..excerpt_len])
    });

    if rng.gen_bool(0.3) {
        event.summary = Some(random_sentence(rng));
    }

    event
        .metadata
        .insert("eventType".to_string(), json!(template.category));
    event.metadata.insert("generated".to_string(), json!(true));
    event
        .metadata
        .insert("generator".to_string(), json!("TestDataGenerator"));

    event
}

fn random_sentence(rng: &mut StdRng) -> String {
    format!(
        "{} {} {} {}.",
        SENTENCE_SUBJECTS[rng.gen_range(0..SENTENCE_SUBJECTS.len())],
        SENTENCE_VERBS[rng.gen_range(0..SENTENCE_VERBS.len())],
        SENTENCE_OBJECTS[rng.gen_range(0..SENTENCE_OBJECTS.len())],
        SENTENCE_CONTEXTS[rng.gen_range(0..SENTENCE_CONTEXTS.len())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::MessagingError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct RecordingProducer {
        published: Mutex<Vec<(String, Vec<u8>)>>,
        fail: bool,
    }

    #[async_trait]
    impl MessageProducer for RecordingProducer {
        async fn publish_raw(&self, subject: &str, payload: Vec<u8>) -> MessagingResult<()> {
            if self.fail {
                return Err(MessagingError::PublishFailed("down".to_string()));
            }
            self.published.lock().push((subject.to_string(), payload));
            Ok(())
        }

        async fn is_connected(&self) -> bool {
            true
        }

        async fn close(&self) -> MessagingResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_generated_events_are_parseable() {
        let producer = Arc::new(RecordingProducer {
            published: Mutex::new(Vec::new()),
            fail: false,
        });
        let generator = TestDataGenerator::new(producer.clone(), "events.raw");

        let outcome = generator.generate(5, 0.0).await;
        assert_eq!(outcome.success_count, 5);
        assert_eq!(outcome.error_count, 0);

        let published = producer.published.lock();
        assert_eq!(published.len(), 5);
        for (subject, payload) in published.iter() {
            assert_eq!(subject, "events.raw");
            let event: Event = serde_json::from_slice(payload).unwrap();
            assert!(event.id.is_some());
            assert!(event.title.is_some());
            assert!(event.content.is_some());
            assert!(event.description.is_some());
            assert_eq!(event.metadata["generated"], json!(true));
        }
    }

    #[tokio::test]
    async fn test_publish_failures_are_counted() {
        let producer = Arc::new(RecordingProducer {
            published: Mutex::new(Vec::new()),
            fail: true,
        });
        let generator = TestDataGenerator::new(producer, "events.raw");

        let outcome = generator.generate(3, 0.0).await;
        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.error_count, 3);
        assert_eq!(outcome.total_count(), 3);
    }

    #[tokio::test]
    async fn test_zero_count_is_noop() {
        let producer = Arc::new(RecordingProducer {
            published: Mutex::new(Vec::new()),
            fail: false,
        });
        let generator = TestDataGenerator::new(producer.clone(), "events.raw");

        let outcome = generator.generate(0, 10.0).await;
        assert_eq!(outcome.total_count(), 0);
        assert!(producer.published.lock().is_empty());
    }
}
