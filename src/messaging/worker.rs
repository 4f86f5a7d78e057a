//! The subscription-driven worker loop.

use crate::messaging::config::MessagingConfig;
use crate::messaging::error::MessagingResult;
use crate::messaging::traits::{MessageConsumer, MessageProducer};
use crate::processing::EnrichmentProcessor;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Consumes raw events from the input subject, processes each one and
/// publishes the result to the tag-routed output subject.
pub struct EnrichmentWorker {
    processor: Arc<EnrichmentProcessor>,
    producer: Arc<dyn MessageProducer>,
    consumer: Arc<dyn MessageConsumer>,
    config: MessagingConfig,
}

impl EnrichmentWorker {
    pub fn new(
        processor: Arc<EnrichmentProcessor>,
        producer: Arc<dyn MessageProducer>,
        consumer: Arc<dyn MessageConsumer>,
        config: MessagingConfig,
    ) -> Self {
        Self {
            processor,
            producer,
            consumer,
            config,
        }
    }

    /// Run the consume/process/publish loop until the subscription ends.
    /// Publish failures are logged and do not stop the loop; every
    /// consumed payload is processed exactly once.
    pub async fn run(&self) -> MessagingResult<()> {
        let mut stream = self.consumer.subscribe(&self.config.input_subject).await?;
        info!(subject = %self.config.input_subject, "worker subscribed");

        loop {
            let payload = match stream.next().await {
                Ok(Some(payload)) => payload,
                Ok(None) => {
                    info!("input subscription closed, worker stopping");
                    return Ok(());
                }
                Err(err) => {
                    error!(error = %err, "consume failed, worker stopping");
                    return Err(err);
                }
            };

            let outbound = self.processor.process(&payload);
            let subject = self.config.output_subject(outbound.tag);

            if let Err(err) = self.producer.publish_raw(&subject, outbound.payload).await {
                warn!(subject = %subject, error = %err, "failed to publish result");
            }
        }
    }
}
