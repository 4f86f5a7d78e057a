//! NATS message queue implementation

use crate::messaging::config::NatsConfig;
use crate::messaging::error::{MessagingError, MessagingResult};
use crate::messaging::traits::{MessageConsumer, MessageProducer, RawStream};
use async_nats::Client;
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tracing::info;

async fn connect(config: &NatsConfig) -> MessagingResult<Client> {
    let Some(server) = config.servers.first() else {
        return Err(MessagingError::ConfigurationError(
            "no NATS servers configured".to_string(),
        ));
    };

    let client = async_nats::ConnectOptions::new()
        .name(&config.connection_name)
        .connect(server)
        .await
        .map_err(|e| MessagingError::ConnectionFailed(format!("NATS connection failed: {}", e)))?;

    info!(server, "connected to NATS");
    Ok(client)
}

/// NATS producer
pub struct NatsProducer {
    client: Arc<Client>,
}

impl NatsProducer {
    /// Create a new NATS producer
    pub async fn new(config: &NatsConfig) -> MessagingResult<Self> {
        Ok(Self {
            client: Arc::new(connect(config).await?),
        })
    }
}

#[async_trait]
impl MessageProducer for NatsProducer {
    async fn publish_raw(&self, subject: &str, payload: Vec<u8>) -> MessagingResult<()> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| MessagingError::PublishFailed(format!("NATS publish failed: {}", e)))?;

        Ok(())
    }

    async fn is_connected(&self) -> bool {
        // async_nats Client doesn't have is_closed method
        // We assume connected if the client exists
        true
    }

    async fn close(&self) -> MessagingResult<()> {
        // NATS client closes automatically on drop
        Ok(())
    }
}

/// NATS consumer
pub struct NatsConsumer {
    client: Arc<Client>,
}

impl NatsConsumer {
    /// Create a new NATS consumer
    pub async fn new(config: &NatsConfig) -> MessagingResult<Self> {
        Ok(Self {
            client: Arc::new(connect(config).await?),
        })
    }
}

#[async_trait]
impl MessageConsumer for NatsConsumer {
    async fn subscribe(&self, subject: &str) -> MessagingResult<Box<dyn RawStream>> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| MessagingError::SubscribeFailed(format!("NATS subscribe failed: {}", e)))?;

        Ok(Box::new(NatsRawStream { subscriber }))
    }

    async fn is_connected(&self) -> bool {
        true
    }

    async fn close(&self) -> MessagingResult<()> {
        Ok(())
    }
}

/// NATS raw payload stream
pub struct NatsRawStream {
    subscriber: async_nats::Subscriber,
}

#[async_trait]
impl RawStream for NatsRawStream {
    async fn next(&mut self) -> MessagingResult<Option<Vec<u8>>> {
        Ok(self.subscriber.next().await.map(|msg| msg.payload.to_vec()))
    }
}
