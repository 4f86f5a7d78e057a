//! Messaging trait abstractions
//!
//! The worker moves pre-serialized payloads: classification already
//! produced the outbound bytes, so the transport traits deal in raw
//! byte vectors rather than typed messages.

use crate::messaging::error::MessagingResult;
use async_trait::async_trait;

/// Message producer trait
#[async_trait]
pub trait MessageProducer: Send + Sync {
    /// Publish a raw payload to a subject
    async fn publish_raw(&self, subject: &str, payload: Vec<u8>) -> MessagingResult<()>;

    /// Check if the producer is connected
    async fn is_connected(&self) -> bool;

    /// Close the producer connection
    async fn close(&self) -> MessagingResult<()>;
}

/// Message consumer trait
#[async_trait]
pub trait MessageConsumer: Send + Sync {
    /// Subscribe to a subject and receive raw payloads
    async fn subscribe(&self, subject: &str) -> MessagingResult<Box<dyn RawStream>>;

    /// Check if the consumer is connected
    async fn is_connected(&self) -> bool;

    /// Close the consumer connection
    async fn close(&self) -> MessagingResult<()>;
}

/// Stream of raw inbound payloads
#[async_trait]
pub trait RawStream: Send + Sync {
    /// Next payload, or `None` when the subscription ends
    async fn next(&mut self) -> MessagingResult<Option<Vec<u8>>>;
}
