//! Messaging layer: NATS transport, raw-payload producer/consumer
//! abstractions and the subscription-driven worker loop.

pub mod config;
pub mod error;
pub mod nats;
pub mod traits;
pub mod worker;

pub use config::{MessagingConfig, NatsConfig};
pub use error::{MessagingError, MessagingResult};
pub use nats::{NatsConsumer, NatsProducer};
pub use traits::{MessageConsumer, MessageProducer, RawStream};
pub use worker::EnrichmentWorker;
