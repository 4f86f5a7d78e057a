mod enriched;
mod event;

pub use enriched::{EnrichedEvent, EntityType, NamedEntity, TextSegment};
pub use event::{Event, TEXT_FIELDS};
