//! Topic-based event bus for runtime events.
//!
//! Engine events are re-published on specific topics, and consumers can
//! subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{OperationEvent, PoolEvent, ProgressEvent};
