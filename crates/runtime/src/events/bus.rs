//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use glyph_core::EngineEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{OperationEvent, PoolEvent, ProgressEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Pool membership changes
    Pool,
    /// Split/combine outcomes
    Operation,
    /// Target, level and campaign progress
    Progress,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Pool, Topic::Operation, Topic::Progress];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Pool(PoolEvent),
    Operation(OperationEvent),
    Progress(ProgressEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Pool(_) => Topic::Pool,
            Event::Operation(_) => Topic::Operation,
            Event::Progress(_) => Topic::Progress,
        }
    }

    /// Tags an engine event with the level index and session generation
    /// that emitted it.
    pub fn from_engine(level: usize, generation: u64, event: EngineEvent) -> Self {
        match event {
            EngineEvent::PoolChanged { added, removed } => Event::Pool(PoolEvent {
                level,
                added,
                removed,
            }),
            EngineEvent::OperationOutcome(outcome) => {
                Event::Operation(OperationEvent {
                    level,
                    generation,
                    outcome,
                })
            }
            EngineEvent::TargetCompleted(token) => {
                Event::Progress(ProgressEvent::TargetCompleted { level, token })
            }
            EngineEvent::LevelCompleted => Event::Progress(ProgressEvent::LevelCompleted { level }),
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels for every topic exist from construction
/// on and are never replaced.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic is registered in `with_capacity`.
            None => broadcast::channel(1).1,
        }
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
