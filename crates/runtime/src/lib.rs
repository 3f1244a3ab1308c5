//! Runtime orchestration for the glyph puzzle engine.
//!
//! This crate wires the synchronous [`glyph_core::PuzzleEngine`] into worker
//! tasks behind a cloneable async API. Consumers embed [`Runtime`] to drive a
//! campaign, subscribe to events, and interact with the pool through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{LevelInfo, Result, RuntimeError, RuntimeHandle, SessionSnapshot};
pub use events::{Event, EventBus, OperationEvent, PoolEvent, ProgressEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
