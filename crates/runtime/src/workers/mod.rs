//! Worker tasks that back the runtime orchestration.
//!
//! The session worker executes puzzle commands, while the reward worker
//! plays the part of the presentation layer for deferred rewards.

mod reward;
mod session;

pub use reward::RewardWorker;
pub use session::{Command, SessionWorker};
