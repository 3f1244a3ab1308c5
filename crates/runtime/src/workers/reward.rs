//! Reward finalizer worker.
//!
//! Stands in for the presentation layer's fly-to-destination animation: when
//! a combine produces a target, waits for the configured delay and then
//! reports the animation as finished through the regular handle.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

use crate::api::{RuntimeError, RuntimeHandle};
use crate::events::Event;

/// Background worker that finalizes deferred target rewards.
pub struct RewardWorker {
    handle: RuntimeHandle,
    events: broadcast::Receiver<Event>,
    delay: Duration,
}

impl RewardWorker {
    /// `events` must be subscribed to [`crate::Topic::Operation`].
    pub fn new(handle: RuntimeHandle, events: broadcast::Receiver<Event>, delay: Duration) -> Self {
        Self {
            handle,
            events,
            delay,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        info!(delay_ms = self.delay.as_millis() as u64, "RewardWorker started");

        loop {
            match self.events.recv().await {
                Ok(Event::Operation(event)) => {
                    let Some(token) = event.pending_reward().cloned() else {
                        continue;
                    };
                    debug!(
                        %token,
                        level = event.level,
                        generation = event.generation,
                        "reward pending, animating"
                    );
                    time::sleep(self.delay).await;

                    // A restart or level change during the delay makes the
                    // generation stale and the session refuses it.
                    match self
                        .handle
                        .finalize_reward_for(token.clone(), event.generation)
                        .await
                    {
                        Ok(id) => debug!(%token, %id, "reward finalized"),
                        Err(RuntimeError::StaleReward { .. }) => {
                            debug!(%token, "reward outlived its level instance")
                        }
                        Err(error) => warn!(%token, %error, "reward finalization failed"),
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "RewardWorker lagged behind operation events");
                }
                Err(RecvError::Closed) => break,
            }
        }

        debug!("RewardWorker stopped");
    }
}
