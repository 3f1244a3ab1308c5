//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the puzzle session or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use glyph_core::{CombineOutcome, InstanceId, SelectionChange, SplitOutcome, Token};

use super::errors::{Result, RuntimeError};
use super::session::{LevelInfo, SessionSnapshot};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Adds a token picked up in the world to the pool.
    pub async fn acquire(&self, token: impl Into<Token>) -> Result<InstanceId> {
        let token = token.into();
        self.call(|reply| Command::Acquire { token, reply }).await?
    }

    /// Removes one instance from the pool.
    pub async fn remove(&self, id: InstanceId) -> Result<Token> {
        self.call(|reply| Command::Remove { id, reply }).await?
    }

    /// Flips the selection of an instance.
    pub async fn toggle(&self, id: InstanceId) -> Result<SelectionChange> {
        self.call(|reply| Command::Toggle { id, reply }).await?
    }

    pub async fn select(&self, id: InstanceId) -> Result<SelectionChange> {
        self.call(|reply| Command::Select { id, reply }).await?
    }

    pub async fn deselect(&self, id: InstanceId) -> Result<SelectionChange> {
        self.call(|reply| Command::Deselect { id, reply }).await?
    }

    pub async fn set_max_selection(&self, max_selection: usize) -> Result<()> {
        self.call(|reply| Command::SetMaxSelection {
            max_selection,
            reply,
        })
        .await
    }

    /// Presses the split button.
    pub async fn request_split(&self) -> Result<SplitOutcome> {
        self.call(|reply| Command::Split { reply }).await?
    }

    /// Presses the combine button.
    pub async fn request_combine(&self) -> Result<CombineOutcome> {
        self.call(|reply| Command::Combine { reply }).await?
    }

    /// Reports that the reward presentation for `token` has finished.
    pub async fn finalize_reward(&self, token: impl Into<Token>) -> Result<InstanceId> {
        let token = token.into();
        self.call(|reply| Command::FinalizeReward {
            token,
            generation: None,
            reply,
        })
        .await?
    }

    /// Like [`Self::finalize_reward`], but refused with
    /// [`RuntimeError::StaleReward`] unless the session is still on
    /// `generation`.
    pub async fn finalize_reward_for(
        &self,
        token: impl Into<Token>,
        generation: u64,
    ) -> Result<InstanceId> {
        let token = token.into();
        self.call(|reply| Command::FinalizeReward {
            token,
            generation: Some(generation),
            reply,
        })
        .await?
    }

    /// Resets the current level to its seed.
    pub async fn restart(&self) -> Result<()> {
        self.call(|reply| Command::Restart { reply }).await
    }

    /// Loads the next level once the current one is complete.
    ///
    /// Returns `None` when the completed level was the last one.
    pub async fn advance_level(&self) -> Result<Option<LevelInfo>> {
        self.call(|reply| Command::AdvanceLevel { reply }).await?
    }

    /// Query the current session state (read-only snapshot)
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.call(|reply| Command::Snapshot { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Pool` - Pool membership changes
    /// - `Topic::Operation` - Split/combine outcomes
    /// - `Topic::Progress` - Targets, levels and campaign completion
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut progress_rx = handle.subscribe(Topic::Progress);
    /// while let Ok(event) = progress_rx.recv().await {
    ///     // Handle progress events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    async fn call<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
