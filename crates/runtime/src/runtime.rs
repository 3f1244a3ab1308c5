//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a puzzle campaign.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use glyph_content::{ContentBundle, LevelCatalog};
use glyph_core::{CompositionTable, EngineConfig};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{EventBus, Topic};
use crate::workers::{Command, RewardWorker, SessionWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Finalize target rewards automatically after this delay. `None` leaves
    /// finalization to the client.
    pub reward_delay: Option<Duration>,
    /// Load the next level as soon as the current one completes.
    pub auto_advance: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            reward_delay: None,
            auto_advance: true,
        }
    }
}

/// Main runtime that orchestrates a puzzle session
///
/// Design: Runtime owns workers and coordinates execution.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    session_worker_handle: JoinHandle<()>,
    reward_worker_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The session worker stops once every handle, including clones given to
    /// clients, has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        if let Some(reward_handle) = self.reward_worker_handle {
            // The reward worker holds a handle of its own.
            reward_handle.abort();
            if let Err(error) = reward_handle.await
                && !error.is_cancelled()
            {
                return Err(RuntimeError::WorkerJoin(error));
            }
        }

        drop(self.handle);

        self.session_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    table: Option<Arc<CompositionTable>>,
    campaign: Option<LevelCatalog>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            table: None,
            campaign: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required composition table
    pub fn table(mut self, table: impl Into<Arc<CompositionTable>>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the levels to play, in order
    pub fn campaign(mut self, campaign: LevelCatalog) -> Self {
        self.campaign = Some(campaign);
        self
    }

    /// Use a loaded content bundle for the table, the campaign and the engine
    /// configuration.
    pub fn content(mut self, bundle: ContentBundle) -> Self {
        self.config.engine = bundle.config;
        self.table = Some(Arc::new(bundle.table));
        self.campaign = Some(bundle.catalog);
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let table = self.table.ok_or(RuntimeError::MissingTable)?;
        let campaign = self.campaign.ok_or(RuntimeError::EmptyCampaign)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        // Subscribe before the session worker starts so no outcome is missed.
        let reward_rx = self
            .config
            .reward_delay
            .map(|delay| (delay, event_bus.subscribe(Topic::Operation)));

        let session_worker = SessionWorker::new(
            table,
            campaign,
            self.config.engine.clone(),
            self.config.auto_advance,
            command_rx,
            event_bus,
        )?;

        let session_worker_handle = tokio::spawn(async move {
            session_worker.run().await;
        });

        let reward_worker_handle = reward_rx.map(|(delay, events)| {
            let reward_worker = RewardWorker::new(handle.clone(), events, delay);
            tokio::spawn(async move {
                reward_worker.run().await;
            })
        });

        Ok(Runtime {
            handle,
            session_worker_handle,
            reward_worker_handle,
        })
    }
}
