//! Session worker that owns the authoritative [`glyph_core::PuzzleEngine`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs them against the
//! engine, publishes the resulting engine events to the EventBus and moves
//! the campaign forward when a level completes.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use glyph_content::LevelCatalog;
use glyph_core::{
    CombineOutcome, CompositionTable, EngineConfig, EngineEvent, InstanceId, LevelDefinition,
    PuzzleEngine, SelectionChange, SplitOutcome, Token,
};

use crate::api::{LevelInfo, Result, RuntimeError, SessionSnapshot};
use crate::events::{Event, EventBus, ProgressEvent};

/// Commands that can be sent to the session worker
pub enum Command {
    Acquire {
        token: Token,
        reply: oneshot::Sender<Result<InstanceId>>,
    },
    Remove {
        id: InstanceId,
        reply: oneshot::Sender<Result<Token>>,
    },
    Toggle {
        id: InstanceId,
        reply: oneshot::Sender<Result<SelectionChange>>,
    },
    Select {
        id: InstanceId,
        reply: oneshot::Sender<Result<SelectionChange>>,
    },
    Deselect {
        id: InstanceId,
        reply: oneshot::Sender<Result<SelectionChange>>,
    },
    SetMaxSelection {
        max_selection: usize,
        reply: oneshot::Sender<()>,
    },
    Split {
        reply: oneshot::Sender<Result<SplitOutcome>>,
    },
    Combine {
        reply: oneshot::Sender<Result<CombineOutcome>>,
    },
    /// `generation` is `None` for manual finalization; the reward worker
    /// passes the generation of the commit that started its timer.
    FinalizeReward {
        token: Token,
        generation: Option<u64>,
        reply: oneshot::Sender<Result<InstanceId>>,
    },
    Restart {
        reply: oneshot::Sender<()>,
    },
    AdvanceLevel {
        reply: oneshot::Sender<Result<Option<LevelInfo>>>,
    },
    /// Query the current session state (read-only).
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Background task that processes puzzle commands.
///
/// Owns the engine of the current level and the campaign cursor. Levels are
/// replaced wholesale: a new level gets a fresh engine over the shared table.
pub struct SessionWorker {
    table: Arc<CompositionTable>,
    catalog: LevelCatalog,
    engine_config: EngineConfig,
    auto_advance: bool,
    level_index: usize,
    /// Bumped whenever the engine's level instance is replaced or restarted.
    generation: u64,
    engine: PuzzleEngine,
    campaign_complete: bool,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SessionWorker {
    /// Creates a new session worker positioned on the first level.
    pub fn new(
        table: Arc<CompositionTable>,
        catalog: LevelCatalog,
        engine_config: EngineConfig,
        auto_advance: bool,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Result<Self> {
        let first = catalog.get(0).cloned().ok_or(RuntimeError::EmptyCampaign)?;
        let engine = PuzzleEngine::new(Arc::clone(&table), first, engine_config.clone());

        info!(
            levels = catalog.len(),
            compositions = table.len(),
            auto_advance,
            level = %engine.level().name,
            "SessionWorker initialized"
        );

        Ok(Self {
            table,
            catalog,
            engine_config,
            auto_advance,
            level_index: 0,
            generation: 0,
            engine,
            campaign_complete: false,
            command_rx,
            event_bus,
        })
    }

    /// Main worker loop.
    ///
    /// The first level is not announced on the bus; clients read it from a
    /// snapshot.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }

        debug!("SessionWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Acquire { token, reply } => {
                let id = self.engine.acquire(token);
                self.respond(reply, Ok(id), "Acquire");
            }
            Command::Remove { id, reply } => {
                let result = self.engine.remove(id).map_err(RuntimeError::from);
                self.respond(reply, result, "Remove");
            }
            Command::Toggle { id, reply } => {
                let result = self.engine.toggle(id).map_err(RuntimeError::from);
                self.respond(reply, result, "Toggle");
            }
            Command::Select { id, reply } => {
                let result = self.engine.select(id).map_err(RuntimeError::from);
                self.respond(reply, result, "Select");
            }
            Command::Deselect { id, reply } => {
                let result = self.engine.deselect(id).map_err(RuntimeError::from);
                self.respond(reply, result, "Deselect");
            }
            Command::SetMaxSelection {
                max_selection,
                reply,
            } => {
                self.engine.set_max_selection(max_selection);
                self.respond(reply, (), "SetMaxSelection");
            }
            Command::Split { reply } => {
                let result = self.engine.request_split().map_err(RuntimeError::from);
                self.respond(reply, result, "Split");
            }
            Command::Combine { reply } => {
                let result = self.engine.request_combine().map_err(RuntimeError::from);
                self.respond(reply, result, "Combine");
            }
            Command::FinalizeReward {
                token,
                generation,
                reply,
            } => {
                let result = self.finalize_reward(&token, generation);
                self.respond(reply, result, "FinalizeReward");
            }
            Command::Restart { reply } => {
                self.generation += 1;
                self.engine.restart();
                self.respond(reply, (), "Restart");
            }
            Command::AdvanceLevel { reply } => {
                let result = self.handle_advance();
                self.respond(reply, result, "AdvanceLevel");
            }
            Command::Snapshot { reply } => {
                let snapshot = self.snapshot();
                if reply.send(snapshot).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn finalize_reward(&mut self, token: &Token, generation: Option<u64>) -> Result<InstanceId> {
        if let Some(provided) = generation
            && provided != self.generation
        {
            warn!(
                %token,
                provided,
                current = self.generation,
                "dropping reward finalization from an earlier session generation"
            );
            return Err(RuntimeError::StaleReward {
                provided,
                current: self.generation,
            });
        }
        self.engine.finalize_reward(token).map_err(RuntimeError::from)
    }

    /// Publishes pending engine events, then replies.
    ///
    /// Events go out first so a caller that awaits the reply and then reads
    /// its subscription sees everything the command caused.
    fn respond<T>(&mut self, reply: oneshot::Sender<T>, value: T, command: &'static str) {
        self.flush_events();
        if reply.send(value).is_err() {
            debug!("{command} reply channel closed (caller dropped)");
        }
    }

    fn flush_events(&mut self) {
        let mut level_completed = false;
        for event in self.engine.drain_events() {
            level_completed |= event == EngineEvent::LevelCompleted;
            self.event_bus
                .publish(Event::from_engine(self.level_index, self.generation, event));
        }

        if level_completed && self.auto_advance {
            self.advance();
        }
    }

    fn handle_advance(&mut self) -> Result<Option<LevelInfo>> {
        if self.campaign_complete {
            return Err(RuntimeError::CampaignFinished);
        }
        if !self.engine.is_complete() {
            return Err(RuntimeError::LevelIncomplete {
                level: self.engine.level().name.clone(),
            });
        }
        Ok(self.advance())
    }

    /// Moves to the next level, or finishes the campaign after the last one.
    fn advance(&mut self) -> Option<LevelInfo> {
        let next = self.level_index + 1;
        match self.catalog.get(next).cloned() {
            Some(level) => {
                self.start_level(next, level);
                Some(self.level_info())
            }
            None => {
                if !self.campaign_complete {
                    self.campaign_complete = true;
                    info!(levels = self.catalog.len(), "campaign completed");
                    self.event_bus
                        .publish(Event::Progress(ProgressEvent::CampaignCompleted));
                }
                None
            }
        }
    }

    fn start_level(&mut self, index: usize, level: LevelDefinition) {
        if let Some(pending) = self.engine.phase().pending_reward() {
            debug!(%pending, "dropping pending reward with finished level");
        }
        self.level_index = index;
        self.generation += 1;
        self.engine = PuzzleEngine::new(Arc::clone(&self.table), level, self.engine_config.clone());
        self.announce_level();
    }

    fn announce_level(&self) {
        let name = self.engine.level().name.clone();
        info!(index = self.level_index, level = %name, "level started");
        self.event_bus
            .publish(Event::Progress(ProgressEvent::LevelStarted {
                index: self.level_index,
                name,
            }));
    }

    fn level_info(&self) -> LevelInfo {
        LevelInfo::new(self.level_index, self.catalog.len(), self.engine.level())
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            level: self.level_info(),
            campaign_complete: self.campaign_complete,
            puzzle: self.engine.snapshot(),
        }
    }
}
