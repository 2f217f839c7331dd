//! Remote human opponent: never decides, only observes.
//!
//! The remote side plays in its own process and publishes progress
//! snapshots to the shared store. This implementation polls that document,
//! lets the [`TurnChangeDetector`] infer what happened, and forwards the
//! result as the same events the local opponent would emit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::time::{sleep, Instant};

use crate::common::PlayerId;
use crate::config::TimingConfig;
use crate::detector::{DetectedAction, TurnChangeDetector};
use crate::snapshot::GameplaySnapshot;
use crate::store::{ChangeListener, RemoteStore, SessionId};
use crate::strategy::StrategyView;

use super::{EventSender, Opponent, OpponentEvent, OpponentSetupData};

pub struct RemoteOpponent {
    session: SessionId,
    /// Identity of the local player; the remote side is `local.other()`.
    local: PlayerId,
    store: Arc<dyn RemoteStore>,
    detector: TurnChangeDetector,
    timing: TimingConfig,
    events: EventSender,
    setup: Option<OpponentSetupData>,
    /// Latest remote snapshot seen, kept for miss-count adoption: misses
    /// never produce an inferable event, so the document is the only
    /// source for them.
    observed: Option<GameplaySnapshot>,
    connected: bool,
    shutdown: Arc<AtomicBool>,
}

impl RemoteOpponent {
    pub fn new(
        session: SessionId,
        local: PlayerId,
        store: Arc<dyn RemoteStore>,
        timing: TimingConfig,
        events: EventSender,
    ) -> Self {
        Self {
            session,
            local,
            store,
            detector: TurnChangeDetector::new(local),
            timing,
            events,
            setup: None,
            observed: None,
            connected: true,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for requesting shutdown from outside the turn loop.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    fn remote(&self) -> PlayerId {
        self.local.other()
    }

    fn note_connected(&mut self) -> anyhow::Result<()> {
        if !self.connected {
            self.connected = true;
            info!("remote side reachable again");
            self.events.send(OpponentEvent::Reconnected)?;
        }
        Ok(())
    }

    fn note_disconnected(&mut self, err: &anyhow::Error) -> anyhow::Result<()> {
        if self.connected {
            self.connected = false;
            warn!("lost contact with remote side: {err:#}");
            self.events.send(OpponentEvent::Disconnected)?;
        }
        Ok(())
    }

    /// Forward one inferred action as an opponent event. Returns `true`
    /// when the turn has passed back to the local side.
    fn forward(&mut self, action: DetectedAction) -> anyhow::Result<bool> {
        let event = match action {
            DetectedAction::CoordinateGuessed(cell) => Some(OpponentEvent::CoordinateGuessed {
                row: cell.row,
                col: cell.col,
            }),
            DetectedAction::LetterGuessed(letter) => Some(OpponentEvent::LetterGuessed(letter)),
            DetectedAction::WordSolved { pattern_index } => Some(OpponentEvent::WordGuessed {
                pattern_index,
                // Word text is not disclosed mid-game.
                text: None,
            }),
            // Misses are visible only through the document's counter; the
            // engine adopts it from the observed snapshot.
            DetectedAction::SilentMiss { miss_count } => {
                debug!("remote miss count now {miss_count}");
                None
            }
            DetectedAction::TurnPassedToLocal => {
                self.events.send(OpponentEvent::ThinkingComplete)?;
                return Ok(true);
            }
        };
        if let Some(event) = event {
            self.events.send(event)?;
        }
        Ok(false)
    }
}

#[async_trait]
impl Opponent for RemoteOpponent {
    /// Exchange setup documents through the store: publish ours, then poll
    /// for theirs until the wait ceiling.
    async fn initialize(&mut self, local_setup: &OpponentSetupData) -> anyhow::Result<()> {
        self.store
            .push_setup(&self.session, self.local, local_setup)
            .await?;

        let deadline = Instant::now() + self.timing.wait_ceiling;
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                anyhow::bail!("shut down during setup exchange");
            }
            if let Some(setup) = self
                .store
                .fetch_setup(&self.session, self.remote())
                .await?
            {
                info!("remote setup received for session {}", self.session);
                self.setup = Some(setup);
                break;
            }
            if Instant::now() >= deadline {
                anyhow::bail!("timed out waiting for remote setup");
            }
            sleep(self.timing.poll_interval).await;
        }

        // Baseline the detector so the first real diff is not mistaken for
        // game-start state.
        if let Some(snapshot) = self
            .store
            .fetch_snapshot(&self.session, self.remote())
            .await?
        {
            self.detector.observe(&snapshot);
            self.observed = Some(snapshot);
        }
        Ok(())
    }

    fn setup(&self) -> Option<&OpponentSetupData> {
        self.setup.as_ref()
    }

    /// Begin waiting for the remote side's move.
    ///
    /// Bounded-interval poll loop: fetch the latest snapshot, tick the
    /// subscription, and let the detector announce what happened. This is
    /// the only point where the system suspends on an external resource.
    async fn execute_turn(&mut self, _view: StrategyView) -> anyhow::Result<()> {
        self.events.send(OpponentEvent::ThinkingStarted)?;
        self.detector.begin_wait();

        let mut listener: Box<dyn ChangeListener> = self
            .store
            .subscribe(&self.session, self.remote())
            .await?;
        let deadline = Instant::now() + self.timing.wait_ceiling;

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                debug!("poll loop stopped by shutdown");
                return Ok(());
            }
            if Instant::now() >= deadline {
                warn!("wait ceiling reached with no remote action");
                self.events.send(OpponentEvent::WaitTimedOut)?;
                return Ok(());
            }

            // Wake on notification or at the poll interval, whichever is
            // first; either way the snapshot is re-fetched.
            tokio::select! {
                _ = sleep(self.timing.poll_interval) => {}
                _ = listener.changed() => {}
            }

            match self
                .store
                .fetch_snapshot(&self.session, self.remote())
                .await
            {
                Ok(Some(snapshot)) => {
                    self.note_connected()?;
                    let actions = self.detector.observe(&snapshot);
                    self.observed = Some(snapshot);
                    for action in actions {
                        if self.forward(action)? {
                            return Ok(());
                        }
                    }
                }
                Ok(None) => {
                    self.note_connected()?;
                }
                Err(err) => {
                    self.note_disconnected(&err)?;
                }
            }
        }
    }

    async fn publish_state(&mut self, snapshot: &GameplaySnapshot) -> anyhow::Result<()> {
        self.store
            .push_snapshot(&self.session, self.local, snapshot)
            .await
    }

    fn observed_snapshot(&self) -> Option<&GameplaySnapshot> {
        self.observed.as_ref()
    }

    async fn reset(&mut self) -> anyhow::Result<()> {
        self.detector.reset();
        self.observed = None;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}
