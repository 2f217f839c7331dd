//! Session orchestration: opponent selection, the turn loop's entry
//! points, and the only place where sustained failures (disconnects,
//! inactivity, wait timeouts) become terminal outcomes.

use std::sync::Arc;
use std::time::SystemTime;

use log::{info, warn};
use rand::rngs::SmallRng;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::board::Board;
use crate::common::{GameError, GameStatus, GuessOutcome, PlayerId};
use crate::config::{miss_limit, SkillConfig, TimingConfig};
use crate::engine::GameEngine;
use crate::heuristic::GridHeuristic;
use crate::opponent::{
    LocalOpponent, Opponent, OpponentEvent, OpponentSetupData, RemoteOpponent,
};
use crate::store::{RemoteStore, SessionId};
use crate::wordbank::WordBank;

/// How the opposing side is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Heuristic computer opponent in-process.
    SinglePlayer,
    /// Human opponent in another process, synchronized through the store.
    Remote,
}

/// Terminal result of a session, from the local player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    LocalWin,
    LocalLoss,
    /// The opponent failed to respond within a grace or inactivity window.
    OpponentForfeit,
    /// The local side was forfeited (e.g. inactivity on our end).
    LocalForfeit,
}

pub struct Session {
    mode: GameMode,
    local: PlayerId,
    skill: f64,
    engine: GameEngine,
    opponent: Box<dyn Opponent>,
    events: mpsc::UnboundedReceiver<OpponentEvent>,
    timing: TimingConfig,
    disconnect_deadline: Option<Instant>,
    outcome: Option<SessionOutcome>,
}

impl Session {
    /// Single-player session against the heuristic opponent.
    #[allow(clippy::too_many_arguments)]
    pub fn single_player(
        engine: GameEngine,
        local: PlayerId,
        skill: f64,
        bank: Arc<dyn WordBank>,
        heuristic: Arc<dyn GridHeuristic>,
        skill_config: SkillConfig,
        timing: TimingConfig,
        rng: SmallRng,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let opponent = LocalOpponent::new(
            skill,
            bank,
            heuristic,
            skill_config,
            timing.clone(),
            rng,
            tx,
        );
        Self {
            mode: GameMode::SinglePlayer,
            local,
            skill,
            engine,
            opponent: Box::new(opponent),
            events: rx,
            timing,
            disconnect_deadline: None,
            outcome: None,
        }
    }

    /// Remote session synchronized through `store`.
    ///
    /// Performs the setup exchange: publishes the local setup document,
    /// waits for the remote one, builds the engine over both boards, and
    /// publishes the initial progress snapshot. Player One moves first by
    /// convention; both sides derive the same order from their identities.
    pub async fn connect_remote(
        local_board: Board,
        local_setup: &OpponentSetupData,
        local: PlayerId,
        session_id: SessionId,
        store: Arc<dyn RemoteStore>,
        bank: Arc<dyn WordBank>,
        timing: TimingConfig,
    ) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut opponent =
            RemoteOpponent::new(session_id, local, store, timing.clone(), tx);
        opponent.initialize(local_setup).await?;

        let remote_setup = opponent
            .setup()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("setup exchange produced no remote setup"))?;
        let remote_board = Board::new(remote_setup.grid_size, remote_setup.placements.clone())?;

        let local_limit = miss_limit(local_setup.difficulty, local_setup.word_count);
        let remote_limit = miss_limit(remote_setup.difficulty, remote_setup.word_count);
        let (boards, limits) = match local {
            PlayerId::One => ([local_board, remote_board], [local_limit, remote_limit]),
            PlayerId::Two => ([remote_board, local_board], [remote_limit, local_limit]),
        };
        let engine = GameEngine::new(boards, limits, PlayerId::One, bank);

        let mut opponent: Box<dyn Opponent> = Box::new(opponent);
        let snapshot = engine.snapshot_for(local);
        opponent.publish_state(&snapshot).await?;

        Ok(Self {
            mode: GameMode::Remote,
            local,
            skill: 0.0,
            engine,
            opponent,
            events: rx,
            timing,
            disconnect_deadline: None,
            outcome: None,
        })
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    /// Exchange setup data with the opponent.
    pub async fn initialize(&mut self, local_setup: &OpponentSetupData) -> anyhow::Result<()> {
        self.opponent.initialize(local_setup).await
    }

    /// Whether `player` may act right now.
    pub fn can_take_action(&self, player: PlayerId) -> bool {
        self.outcome.is_none() && self.engine.can_take_action(player)
    }

    /// Local player guesses a letter. Caller gates on `can_take_action`.
    pub async fn play_letter(&mut self, letter: char) -> Result<GuessOutcome, GameError> {
        let outcome = self.engine.process_letter(self.local, letter)?;
        self.finish_local_guess(outcome).await;
        Ok(outcome)
    }

    /// Local player probes a cell.
    pub async fn play_coordinate(&mut self, row: u8, col: u8) -> Result<GuessOutcome, GameError> {
        let outcome = self.engine.process_coordinate(self.local, row, col)?;
        self.finish_local_guess(outcome).await;
        Ok(outcome)
    }

    /// Local player guesses a whole word.
    pub async fn play_word(
        &mut self,
        text: &str,
        pattern_index: usize,
    ) -> Result<GuessOutcome, GameError> {
        let outcome = self.engine.process_word(self.local, text, pattern_index)?;
        self.finish_local_guess(outcome).await;
        Ok(outcome)
    }

    /// Shared tail of every local guess: bookkeeping, status evaluation,
    /// publication, turn handoff.
    async fn finish_local_guess(&mut self, outcome: GuessOutcome) {
        self.opponent.record_player_guess(outcome);

        // Loss before win, and only the mover's own status can change.
        match self.engine.status(self.local) {
            GameStatus::Lost => self.outcome = Some(SessionOutcome::LocalLoss),
            GameStatus::Won => self.outcome = Some(SessionOutcome::LocalWin),
            GameStatus::InProgress => {}
        }

        // Duplicates and invalid words neither consume the turn nor need
        // re-publication.
        if matches!(outcome, GuessOutcome::Hit | GuessOutcome::Miss) {
            self.engine.advance_turn();
            self.opponent.advance_turn();
            let snapshot = self.engine.snapshot_for(self.local);
            if let Err(err) = self.opponent.publish_state(&snapshot).await {
                warn!("failed to publish local state: {err:#}");
            }
        }
    }

    /// Run the opponent's turn to completion and return the events it
    /// produced, in order. Guess events are already applied to the engine.
    pub async fn run_opponent_turn(&mut self) -> anyhow::Result<Vec<OpponentEvent>> {
        let opponent_side = self.local.other();
        let view = self.engine.strategy_view(opponent_side, self.skill);
        self.opponent.execute_turn(view).await?;

        let mut seen = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(&event)?;
            seen.push(event);
        }

        // Misses are invisible to the event stream; adopt them from the
        // observed document.
        if let Some(observed) = self.opponent.observed_snapshot() {
            let miss_count = observed.miss_count;
            self.engine.adopt_miss_count(opponent_side, miss_count);
        }

        if self.outcome.is_none() {
            match self.engine.status(opponent_side) {
                GameStatus::Lost => self.outcome = Some(SessionOutcome::LocalWin),
                GameStatus::Won => self.outcome = Some(SessionOutcome::LocalLoss),
                GameStatus::InProgress => {}
            }
        }
        Ok(seen)
    }

    /// Apply one opponent event to the engine and the failure timers.
    fn apply_event(&mut self, event: &OpponentEvent) -> anyhow::Result<()> {
        let opponent_side = self.local.other();
        match event {
            OpponentEvent::LetterGuessed(letter) => {
                let outcome = self.engine.process_letter(opponent_side, *letter)?;
                if outcome == GuessOutcome::Hit {
                    self.opponent.record_revealed_letter(*letter);
                    self.opponent.record_opponent_hit();
                }
                self.end_opponent_move(outcome);
            }
            OpponentEvent::CoordinateGuessed { row, col } => {
                let outcome = self.engine.process_coordinate(opponent_side, *row, *col)?;
                if outcome == GuessOutcome::Hit {
                    self.opponent.record_opponent_hit();
                }
                self.end_opponent_move(outcome);
            }
            OpponentEvent::WordGuessed {
                pattern_index,
                text,
            } => {
                let outcome = match text {
                    Some(text) => self
                        .engine
                        .process_word(opponent_side, text, *pattern_index)?,
                    // Remote solves arrive without the text; the solved word
                    // is read off the local board instead.
                    None => self.engine.apply_solved_row(opponent_side, *pattern_index)?,
                };
                if outcome == GuessOutcome::Hit {
                    self.opponent.record_opponent_hit();
                }
                self.end_opponent_move(outcome);
            }
            OpponentEvent::Disconnected => self.mark_disconnected(Instant::now()),
            OpponentEvent::Reconnected => self.mark_reconnected(),
            OpponentEvent::WaitTimedOut => {
                warn!("opponent wait timed out; declaring forfeit");
                self.outcome = Some(SessionOutcome::OpponentForfeit);
            }
            OpponentEvent::ThinkingComplete => {
                // A turn can end without any inferable guess — a silent
                // miss, or a pass with nothing to recommend — and the
                // handoff still has to land.
                if self.engine.turn_holder() == opponent_side {
                    self.engine.advance_turn();
                    self.opponent.advance_turn();
                }
            }
            OpponentEvent::ThinkingStarted => {}
        }
        Ok(())
    }

    /// Turn handoff after an applied opponent guess.
    fn end_opponent_move(&mut self, outcome: GuessOutcome) {
        if matches!(outcome, GuessOutcome::Hit | GuessOutcome::Miss)
            && self.engine.turn_holder() == self.local.other()
        {
            self.engine.advance_turn();
            self.opponent.advance_turn();
        }
    }

    /// Arm the disconnect grace timer. Idempotent while armed.
    pub fn mark_disconnected(&mut self, now: Instant) {
        if self.disconnect_deadline.is_none() {
            info!(
                "opponent disconnected; forfeiting in {:?} unless they return",
                self.timing.disconnect_grace
            );
            self.disconnect_deadline = Some(now + self.timing.disconnect_grace);
        }
    }

    /// Cancel a pending forfeit after a reconnect.
    pub fn mark_reconnected(&mut self) {
        if self.disconnect_deadline.take().is_some() {
            info!("opponent reconnected within grace period");
        }
    }

    /// Convert an expired grace period into a forfeit. Safe to call at any
    /// cadence; `None` while the game should continue.
    pub fn check_forfeit(&mut self, now: Instant) -> Option<SessionOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        if let Some(deadline) = self.disconnect_deadline {
            if now >= deadline {
                warn!("disconnect grace period expired");
                self.outcome = Some(SessionOutcome::OpponentForfeit);
            }
        }
        self.outcome
    }

    /// Whether a persisted last-activity timestamp has gone stale. Checked
    /// on demand, not ticked every frame.
    pub fn check_inactivity(&self, last_activity: SystemTime, now: SystemTime) -> bool {
        now.duration_since(last_activity)
            .map(|idle| idle >= self.timing.inactivity_timeout)
            .unwrap_or(false)
    }

    /// Record a forfeit decided outside the grace machinery (e.g. local
    /// inactivity detected by the caller).
    pub fn declare_forfeit(&mut self, forfeiting: PlayerId) {
        self.outcome = Some(if forfeiting == self.local {
            SessionOutcome::LocalForfeit
        } else {
            SessionOutcome::OpponentForfeit
        });
    }

    /// Reset for a rematch with recomputed miss limits.
    pub async fn reset(
        &mut self,
        miss_limits: [u32; 2],
        first_turn: PlayerId,
    ) -> anyhow::Result<()> {
        self.engine.reset(miss_limits, first_turn);
        self.opponent.reset().await?;
        self.disconnect_deadline = None;
        self.outcome = None;
        Ok(())
    }

    /// Stop the opponent's poll loop and release pending waits.
    pub fn shutdown(&mut self) {
        self.opponent.shutdown();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.opponent.shutdown();
    }
}
