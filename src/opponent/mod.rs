//! Opponent abstraction: one contract, two implementations.
//!
//! The turn loop is opponent-agnostic: a local heuristic opponent and a
//! remote human opponent emit the same event shapes over the same channel.
//! The local one decides with the strategies; the remote one never decides,
//! it only detects what the remote side did and forwards it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::common::GuessOutcome;
use crate::placement::WordPlacement;
use crate::snapshot::GameplaySnapshot;
use crate::strategy::StrategyView;

mod local;
mod remote;

pub use local::LocalOpponent;
pub use remote::RemoteOpponent;

/// Everything the other side needs to know about a player before the first
/// turn. Created once per game and immutable afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentSetupData {
    pub display_name: String,
    /// Accent color as an RGB triple.
    pub color: (u8, u8, u8),
    pub grid_size: u8,
    pub word_count: usize,
    /// Difficulty / skill in [0, 1].
    pub difficulty: f64,
    pub word_lengths: Vec<usize>,
    pub placements: Vec<WordPlacement>,
}

/// Events an opponent emits toward the turn loop.
#[derive(Debug, Clone, PartialEq)]
pub enum OpponentEvent {
    ThinkingStarted,
    ThinkingComplete,
    LetterGuessed(char),
    CoordinateGuessed { row: u8, col: u8 },
    /// `text` is present for the local opponent; the remote path withholds
    /// it until game end because it is not disclosed mid-game.
    WordGuessed {
        pattern_index: usize,
        text: Option<String>,
    },
    Disconnected,
    Reconnected,
    /// The wait ceiling elapsed without any remote action.
    WaitTimedOut,
}

/// Sender half of the opponent event channel, owned by each opponent.
pub type EventSender = mpsc::UnboundedSender<OpponentEvent>;

/// One side of the game as the turn loop sees it.
///
/// `execute_turn` triggers the opponent's move: synchronous scoring and
/// emit for the local implementation, begin-waiting for the remote one.
/// The `record_*` hooks feed results back for internal bookkeeping and
/// carry no authority over game state.
#[async_trait]
pub trait Opponent: Send {
    /// Exchange setup data and become ready. Must be called once before the
    /// first turn.
    async fn initialize(&mut self, local_setup: &OpponentSetupData) -> anyhow::Result<()>;

    /// Setup data describing this opponent, available after `initialize`.
    fn setup(&self) -> Option<&OpponentSetupData>;

    /// Take (or start waiting for) this opponent's turn.
    async fn execute_turn(&mut self, view: StrategyView) -> anyhow::Result<()>;

    /// The local player made a guess with the given outcome.
    fn record_player_guess(&mut self, outcome: GuessOutcome) {
        let _ = outcome;
    }

    /// This opponent scored a hit against the local player.
    fn record_opponent_hit(&mut self) {}

    /// A letter of this opponent's words was revealed to the local player.
    fn record_revealed_letter(&mut self, letter: char) {
        let _ = letter;
    }

    /// The turn passed to the other side.
    fn advance_turn(&mut self) {}

    /// Publish the local side's progress so the other side can observe it.
    /// No-op for the local opponent.
    async fn publish_state(&mut self, snapshot: &GameplaySnapshot) -> anyhow::Result<()> {
        let _ = snapshot;
        Ok(())
    }

    /// Latest snapshot observed from the other side, for bookkeeping the
    /// event stream cannot carry (miss counts). `None` for local opponents.
    fn observed_snapshot(&self) -> Option<&GameplaySnapshot> {
        None
    }

    /// Clear per-game state for a rematch.
    async fn reset(&mut self) -> anyhow::Result<()>;

    /// Stop any pending wait or poll loop. After this call no further
    /// events may fire.
    fn shutdown(&mut self);
}
