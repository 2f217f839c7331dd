//! Gameplay snapshot: the wire-visible view of one side's progress.
//!
//! Snapshots drive two things: AI scoring input and remote action inference.
//! Every array is append-only within a game, so two successive snapshots can
//! be compared by length and tail element alone. The detector relies on
//! that; producers must never reorder or remove entries mid-game.

use serde::{Deserialize, Serialize};

use crate::common::PlayerId;

/// One probed coordinate with what the probe revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedCell {
    pub row: u8,
    pub col: u8,
    /// Whether the cell held a letter.
    pub hit: bool,
    /// The letter, once known to the guessing side. `None` for misses and
    /// for hits whose letter has not been confirmed yet.
    pub letter: Option<char>,
}

/// Point-in-time read of one side's guess progress against its opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameplaySnapshot {
    /// Letters confirmed present, in confirmation order.
    pub known_letters: Vec<char>,
    /// Probed coordinates, in probe order.
    pub revealed_cells: Vec<RevealedCell>,
    /// Word slots solved, in solve order.
    pub solved_rows: Vec<usize>,
    pub miss_count: u32,
    pub miss_limit: u32,
    /// Which side holds the turn as of this snapshot.
    pub turn_holder: PlayerId,
    /// Monotonic turn counter for the whole game.
    pub turn_counter: u64,
}

impl GameplaySnapshot {
    /// An empty snapshot at game start.
    pub fn initial(miss_limit: u32, turn_holder: PlayerId) -> Self {
        Self {
            known_letters: Vec::new(),
            revealed_cells: Vec::new(),
            solved_rows: Vec::new(),
            miss_count: 0,
            miss_limit,
            turn_holder,
            turn_counter: 0,
        }
    }
}
