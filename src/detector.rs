//! Remote turn-change detection by snapshot diffing.
//!
//! The store protocol has no message types: the receiver infers what the
//! remote side did by comparing two successive snapshots of its progress
//! document. Arrays are append-only, so the comparison is length-only with
//! the new tail element as the payload, checked in fixed priority order:
//! revealed cells, then known letters, then solved rows, then miss count.
//!
//! Known limitation, deliberately preserved: when two monitored arrays grow
//! in the same poll cycle (a word guess also lengthens known letters), only
//! the highest-priority signal is reported and the other growth is absorbed
//! without its own event. Consumers that need the absorbed information must
//! read the snapshot itself, not the event stream.

use log::debug;

use crate::common::PlayerId;
use crate::snapshot::{GameplaySnapshot, RevealedCell};

/// Wait state for one monitored remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Idle,
    WaitingForOpponentTurn,
}

/// What a snapshot diff revealed about the remote side's action.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectedAction {
    /// Revealed-cell list grew; payload is the new tail element.
    CoordinateGuessed(RevealedCell),
    /// Known-letter list grew.
    LetterGuessed(char),
    /// Solved-row list grew. The word text is withheld until game end, so
    /// only the row index is available.
    WordSolved { pattern_index: usize },
    /// Miss count grew with no array growth: a letter or coordinate guess
    /// that missed.
    SilentMiss { miss_count: u32 },
    /// The whose-turn marker flipped to the local side.
    TurnPassedToLocal,
}

/// Diffs successive snapshots of the remote side's progress document.
pub struct TurnChangeDetector {
    local: PlayerId,
    state: DetectorState,
    last: Option<GameplaySnapshot>,
}

impl TurnChangeDetector {
    pub fn new(local: PlayerId) -> Self {
        Self {
            local,
            state: DetectorState::Idle,
            last: None,
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    /// Arm the detector at the start of a remote turn.
    pub fn begin_wait(&mut self) {
        self.state = DetectorState::WaitingForOpponentTurn;
    }

    /// Forget history for a rematch.
    pub fn reset(&mut self) {
        self.state = DetectorState::Idle;
        self.last = None;
    }

    /// Compare a newly fetched snapshot against the last seen one.
    ///
    /// Returns at most one guess-type action (priority order) plus possibly
    /// a turn handoff; handoff detection is independent of the diff. The
    /// first snapshot ever observed only establishes the baseline.
    pub fn observe(&mut self, snapshot: &GameplaySnapshot) -> Vec<DetectedAction> {
        let mut actions = Vec::new();

        if self.state == DetectorState::WaitingForOpponentTurn {
            // A missing baseline diffs against the empty game-start
            // document, so a side that starts observing late still sees
            // the most recent action.
            let empty;
            let last = match &self.last {
                Some(last) => last,
                None => {
                    empty = GameplaySnapshot::initial(snapshot.miss_limit, snapshot.turn_holder);
                    &empty
                }
            };
            if let Some(action) = diff_guess(last, snapshot) {
                debug!("detector: inferred {:?}", action);
                actions.push(action);
            }
        }

        // A stale document can still carry our marker from the remote
        // side's previous push; only a fresh turn counter is a handoff.
        // Without a baseline, the game-start document (counter 0) is not
        // one either.
        let fresh = match &self.last {
            Some(last) => {
                last.turn_holder != self.local || last.turn_counter != snapshot.turn_counter
            }
            None => snapshot.turn_counter > 0,
        };
        if snapshot.turn_holder == self.local
            && self.state == DetectorState::WaitingForOpponentTurn
            && fresh
        {
            self.state = DetectorState::Idle;
            actions.push(DetectedAction::TurnPassedToLocal);
        }

        self.last = Some(snapshot.clone());
        actions
    }
}

/// Length-only diff in fixed priority order. At most one signal per cycle.
fn diff_guess(last: &GameplaySnapshot, next: &GameplaySnapshot) -> Option<DetectedAction> {
    if next.revealed_cells.len() > last.revealed_cells.len() {
        return next
            .revealed_cells
            .last()
            .copied()
            .map(DetectedAction::CoordinateGuessed);
    }
    if next.known_letters.len() > last.known_letters.len() {
        return next
            .known_letters
            .last()
            .copied()
            .map(DetectedAction::LetterGuessed);
    }
    if next.solved_rows.len() > last.solved_rows.len() {
        return next
            .solved_rows
            .last()
            .map(|&pattern_index| DetectedAction::WordSolved { pattern_index });
    }
    if next.miss_count > last.miss_count {
        return Some(DetectedAction::SilentMiss {
            miss_count: next.miss_count,
        });
    }
    None
}
