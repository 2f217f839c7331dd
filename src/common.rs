//! Common types shared across the core: guess outcomes, game status,
//! player identity and gameplay errors.

use serde::{Deserialize, Serialize};

/// Result of applying a guess of any kind against a target board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Guess revealed something: a present letter, an occupied cell or the
    /// correct word for a row.
    Hit,
    /// Guess found nothing; the mover's miss count advanced.
    Miss,
    /// Duplicate guess. Reported, never reprocessed: no state change and no
    /// penalty.
    AlreadyGuessed,
    /// Word guess rejected by the word bank. Not recorded, no penalty.
    InvalidWord,
}

/// Current status of a game from one side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// Identity of one of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// The opposing side.
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Index into per-side arrays.
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

/// Errors returned by core operations.
///
/// These are structural failures (bad coordinates, malformed placements,
/// out-of-turn calls), not gameplay results: a duplicate or missed guess is a
/// [`GuessOutcome`], never an error.
#[derive(Debug, PartialEq, Eq)]
pub enum GameError {
    /// Coordinate lies outside the grid.
    OutOfBounds { row: u8, col: u8 },
    /// Word slot index does not name a placed word.
    InvalidPatternIndex(usize),
    /// Placement direction step was (0, 0).
    ZeroStep,
    /// Placement does not fit within grid bounds.
    PlacementOutOfBounds,
    /// Two placements cross on a cell with different letters.
    PlacementConflict { row: u8, col: u8 },
    /// Placement word is empty or contains a non-alphabetic character.
    InvalidWordText,
    /// Letter guess was not an ASCII letter.
    InvalidLetter(char),
    /// Guess attempted by a side that does not hold the turn.
    TurnViolation,
    /// Random board generation could not fit a word.
    UnableToPlaceWord,
}

impl core::fmt::Display for GameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GameError::OutOfBounds { row, col } => {
                write!(f, "Coordinate ({}, {}) is outside the grid", row, col)
            }
            GameError::InvalidPatternIndex(i) => {
                write!(f, "Word slot index {} does not exist", i)
            }
            GameError::ZeroStep => write!(f, "Placement direction step must not be (0, 0)"),
            GameError::PlacementOutOfBounds => {
                write!(f, "Placement does not fit within grid bounds")
            }
            GameError::PlacementConflict { row, col } => {
                write!(f, "Placements disagree on the letter at ({}, {})", row, col)
            }
            GameError::InvalidWordText => {
                write!(f, "Placement word must be non-empty ASCII letters")
            }
            GameError::InvalidLetter(c) => write!(f, "'{}' is not a guessable letter", c),
            GameError::TurnViolation => write!(f, "Guess attempted out of turn"),
            GameError::UnableToPlaceWord => write!(f, "Unable to place word on the grid"),
        }
    }
}

impl std::error::Error for GameError {}
