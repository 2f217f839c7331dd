//! Decision and synchronization core for a two-player word-guessing grid
//! game: guess strategies, guess processing, win/lose evaluation, and the
//! snapshot-diff machinery that drives a remote human opponent through the
//! same turn loop as the computer one.

mod board;
mod common;
mod config;
mod detector;
mod engine;
mod evaluator;
mod guess_state;
mod heuristic;
mod logging;
mod opponent;
mod placement;
mod session;
mod snapshot;
pub mod store;
pub mod strategy;
mod wordbank;

pub use board::{Board, GridCell, WILDCARD};
pub use common::{GameError, GameStatus, GuessOutcome, PlayerId};
pub use config::{
    letter_frequency, miss_limit, SkillConfig, StepTable, TimingConfig, FILL_RATIO_CEILING,
    LETTER_FREQUENCIES, PATTERN_BONUS_WEIGHT, PROXIMITY_BONUS,
};
pub use detector::{DetectedAction, DetectorState, TurnChangeDetector};
pub use engine::GameEngine;
pub use evaluator::{check_loss, check_win, evaluate};
pub use guess_state::GuessState;
pub use heuristic::{DensityHeuristic, GridHeuristic};
pub use logging::init_logging;
pub use opponent::{
    EventSender, LocalOpponent, Opponent, OpponentEvent, OpponentSetupData, RemoteOpponent,
};
pub use placement::WordPlacement;
pub use session::{GameMode, Session, SessionOutcome};
pub use snapshot::{GameplaySnapshot, RevealedCell};
pub use store::{ChangeListener, MemoryStore, RemoteStore, SessionId};
pub use wordbank::{MemoryWordBank, WordBank};
