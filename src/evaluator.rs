//! Pure win/lose evaluation. No mutation here; the engine calls these after
//! every processed guess.

use crate::board::Board;
use crate::common::GameStatus;
use crate::guess_state::GuessState;

/// Whether `guesser` has fully cleared `target`'s board.
///
/// Both conditions are required per word: every letter confirmed known AND
/// every occupied coordinate probed. Knowing all letters without having
/// probed every cell is not a win, and vice versa.
pub fn check_win(target: &Board, guesser: &GuessState) -> bool {
    target.placements().iter().all(|placement| {
        placement
            .word()
            .chars()
            .all(|c| guesser.known_letters.contains(&c))
            && placement
                .cells()
                .iter()
                .all(|cell| guesser.guessed_coords.contains(cell))
    })
}

/// Whether `guesser` has run out of misses.
pub fn check_loss(guesser: &GuessState) -> bool {
    guesser.busted()
}

/// Status for the mover after a processed guess.
///
/// Loss is evaluated before win: a guess that simultaneously completes the
/// board and busts the mover's own miss limit (a failed word guess carries a
/// double penalty) is a loss.
pub fn evaluate(target: &Board, guesser: &GuessState) -> GameStatus {
    if check_loss(guesser) {
        GameStatus::Lost
    } else if check_win(target, guesser) {
        GameStatus::Won
    } else {
        GameStatus::InProgress
    }
}
