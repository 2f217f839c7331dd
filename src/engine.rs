//! Core game engine: applies guesses against a target board, tracks turn
//! ownership, and maintains the append-only sync logs both sides publish.
//!
//! All state mutation funnels through the three process operations. The
//! strategies and the detector only ever see read-only views.

use std::sync::Arc;

use crate::board::{Board, GridCell};
use crate::common::{GameError, GameStatus, GuessOutcome, PlayerId};
use crate::evaluator;
use crate::guess_state::GuessState;
use crate::snapshot::{GameplaySnapshot, RevealedCell};
use crate::strategy::{PatternSlot, StrategyView};
use crate::wordbank::WordBank;

pub struct GameEngine {
    boards: [Board; 2],
    guesses: [GuessState; 2],
    /// Append-only views mirrored to the remote store; see `snapshot.rs`
    /// for the monotonicity contract.
    logs: [GameplaySnapshot; 2],
    turn: PlayerId,
    turn_counter: u64,
    bank: Arc<dyn WordBank>,
}

impl GameEngine {
    /// Create an engine over both sides' placed boards.
    ///
    /// `boards[i]` is side i's own hidden board; `guesses[i]` tracks side
    /// i's progress against the other board.
    pub fn new(
        boards: [Board; 2],
        miss_limits: [u32; 2],
        first_turn: PlayerId,
        bank: Arc<dyn WordBank>,
    ) -> Self {
        Self {
            boards,
            guesses: [GuessState::new(miss_limits[0]), GuessState::new(miss_limits[1])],
            logs: [
                GameplaySnapshot::initial(miss_limits[0], first_turn),
                GameplaySnapshot::initial(miss_limits[1], first_turn),
            ],
            turn: first_turn,
            turn_counter: 0,
            bank,
        }
    }

    pub fn board(&self, side: PlayerId) -> &Board {
        &self.boards[side.index()]
    }

    pub fn guess_state(&self, side: PlayerId) -> &GuessState {
        &self.guesses[side.index()]
    }

    pub fn turn_holder(&self) -> PlayerId {
        self.turn
    }

    pub fn turn_counter(&self) -> u64 {
        self.turn_counter
    }

    /// Turn gate. The presentation layer checks this before issuing a
    /// guess; the process operations enforce it again regardless.
    pub fn can_take_action(&self, side: PlayerId) -> bool {
        self.turn == side
    }

    fn check_turn(&self, mover: PlayerId) -> Result<(), GameError> {
        if self.turn != mover {
            return Err(GameError::TurnViolation);
        }
        Ok(())
    }

    /// Split borrows: mover's bookkeeping plus the opposing (target) board.
    fn mover_parts(
        &mut self,
        mover: PlayerId,
    ) -> (&mut Board, &mut GuessState, &mut GameplaySnapshot) {
        let (mi, ti) = (mover.index(), mover.other().index());
        let (first, second) = self.boards.split_at_mut(1);
        let target = if ti == 0 { &mut first[0] } else { &mut second[0] };
        (target, &mut self.guesses[mi], &mut self.logs[mi])
    }

    /// Guess a single letter against the opponent's words.
    pub fn process_letter(
        &mut self,
        mover: PlayerId,
        letter: char,
    ) -> Result<GuessOutcome, GameError> {
        self.check_turn(mover)?;
        if !letter.is_ascii_alphabetic() {
            return Err(GameError::InvalidLetter(letter));
        }
        let letter = letter.to_ascii_uppercase();
        let (target, state, log) = self.mover_parts(mover);

        if state.guessed_letters.contains(&letter) {
            return Ok(GuessOutcome::AlreadyGuessed);
        }
        state.guessed_letters.insert(letter);

        if target.letter_set().contains(&letter) {
            state.known_letters.insert(letter);
            log.known_letters.push(letter);
            reveal_cells_with_letter(target, letter, log);
            Ok(GuessOutcome::Hit)
        } else {
            state.miss_count += 1;
            log.miss_count = state.miss_count;
            Ok(GuessOutcome::Miss)
        }
    }

    /// Probe a single cell of the opponent's grid.
    pub fn process_coordinate(
        &mut self,
        mover: PlayerId,
        row: u8,
        col: u8,
    ) -> Result<GuessOutcome, GameError> {
        self.check_turn(mover)?;
        let (target, state, log) = self.mover_parts(mover);
        // Bounds are a structural error, checked before the duplicate test.
        target.cell(row, col)?;

        if state.guessed_coords.contains(&(row, col)) {
            return Ok(GuessOutcome::AlreadyGuessed);
        }
        state.guessed_coords.insert((row, col));

        match target.letter_at(row, col)? {
            Some(letter) => {
                let known = state.known_letters.contains(&letter);
                let cell_state = if known {
                    GridCell::Revealed
                } else {
                    GridCell::PartiallyKnown
                };
                target.upgrade_cell(row, col, cell_state)?;
                log.revealed_cells.push(RevealedCell {
                    row,
                    col,
                    hit: true,
                    letter: known.then_some(letter),
                });
                Ok(GuessOutcome::Hit)
            }
            None => {
                target.upgrade_cell(row, col, GridCell::Miss)?;
                state.miss_count += 1;
                log.miss_count = state.miss_count;
                // A missed probe lengthens nothing: the sync log only
                // carries hits, so the other side sees a silent miss.
                Ok(GuessOutcome::Miss)
            }
        }
    }

    /// Guess the whole word for slot `pattern_index`.
    ///
    /// Invalid words are rejected before any bookkeeping and cost nothing.
    /// A wrong (but valid) word costs two misses.
    pub fn process_word(
        &mut self,
        mover: PlayerId,
        text: &str,
        pattern_index: usize,
    ) -> Result<GuessOutcome, GameError> {
        self.check_turn(mover)?;
        let text = text.to_ascii_uppercase();
        let bank = Arc::clone(&self.bank);
        let (target, state, log) = self.mover_parts(mover);

        if pattern_index >= target.placements().len() {
            return Err(GameError::InvalidPatternIndex(pattern_index));
        }
        if !bank.contains(&text) {
            return Ok(GuessOutcome::InvalidWord);
        }
        if state.guessed_words.contains(&text) {
            return Ok(GuessOutcome::AlreadyGuessed);
        }
        state.guessed_words.insert(text.clone());

        if target.placements()[pattern_index].word() == text {
            mark_row_solved(target, state, log, pattern_index)?;
            Ok(GuessOutcome::Hit)
        } else {
            // Double penalty for a wrong word guess.
            state.miss_count += 2;
            log.miss_count = state.miss_count;
            Ok(GuessOutcome::Miss)
        }
    }

    /// Apply a word solve inferred from the remote side's snapshot.
    ///
    /// The remote engine already validated the guess against its bank; the
    /// solved word is read off the local board, so no bank check and no
    /// penalty path apply here.
    pub fn apply_solved_row(
        &mut self,
        mover: PlayerId,
        pattern_index: usize,
    ) -> Result<GuessOutcome, GameError> {
        self.check_turn(mover)?;
        let (target, state, log) = self.mover_parts(mover);
        if pattern_index >= target.placements().len() {
            return Err(GameError::InvalidPatternIndex(pattern_index));
        }
        if state.solved_rows.contains(&pattern_index) {
            return Ok(GuessOutcome::AlreadyGuessed);
        }
        let text = target.placements()[pattern_index].word().to_string();
        state.guessed_words.insert(text);
        mark_row_solved(target, state, log, pattern_index)?;
        Ok(GuessOutcome::Hit)
    }

    /// Hand the turn to the other side.
    pub fn advance_turn(&mut self) {
        self.turn = self.turn.other();
        self.turn_counter += 1;
        for log in &mut self.logs {
            log.turn_holder = self.turn;
            log.turn_counter = self.turn_counter;
        }
    }

    /// Adopt an observed miss count for `side` from a remote snapshot.
    ///
    /// Misses never produce an inferable guess event, so the remote
    /// document is authoritative for them. Monotonic: a stale snapshot
    /// cannot lower the count.
    pub fn adopt_miss_count(&mut self, side: PlayerId, miss_count: u32) {
        let state = &mut self.guesses[side.index()];
        if miss_count > state.miss_count {
            state.miss_count = miss_count;
            self.logs[side.index()].miss_count = miss_count;
        }
    }

    /// Status from `perspective`'s point of view. Loss before win.
    pub fn status(&self, perspective: PlayerId) -> GameStatus {
        let target = &self.boards[perspective.other().index()];
        let own = &self.guesses[perspective.index()];
        evaluator::evaluate(target, own)
    }

    /// Current sync view of `side`'s progress.
    pub fn snapshot_for(&self, side: PlayerId) -> GameplaySnapshot {
        self.logs[side.index()].clone()
    }

    /// Read-only scoring view for `side` at the given skill level.
    pub fn strategy_view(&self, side: PlayerId, skill: f64) -> StrategyView {
        let target = &self.boards[side.other().index()];
        let state = &self.guesses[side.index()];
        let patterns = (0..target.placements().len())
            .map(|i| PatternSlot {
                text: target
                    .pattern(i, &state.known_letters)
                    .expect("pattern index within placement range"),
                solved: state.solved_rows.contains(&i),
            })
            .collect();
        let remaining_letter_cells = (0..target.size())
            .flat_map(|r| (0..target.size()).map(move |c| (r, c)))
            .filter(|&(r, c)| {
                target.letter_at(r, c).unwrap_or(None).is_some()
                    && !state.guessed_coords.contains(&(r, c))
            })
            .count();
        StrategyView {
            grid_size: target.size(),
            skill,
            fill_ratio: target.fill_ratio(),
            patterns,
            guessed_letters: state.guessed_letters.clone(),
            known_letters: state.known_letters.clone(),
            guessed_coords: state.guessed_coords.clone(),
            guessed_words: state.guessed_words.clone(),
            hit_cells: target.hit_cells(),
            target_letters: target.letter_set(),
            remaining_letter_cells,
        }
    }

    /// Clear all progress for a rematch; boards keep their placements.
    pub fn reset(&mut self, miss_limits: [u32; 2], first_turn: PlayerId) {
        for board in &mut self.boards {
            board.reset_cells();
        }
        for (i, state) in self.guesses.iter_mut().enumerate() {
            state.reset(miss_limits[i]);
        }
        self.logs = [
            GameplaySnapshot::initial(miss_limits[0], first_turn),
            GameplaySnapshot::initial(miss_limits[1], first_turn),
        ];
        self.turn = first_turn;
        self.turn_counter = 0;
    }
}

/// Solved-row bookkeeping shared by `process_word` and
/// `apply_solved_row`: mark the row, reveal its cells, learn its letters
/// and run the shared-letter upgrade pass.
fn mark_row_solved(
    target: &mut Board,
    state: &mut GuessState,
    log: &mut GameplaySnapshot,
    pattern_index: usize,
) -> Result<(), GameError> {
    state.solved_rows.insert(pattern_index);
    log.solved_rows.push(pattern_index);

    let placement = &target.placements()[pattern_index];
    let cells: Vec<(u8, u8)> = placement.cells().to_vec();
    let letters: Vec<char> = placement.word().chars().collect();
    for (row, col) in cells {
        target.upgrade_cell(row, col, GridCell::Revealed)?;
    }
    // Other words may share these letters, so each newly known letter runs
    // the same upgrade pass a letter guess does.
    for letter in letters {
        if state.known_letters.insert(letter) {
            log.known_letters.push(letter);
        }
        reveal_cells_with_letter(target, letter, log);
    }
    Ok(())
}

/// Upgrade every probed-but-unidentified cell carrying `letter` to
/// `Revealed`, and backfill the letter into the matching sync log entries.
fn reveal_cells_with_letter(target: &mut Board, letter: char, log: &mut GameplaySnapshot) {
    let size = target.size();
    for row in 0..size {
        for col in 0..size {
            let occupied = matches!(target.letter_at(row, col), Ok(Some(l)) if l == letter);
            if !occupied {
                continue;
            }
            if matches!(target.cell(row, col), Ok(GridCell::PartiallyKnown)) {
                let _ = target.upgrade_cell(row, col, GridCell::Revealed);
            }
            for cell in log
                .revealed_cells
                .iter_mut()
                .filter(|c| c.row == row && c.col == col && c.hit)
            {
                cell.letter = Some(letter);
            }
        }
    }
}
