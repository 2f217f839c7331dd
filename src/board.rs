//! Hidden word layout and per-cell probe state for one side.

use std::collections::BTreeSet;

use rand::Rng;

use crate::common::GameError;
use crate::placement::WordPlacement;

/// The eight direction steps a word may run in.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 0),
    (1, 1),
    (0, -1),
    (-1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// Wildcard character used for unknown positions in word patterns.
pub const WILDCARD: char = '_';

/// Probe state of a single grid cell, as seen by the guessing side.
///
/// Transitions are strictly forward: `Hidden -> Miss` is terminal, and
/// `Hidden -> PartiallyKnown -> Revealed` never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    /// Never probed.
    Hidden,
    /// Probed and empty.
    Miss,
    /// Probed and occupied, but the letter is not yet known to the guesser.
    PartiallyKnown,
    /// Probed and occupied, letter known.
    Revealed,
}

impl GridCell {
    /// Rank used to enforce forward-only transitions.
    fn rank(self) -> u8 {
        match self {
            GridCell::Hidden => 0,
            GridCell::Miss => 1,
            GridCell::PartiallyKnown => 1,
            GridCell::Revealed => 2,
        }
    }
}

/// One side's hidden board: the letter layout built from its placements and
/// the probe state of every cell as the opponent works it over.
#[derive(Debug, Clone)]
pub struct Board {
    size: u8,
    placements: Vec<WordPlacement>,
    letters: Vec<Option<char>>,
    cells: Vec<GridCell>,
}

impl Board {
    /// Build a board from placements, checking bounds and crossings.
    ///
    /// Placements may cross; crossing cells must carry the same letter.
    pub fn new(size: u8, placements: Vec<WordPlacement>) -> Result<Self, GameError> {
        let n = size as usize * size as usize;
        let mut letters: Vec<Option<char>> = vec![None; n];
        for placement in &placements {
            if placement.grid_size() != size {
                return Err(GameError::PlacementOutOfBounds);
            }
            for ((row, col), letter) in placement.cells_with_letters() {
                let idx = row as usize * size as usize + col as usize;
                match letters[idx] {
                    None => letters[idx] = Some(letter),
                    Some(existing) if existing == letter => {}
                    Some(_) => return Err(GameError::PlacementConflict { row, col }),
                }
            }
        }
        Ok(Self {
            size,
            placements,
            letters,
            cells: vec![GridCell::Hidden; n],
        })
    }

    /// Lay out `words` at random positions and directions, allowing
    /// same-letter crossings. Each word gets a bounded number of attempts
    /// before the whole layout is abandoned.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        size: u8,
        words: &[&str],
    ) -> Result<Self, GameError> {
        let mut placements: Vec<WordPlacement> = Vec::with_capacity(words.len());
        for word in words {
            let mut placed = false;
            for _ in 0..100 {
                let (dr, dc) = DIRECTIONS[rng.random_range(0..DIRECTIONS.len())];
                let row = rng.random_range(0..size);
                let col = rng.random_range(0..size);
                let Ok(candidate) = WordPlacement::new(word, size, row, col, dr, dc) else {
                    continue;
                };
                let mut attempt = placements.clone();
                attempt.push(candidate);
                if let Ok(board) = Board::new(size, attempt) {
                    placements = board.placements;
                    placed = true;
                    break;
                }
            }
            if !placed {
                return Err(GameError::UnableToPlaceWord);
            }
        }
        Board::new(size, placements)
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn placements(&self) -> &[WordPlacement] {
        &self.placements
    }

    fn index(&self, row: u8, col: u8) -> Result<usize, GameError> {
        if row >= self.size || col >= self.size {
            return Err(GameError::OutOfBounds { row, col });
        }
        Ok(row as usize * self.size as usize + col as usize)
    }

    /// Letter hidden at (`row`, `col`), if the cell is occupied.
    pub fn letter_at(&self, row: u8, col: u8) -> Result<Option<char>, GameError> {
        Ok(self.letters[self.index(row, col)?])
    }

    /// Probe state of (`row`, `col`).
    pub fn cell(&self, row: u8, col: u8) -> Result<GridCell, GameError> {
        Ok(self.cells[self.index(row, col)?])
    }

    /// Advance a cell's probe state, ignoring backwards transitions.
    pub fn upgrade_cell(&mut self, row: u8, col: u8, to: GridCell) -> Result<(), GameError> {
        let idx = self.index(row, col)?;
        if to.rank() > self.cells[idx].rank() {
            self.cells[idx] = to;
        }
        Ok(())
    }

    /// Proportion of cells occupied by letters.
    pub fn fill_ratio(&self) -> f64 {
        let filled = self.letters.iter().filter(|l| l.is_some()).count();
        filled as f64 / self.letters.len() as f64
    }

    /// Distinct letters used across all placed words.
    pub fn letter_set(&self) -> BTreeSet<char> {
        self.placements
            .iter()
            .flat_map(|p| p.word().chars())
            .collect()
    }

    /// Number of occupied cells.
    pub fn letter_cell_count(&self) -> usize {
        self.letters.iter().filter(|l| l.is_some()).count()
    }

    /// Pattern string for word slot `i`: known letters in place, `'_'` for
    /// positions whose letter the guesser has not confirmed.
    pub fn pattern(&self, i: usize, known: &BTreeSet<char>) -> Result<String, GameError> {
        let placement = self
            .placements
            .get(i)
            .ok_or(GameError::InvalidPatternIndex(i))?;
        Ok(placement
            .word()
            .chars()
            .map(|c| if known.contains(&c) { c } else { WILDCARD })
            .collect())
    }

    /// Return every cell to `Hidden` for a rematch. Placements stay.
    pub fn reset_cells(&mut self) {
        self.cells.fill(GridCell::Hidden);
    }

    /// Cells currently in a hit state (`PartiallyKnown` or `Revealed`).
    pub fn hit_cells(&self) -> Vec<(u8, u8)> {
        let mut hits = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let idx = row as usize * self.size as usize + col as usize;
                if matches!(self.cells[idx], GridCell::PartiallyKnown | GridCell::Revealed) {
                    hits.push((row, col));
                }
            }
        }
        hits
    }
}
