//! Word placement on a square grid: start cell plus one of eight direction
//! steps, with the occupied cells derived up front.

use serde::{Deserialize, Serialize};

use crate::common::GameError;

/// A word laid out on the grid.
///
/// The direction step is one of the eight compass directions expressed as a
/// `(dr, dc)` pair in {-1, 0, 1}, never both zero. Cells are contiguous and
/// validated to fit within the grid at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPlacement {
    word: String,
    grid_size: u8,
    start_row: u8,
    start_col: u8,
    step_row: i8,
    step_col: i8,
    cells: Vec<(u8, u8)>,
}

impl WordPlacement {
    /// Place `word` starting at (`start_row`, `start_col`) and stepping by
    /// (`step_row`, `step_col`) per letter.
    pub fn new(
        word: &str,
        grid_size: u8,
        start_row: u8,
        start_col: u8,
        step_row: i8,
        step_col: i8,
    ) -> Result<Self, GameError> {
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GameError::InvalidWordText);
        }
        if step_row == 0 && step_col == 0 {
            return Err(GameError::ZeroStep);
        }
        if !(-1..=1).contains(&step_row) || !(-1..=1).contains(&step_col) {
            return Err(GameError::ZeroStep);
        }

        let word = word.to_ascii_uppercase();
        let mut cells = Vec::with_capacity(word.len());
        let mut row = start_row as i16;
        let mut col = start_col as i16;
        for _ in 0..word.len() {
            if row < 0 || col < 0 || row >= grid_size as i16 || col >= grid_size as i16 {
                return Err(GameError::PlacementOutOfBounds);
            }
            cells.push((row as u8, col as u8));
            row += step_row as i16;
            col += step_col as i16;
        }

        Ok(Self {
            word,
            grid_size,
            start_row,
            start_col,
            step_row,
            step_col,
            cells,
        })
    }

    /// The placed word, uppercase.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Number of letters.
    pub fn len(&self) -> usize {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Grid size this placement was validated against.
    pub fn grid_size(&self) -> u8 {
        self.grid_size
    }

    /// Ordered occupied cells, one per letter.
    pub fn cells(&self) -> &[(u8, u8)] {
        &self.cells
    }

    /// Direction step `(dr, dc)`.
    pub fn step(&self) -> (i8, i8) {
        (self.step_row, self.step_col)
    }

    /// Letter at the i-th cell of the placement.
    pub fn letter_at(&self, i: usize) -> Option<char> {
        self.word.as_bytes().get(i).map(|&b| b as char)
    }

    /// Iterator over `(cell, letter)` pairs.
    pub fn cells_with_letters(&self) -> impl Iterator<Item = ((u8, u8), char)> + '_ {
        self.cells
            .iter()
            .copied()
            .zip(self.word.bytes().map(|b| b as char))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_placement_derives_cells() {
        let p = WordPlacement::new("cat", 8, 2, 2, 1, 1).unwrap();
        assert_eq!(p.word(), "CAT");
        assert_eq!(p.cells(), &[(2, 2), (3, 3), (4, 4)]);
    }

    #[test]
    fn backwards_placement_allowed() {
        let p = WordPlacement::new("dog", 8, 5, 5, -1, 0).unwrap();
        assert_eq!(p.cells(), &[(5, 5), (4, 5), (3, 5)]);
    }

    #[test]
    fn zero_step_rejected() {
        assert_eq!(
            WordPlacement::new("cat", 8, 0, 0, 0, 0).unwrap_err(),
            GameError::ZeroStep
        );
    }

    #[test]
    fn out_of_bounds_rejected() {
        assert_eq!(
            WordPlacement::new("long", 4, 0, 2, 0, 1).unwrap_err(),
            GameError::PlacementOutOfBounds
        );
        assert_eq!(
            WordPlacement::new("cat", 8, 1, 1, -1, -1).unwrap_err(),
            GameError::PlacementOutOfBounds
        );
    }

    #[test]
    fn non_alphabetic_rejected() {
        assert_eq!(
            WordPlacement::new("c4t", 8, 0, 0, 0, 1).unwrap_err(),
            GameError::InvalidWordText
        );
    }
}
