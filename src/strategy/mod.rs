//! Guess strategies: three independent scorers that turn a read-only view
//! of the game into a ranked, confidence-scored recommendation.
//!
//! All three share the same skill mechanism: candidates are ranked, the
//! top-K form a selection pool sized by a skill step table, and the pick
//! within the pool is uniform. Higher skill shrinks the pool, pushing the
//! pick toward optimal; the pool pick is the only randomness in any
//! strategy.

use std::collections::{BTreeSet, HashSet};

use rand::Rng;

use crate::board::WILDCARD;

mod coordinate;
mod letter;
mod word;

pub use coordinate::CoordinateStrategy;
pub use letter::LetterStrategy;
pub use word::WordStrategy;

/// What a strategy recommends guessing.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessKind {
    Letter(char),
    Coordinate { row: u8, col: u8 },
    Word { text: String, pattern_index: usize },
}

/// A ranked recommendation with its confidence in [0, 1].
///
/// Strategies return `Option<Recommendation>`; `None` means the strategy has
/// nothing valid to suggest and the caller must not act.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub kind: GuessKind,
    pub confidence: f64,
}

/// One word slot as the strategies see it.
#[derive(Debug, Clone)]
pub struct PatternSlot {
    /// Known letters in place, [`WILDCARD`] elsewhere.
    pub text: String,
    pub solved: bool,
}

impl PatternSlot {
    /// Whether any position of the pattern has been revealed.
    pub fn has_revealed_letter(&self) -> bool {
        self.text.chars().any(|c| c != WILDCARD)
    }
}

/// Read-only view of one side's situation, consumed by all strategies.
///
/// Built by the engine per turn; strategies never mutate game state.
#[derive(Debug, Clone)]
pub struct StrategyView {
    pub grid_size: u8,
    /// Skill level of the deciding opponent, in [0, 1].
    pub skill: f64,
    pub fill_ratio: f64,
    pub patterns: Vec<PatternSlot>,
    pub guessed_letters: BTreeSet<char>,
    pub known_letters: BTreeSet<char>,
    pub guessed_coords: HashSet<(u8, u8)>,
    /// Whole words already tried, normalized uppercase.
    pub guessed_words: HashSet<String>,
    /// Coordinates confirmed to hold a letter.
    pub hit_cells: Vec<(u8, u8)>,
    /// Distinct letters occurring anywhere in the target words.
    pub target_letters: BTreeSet<char>,
    /// Occupied cells the guesser has not probed yet.
    pub remaining_letter_cells: usize,
}

/// Whether `word` fits `pattern`: equal length, revealed positions match.
pub(crate) fn matches_pattern(word: &str, pattern: &str) -> bool {
    word.len() == pattern.len()
        && word
            .chars()
            .zip(pattern.chars())
            .all(|(w, p)| p == WILDCARD || w == p)
}

/// Uniform pick from the top `pool_size` of `ranked` (sorted descending by
/// score). Returns the chosen entry and the best score for confidence math.
pub(crate) fn pick_from_pool<T: Clone, R: Rng + ?Sized>(
    ranked: &[(T, f64)],
    pool_size: usize,
    rng: &mut R,
) -> Option<(T, f64, f64)> {
    if ranked.is_empty() {
        return None;
    }
    let pool = pool_size.max(1).min(ranked.len());
    let idx = rng.random_range(0..pool);
    let best_score = ranked[0].1;
    let (item, score) = ranked[idx].clone();
    Some((item, score, best_score))
}

/// Ratio-based confidence with a neutral fallback when nothing scored.
pub(crate) fn ratio_confidence(score: f64, best: f64) -> f64 {
    if best > 0.0 {
        score / best
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn pattern_matching_respects_revealed_positions() {
        assert!(matches_pattern("CAT", "C_T"));
        assert!(matches_pattern("CAT", "___"));
        assert!(matches_pattern("COT", "C_T"));
        assert!(!matches_pattern("DOG", "C__"));
        assert!(!matches_pattern("CATS", "C_T"));
    }

    #[test]
    fn pool_of_one_is_deterministic() {
        let ranked = vec![("a", 3.0), ("b", 2.0), ("c", 1.0)];
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let (item, score, best) = pick_from_pool(&ranked, 1, &mut rng).unwrap();
            assert_eq!(item, "a");
            assert_eq!(score, 3.0);
            assert_eq!(best, 3.0);
        }
    }

    #[test]
    fn pool_never_exceeds_candidates() {
        let ranked = vec![("a", 3.0), ("b", 2.0)];
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let (item, _, _) = pick_from_pool(&ranked, 10, &mut rng).unwrap();
            assert!(item == "a" || item == "b");
        }
    }
}
