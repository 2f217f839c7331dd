//! Letter guess scoring: base frequency plus discriminative value across
//! still-possible pattern completions.

use rand::Rng;

use crate::config::{letter_frequency, SkillConfig, PATTERN_BONUS_WEIGHT};
use crate::wordbank::WordBank;

use super::{pick_from_pool, ratio_confidence, GuessKind, Recommendation, StrategyView};

pub struct LetterStrategy<'a> {
    pub bank: &'a dyn WordBank,
    pub config: &'a SkillConfig,
}

impl LetterStrategy<'_> {
    /// Recommend the next letter to guess, or `None` when no letter guess
    /// can reveal anything new.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        view: &StrategyView,
        rng: &mut R,
    ) -> Option<Recommendation> {
        // Nothing left to learn from letters once every letter occurring in
        // the target words is known.
        if view
            .target_letters
            .iter()
            .all(|c| view.known_letters.contains(c))
        {
            return None;
        }

        let candidates: Vec<char> = ('A'..='Z')
            .filter(|c| !view.guessed_letters.contains(c) && !view.known_letters.contains(c))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        // Matching bank words per unsolved pattern, computed once.
        let pattern_matches: Vec<(&str, Vec<&String>)> = view
            .patterns
            .iter()
            .filter(|p| !p.solved)
            .map(|p| {
                let matches: Vec<&String> = self
                    .bank
                    .words_of_length(p.text.len())
                    .iter()
                    .filter(|w| super::matches_pattern(w, &p.text))
                    .collect();
                (p.text.as_str(), matches)
            })
            .collect();

        let mut ranked: Vec<(char, f64)> = candidates
            .into_iter()
            .map(|letter| {
                let bonus = pattern_bonus(letter, &pattern_matches);
                (letter, letter_frequency(letter) + PATTERN_BONUS_WEIGHT * bonus)
            })
            .collect();
        // Alphabetic tie-break keeps the ranking stable for a given view.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let pool = self.config.letter_pool.sample(view.skill);
        let (letter, score, best) = pick_from_pool(&ranked, pool, rng)?;
        Some(Recommendation {
            kind: GuessKind::Letter(letter),
            confidence: ratio_confidence(score, best),
        })
    }
}

/// Sum over unsolved patterns not already containing `letter` of the share
/// of matching bank words that contain it. Patterns with no matching bank
/// words contribute nothing.
fn pattern_bonus(letter: char, pattern_matches: &[(&str, Vec<&String>)]) -> f64 {
    pattern_matches
        .iter()
        .filter(|(pattern, _)| !pattern.contains(letter))
        .map(|(_, matches)| {
            if matches.is_empty() {
                0.0
            } else {
                let containing = matches.iter().filter(|w| w.contains(letter)).count();
                containing as f64 / matches.len() as f64
            }
        })
        .sum()
}
