//! Whole-word guess scoring: bank completions of partially revealed
//! patterns, gated by skill-derived confidence thresholds.

use rand::Rng;

use crate::config::SkillConfig;
use crate::wordbank::WordBank;

use super::{GuessKind, Recommendation, StrategyView};

pub struct WordStrategy<'a> {
    pub bank: &'a dyn WordBank,
    pub config: &'a SkillConfig,
}

impl WordStrategy<'_> {
    /// Recommend a whole-word guess, or `None` when no pattern's best
    /// completion clears both the skill threshold and the absolute floor.
    ///
    /// Patterns with zero revealed letters are never candidates: a wrong
    /// word guess costs double, so guessing blind is disallowed.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        view: &StrategyView,
        rng: &mut R,
    ) -> Option<Recommendation> {
        let mut best: Option<(usize, Vec<&String>, f64)> = None;

        for (index, pattern) in view.patterns.iter().enumerate() {
            if pattern.solved || !pattern.has_revealed_letter() {
                continue;
            }
            // Words already tried are out: a wrong guess must not be
            // recommended again for the same half-revealed pattern.
            let matches: Vec<&String> = self
                .bank
                .words_of_length(pattern.text.len())
                .iter()
                .filter(|w| {
                    super::matches_pattern(w, &pattern.text) && !view.guessed_words.contains(*w)
                })
                .collect();
            let confidence = match matches.len() {
                0 => 0.0,
                // Never 1.0: the true word might be outside the bank.
                1 => 0.95,
                n => 1.0 / n as f64,
            };
            if confidence <= 0.0 {
                continue;
            }
            let better = match &best {
                Some((_, _, c)) => confidence > *c,
                None => true,
            };
            if better {
                best = Some((index, matches, confidence));
            }
        }

        let (pattern_index, matches, confidence) = best?;
        let threshold = self.config.word_threshold.sample(view.skill);
        if confidence < threshold || confidence < self.config.word_floor {
            return None;
        }

        let text = matches[rng.random_range(0..matches.len())].clone();
        Some(Recommendation {
            kind: GuessKind::Word {
                text,
                pattern_index,
            },
            confidence,
        })
    }
}
