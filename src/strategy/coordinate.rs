//! Coordinate guess scoring: external grid heuristic plus a proximity bonus
//! that helps locate the far end of a word once its middle is found.

use rand::Rng;

use crate::config::{SkillConfig, FILL_RATIO_CEILING, PROXIMITY_BONUS};
use crate::heuristic::GridHeuristic;

use super::{pick_from_pool, ratio_confidence, GuessKind, Recommendation, StrategyView};

pub struct CoordinateStrategy<'a> {
    pub heuristic: &'a dyn GridHeuristic,
    pub config: &'a SkillConfig,
}

impl CoordinateStrategy<'_> {
    /// Recommend the next cell to probe, or `None` when every occupied cell
    /// has already been found.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        view: &StrategyView,
        rng: &mut R,
    ) -> Option<Recommendation> {
        if view.remaining_letter_cells == 0 {
            return None;
        }

        let mut ranked: Vec<((u8, u8), f64)> = Vec::new();
        for row in 0..view.grid_size {
            for col in 0..view.grid_size {
                if view.guessed_coords.contains(&(row, col)) {
                    continue;
                }
                let mut score = self.heuristic.score(
                    row,
                    col,
                    &view.hit_cells,
                    view.grid_size,
                    view.fill_ratio,
                );
                // The bonus only applies off the immediate ring around a
                // hit: adjacent cells already score high, while distance 2-3
                // probes for the far end of a partially found word.
                if !self.heuristic.is_adjacent_to_hit(row, col, &view.hit_cells) {
                    if let Some(dist) = nearest_hit_distance(row, col, &view.hit_cells) {
                        if (2..=3).contains(&dist) {
                            score += PROXIMITY_BONUS;
                        }
                    }
                }
                ranked.push(((row, col), score));
            }
        }
        if ranked.is_empty() {
            return None;
        }
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let pool = self.config.coordinate_pool.sample(view.skill);
        let ((row, col), score, best) = pick_from_pool(&ranked, pool, rng)?;

        // Sparse grids make hits rarer signals, so confidence scales with
        // fill ratio up to the ceiling.
        let fill_factor = (view.fill_ratio / FILL_RATIO_CEILING).min(1.0);
        let confidence =
            (ratio_confidence(score, best) * lerp(0.5, 1.0, fill_factor)).clamp(0.0, 1.0);

        Some(Recommendation {
            kind: GuessKind::Coordinate { row, col },
            confidence,
        })
    }
}

fn nearest_hit_distance(row: u8, col: u8, hits: &[(u8, u8)]) -> Option<u16> {
    hits.iter()
        .map(|&(hr, hc)| {
            ((row as i16 - hr as i16).abs() + (col as i16 - hc as i16).abs()) as u16
        })
        .min()
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
