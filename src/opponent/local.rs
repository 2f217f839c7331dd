//! Computer-controlled opponent: runs the three strategies directly and
//! emits the winning recommendation synchronously.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rand::rngs::SmallRng;
use tokio::time::sleep;

use crate::common::GuessOutcome;
use crate::config::{SkillConfig, TimingConfig};
use crate::heuristic::GridHeuristic;
use crate::strategy::{
    CoordinateStrategy, GuessKind, LetterStrategy, Recommendation, StrategyView, WordStrategy,
};
use crate::wordbank::WordBank;

use super::{EventSender, Opponent, OpponentEvent, OpponentSetupData};

/// Bounds for the adaptive skill bias.
const SKILL_BIAS_LIMIT: f64 = 0.1;
/// Bias step applied per recorded player outcome.
const SKILL_BIAS_STEP: f64 = 0.02;

pub struct LocalOpponent {
    setup: Option<OpponentSetupData>,
    skill: f64,
    /// Adaptive difficulty: nudged up while the player is doing well and
    /// down while they struggle, bounded by [`SKILL_BIAS_LIMIT`].
    skill_bias: f64,
    bank: Arc<dyn WordBank>,
    heuristic: Arc<dyn GridHeuristic>,
    skill_config: SkillConfig,
    timing: TimingConfig,
    rng: SmallRng,
    events: EventSender,
}

impl LocalOpponent {
    pub fn new(
        skill: f64,
        bank: Arc<dyn WordBank>,
        heuristic: Arc<dyn GridHeuristic>,
        skill_config: SkillConfig,
        timing: TimingConfig,
        rng: SmallRng,
        events: EventSender,
    ) -> Self {
        Self {
            setup: None,
            skill: skill.clamp(0.0, 1.0),
            skill_bias: 0.0,
            bank,
            heuristic,
            skill_config,
            timing,
            rng,
            events,
        }
    }

    /// Skill after the adaptive bias, clamped to [0, 1].
    pub fn effective_skill(&self) -> f64 {
        (self.skill + self.skill_bias).clamp(0.0, 1.0)
    }

    /// Run all three strategies and arbitrate.
    ///
    /// A valid word recommendation always wins: the word strategy already
    /// gates itself on the skill threshold and the absolute floor. Otherwise
    /// the higher-confidence of letter and coordinate is taken.
    fn decide(&mut self, view: &StrategyView) -> Option<Recommendation> {
        let word = WordStrategy {
            bank: self.bank.as_ref(),
            config: &self.skill_config,
        }
        .recommend(view, &mut self.rng);
        if word.is_some() {
            return word;
        }

        let letter = LetterStrategy {
            bank: self.bank.as_ref(),
            config: &self.skill_config,
        }
        .recommend(view, &mut self.rng);
        let coordinate = CoordinateStrategy {
            heuristic: self.heuristic.as_ref(),
            config: &self.skill_config,
        }
        .recommend(view, &mut self.rng);

        match (letter, coordinate) {
            (Some(l), Some(c)) => Some(if l.confidence >= c.confidence { l } else { c }),
            (l, c) => l.or(c),
        }
    }
}

#[async_trait]
impl Opponent for LocalOpponent {
    async fn initialize(&mut self, local_setup: &OpponentSetupData) -> anyhow::Result<()> {
        // The computer's own setup mirrors the local grid parameters.
        self.setup = Some(local_setup.clone());
        Ok(())
    }

    fn setup(&self) -> Option<&OpponentSetupData> {
        self.setup.as_ref()
    }

    async fn execute_turn(&mut self, view: StrategyView) -> anyhow::Result<()> {
        self.events.send(OpponentEvent::ThinkingStarted)?;

        // Cosmetic pause; nothing observable changes until it elapses.
        if !self.timing.thinking_delay.is_zero() {
            sleep(self.timing.thinking_delay).await;
        }

        let view = StrategyView {
            skill: self.effective_skill(),
            ..view
        };
        // A turn with no valid recommendation completes thinking without a
        // guess event; the turn loop treats that as a pass.
        if let Some(Recommendation { kind, confidence }) = self.decide(&view) {
            debug!("local opponent guessing {:?} (confidence {:.2})", kind, confidence);
            let event = match kind {
                GuessKind::Letter(letter) => OpponentEvent::LetterGuessed(letter),
                GuessKind::Coordinate { row, col } => OpponentEvent::CoordinateGuessed { row, col },
                GuessKind::Word {
                    text,
                    pattern_index,
                } => OpponentEvent::WordGuessed {
                    pattern_index,
                    text: Some(text),
                },
            };
            self.events.send(event)?;
        }
        self.events.send(OpponentEvent::ThinkingComplete)?;
        Ok(())
    }

    fn record_player_guess(&mut self, outcome: GuessOutcome) {
        // Player doing well -> sharpen up; player struggling -> ease off.
        let delta = match outcome {
            GuessOutcome::Hit => SKILL_BIAS_STEP,
            GuessOutcome::Miss => -SKILL_BIAS_STEP,
            GuessOutcome::AlreadyGuessed | GuessOutcome::InvalidWord => 0.0,
        };
        self.skill_bias = (self.skill_bias + delta).clamp(-SKILL_BIAS_LIMIT, SKILL_BIAS_LIMIT);
    }

    async fn reset(&mut self) -> anyhow::Result<()> {
        self.skill_bias = 0.0;
        Ok(())
    }

    fn shutdown(&mut self) {}
}
