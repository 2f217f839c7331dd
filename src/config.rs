//! Tunable configuration: skill step tables, letter frequencies, miss
//! limits and timing defaults.
//!
//! The skill mappings are deliberately data, not code: a handful of
//! empirical breakpoints that gameplay tuning adjusts without touching the
//! strategies that consume them.

use std::time::Duration;

/// A step function over skill in [0, 1].
///
/// Entries are `(minimum skill, value)` sorted by descending skill; lookup
/// returns the value of the first entry whose threshold the skill reaches.
/// There is no interpolation between breakpoints.
#[derive(Debug, Clone)]
pub struct StepTable<T: Copy> {
    entries: Vec<(f64, T)>,
}

impl<T: Copy> StepTable<T> {
    /// Build a table from `(min_skill, value)` pairs sorted by descending
    /// `min_skill`. The last entry should use 0.0 as a catch-all.
    pub fn new(entries: Vec<(f64, T)>) -> Self {
        debug_assert!(
            entries.windows(2).all(|w| w[0].0 > w[1].0),
            "step table entries must be sorted by descending skill"
        );
        Self { entries }
    }

    /// Value for the given skill level.
    pub fn sample(&self, skill: f64) -> T {
        for &(min_skill, value) in &self.entries {
            if skill >= min_skill {
                return value;
            }
        }
        // Skill below every breakpoint; fall back to the loosest entry.
        self.entries
            .last()
            .map(|&(_, v)| v)
            .expect("step table must not be empty")
    }
}

/// Per-strategy skill tuning consumed by the three guess strategies.
#[derive(Debug, Clone)]
pub struct SkillConfig {
    /// Selection pool sizes for the letter strategy.
    pub letter_pool: StepTable<usize>,
    /// Selection pool sizes for the coordinate strategy. Slightly larger
    /// than the letter pools: coordinate search is inherently noisier.
    pub coordinate_pool: StepTable<usize>,
    /// Minimum confidence at which a word guess is attempted.
    pub word_threshold: StepTable<f64>,
    /// Absolute confidence floor below which a word guess is never
    /// attempted, regardless of skill.
    pub word_floor: f64,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            letter_pool: StepTable::new(vec![(0.9, 1), (0.75, 3), (0.4, 8), (0.0, 15)]),
            coordinate_pool: StepTable::new(vec![(0.9, 2), (0.75, 4), (0.4, 10), (0.0, 18)]),
            word_threshold: StepTable::new(vec![(0.9, 0.35), (0.75, 0.5), (0.4, 0.65), (0.0, 0.8)]),
            word_floor: 0.25,
        }
    }
}

/// Relative frequency of each letter A..Z in English text, normalized so the
/// most common letter scores 1.0. Used as the base term of letter scoring.
pub const LETTER_FREQUENCIES: [f64; 26] = [
    0.64, // A
    0.12, // B
    0.22, // C
    0.34, // D
    1.00, // E
    0.18, // F
    0.16, // G
    0.48, // H
    0.55, // I
    0.01, // J
    0.06, // K
    0.32, // L
    0.19, // M
    0.53, // N
    0.59, // O
    0.15, // P
    0.01, // Q
    0.47, // R
    0.50, // S
    0.71, // T
    0.22, // U
    0.08, // V
    0.19, // W
    0.01, // X
    0.16, // Y
    0.01, // Z
];

/// Base frequency for an ASCII letter, 0.0 for anything else.
pub fn letter_frequency(letter: char) -> f64 {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        LETTER_FREQUENCIES[(upper as u8 - b'A') as usize]
    } else {
        0.0
    }
}

/// Weight of the pattern bonus relative to base frequency in letter scoring.
pub const PATTERN_BONUS_WEIGHT: f64 = 2.0;

/// Proximity bonus awarded to coordinates 2-3 steps from the nearest hit.
pub const PROXIMITY_BONUS: f64 = 0.3;

/// Fill ratio at which coordinate confidence stops being dampened.
pub const FILL_RATIO_CEILING: f64 = 0.35;

/// Miss limit for a new game, derived from difficulty and word count.
///
/// Lower difficulty grants a wider margin; each hidden word adds a little
/// slack since more cells must be probed.
pub fn miss_limit(difficulty: f64, word_count: usize) -> u32 {
    let base = if difficulty >= 0.9 {
        8
    } else if difficulty >= 0.75 {
        12
    } else if difficulty >= 0.4 {
        18
    } else {
        24
    };
    base + 2 * word_count as u32
}

/// Timing configuration for the remote path and session bookkeeping.
#[derive(Debug, Clone)]
pub struct TimingConfig {
    /// Interval between snapshot fetches while waiting on the remote side.
    pub poll_interval: Duration,
    /// Hard ceiling on a single wait; exceeding it is reported as a timeout.
    pub wait_ceiling: Duration,
    /// Grace period after a disconnect before the absent side forfeits.
    pub disconnect_grace: Duration,
    /// Inactivity window after which an abandoned session forfeits. Checked
    /// on demand against a persisted last-activity timestamp.
    pub inactivity_timeout: Duration,
    /// Artificial thinking delay for the computer opponent. Cosmetic only.
    pub thinking_delay: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            wait_ceiling: Duration::from_secs(300),
            disconnect_grace: Duration::from_secs(60),
            inactivity_timeout: Duration::from_secs(600),
            thinking_delay: Duration::from_millis(900),
        }
    }
}
