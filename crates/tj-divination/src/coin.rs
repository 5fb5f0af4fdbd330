//! Three-coin hexagram casting (六爻).
//!
//! Each line comes from three fresh coin tosses; the number of heads picks
//! the line as in [`HexagramLine::from_heads`]. The generator is passed
//! in, so a fixed seed or a fixed trial list always gives the same figure.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::error::{DivinationError, DivinationResult};
use crate::hexagram::{Hexagram, HexagramLine};

/// Number of coin tosses in one cast.
pub const TRIALS_PER_CAST: usize = 18;

/// Casts hexagrams from coin tosses.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinHexagramCaster;

impl CoinHexagramCaster {
    /// Create a caster.
    pub fn new() -> Self {
        Self
    }

    /// Build a hexagram from six groups of three tosses, bottom line first.
    /// `true` is heads.
    pub fn cast_from_trials(&self, trials: &[[bool; 3]; 6]) -> Hexagram {
        let lines = (*trials).map(line_for_toss);
        let hexagram = Hexagram::new(lines);
        debug!(
            number = hexagram.number(),
            moving = ?hexagram.moving_lines(),
            "cast coin hexagram"
        );
        hexagram
    }

    /// Build a hexagram from a flat list of exactly eighteen tosses.
    pub fn cast_from_slice(&self, trials: &[bool]) -> DivinationResult<Hexagram> {
        if trials.len() != TRIALS_PER_CAST {
            return Err(DivinationError::InvalidInput(format!(
                "expected {TRIALS_PER_CAST} coin tosses, got {}",
                trials.len()
            )));
        }
        let mut grouped = [[false; 3]; 6];
        for (group, chunk) in grouped.iter_mut().zip(trials.chunks_exact(3)) {
            group.copy_from_slice(chunk);
        }
        Ok(self.cast_from_trials(&grouped))
    }

    /// Toss eighteen fair coins from `rng`.
    pub fn cast(&self, rng: &mut StdRng) -> Hexagram {
        let mut trials = [[false; 3]; 6];
        for coin in trials.iter_mut().flatten() {
            *coin = rng.random_bool(0.5);
        }
        self.cast_from_trials(&trials)
    }
}

/// The line for one toss of three coins, by number of heads.
fn line_for_toss(coins: [bool; 3]) -> HexagramLine {
    match coins {
        [false, false, false] => HexagramLine::OldYin,
        [true, false, false] | [false, true, false] | [false, false, true] => {
            HexagramLine::YoungYang
        }
        [true, true, false] | [true, false, true] | [false, true, true] => HexagramLine::YoungYin,
        [true, true, true] => HexagramLine::OldYang,
    }
}

/// A seed taken from the system clock's nanoseconds.
pub fn entropy_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
