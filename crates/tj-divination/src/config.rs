//! Configuration for casting sessions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coin::entropy_seed;

/// Configuration for the stochastic parts of a cast.
#[derive(Debug, Clone)]
pub struct DivinationConfig {
    /// RNG seed for reproducible casts; `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Upper bound for the random number that replaces a zero input.
    pub max_replacement: u64,
}

impl Default for DivinationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_replacement: 100,
        }
    }
}

impl DivinationConfig {
    /// Fix the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the replacement range upper bound (at least 1).
    pub fn with_max_replacement(mut self, max: u64) -> Self {
        self.max_replacement = max.max(1);
        self
    }

    /// A generator seeded from the configured seed or the clock.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed.unwrap_or_else(entropy_seed))
    }

    /// `n` itself, or a random draw from `1..=max_replacement` when it is zero.
    pub fn nonzero_or_random(&self, n: u64, rng: &mut StdRng) -> u64 {
        if n == 0 {
            rng.random_range(1..=self.max_replacement.max(1))
        } else {
            n
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = DivinationConfig::default();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.max_replacement, 100);
    }

    #[test]
    fn builder_methods() {
        let cfg = DivinationConfig::default()
            .with_seed(7)
            .with_max_replacement(0);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.max_replacement, 1);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let cfg = DivinationConfig::default().with_seed(99);
        let a: u64 = cfg.rng().random();
        let b: u64 = cfg.rng().random();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_is_replaced_in_range() {
        let cfg = DivinationConfig::default().with_seed(1);
        let mut rng = cfg.rng();
        assert_eq!(cfg.nonzero_or_random(17, &mut rng), 17);
        for _ in 0..200 {
            let n = cfg.nonzero_or_random(0, &mut rng);
            assert!((1..=100).contains(&n));
        }
    }
}
