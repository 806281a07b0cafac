//! Random number source for seed priorities.
//!
//! In random mode every draw uses a fresh OS-seeded generator. In seeded
//! mode (`RNG_SEED`) the sequence of draws is reproducible across runs,
//! which keeps demo data stable in tests and recordings.

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{ConfigurationError, lookup_parsed};
use crate::domain::Priority;

/// Hands out RNGs, either OS-seeded or derived from a fixed seed.
#[derive(Debug)]
pub struct RngProvider {
    /// Parent seed. `None` means random mode.
    parent_seed: Option<u64>,
    /// Number of generators handed out so far in seeded mode.
    draws: AtomicU64,
}

impl RngProvider {
    /// Creates a provider in random mode.
    #[must_use]
    pub const fn new_random() -> Self {
        Self {
            parent_seed: None,
            draws: AtomicU64::new(0),
        }
    }

    /// Creates a provider in seeded mode.
    #[must_use]
    pub const fn new_seeded(seed: u64) -> Self {
        Self {
            parent_seed: Some(seed),
            draws: AtomicU64::new(0),
        }
    }

    /// Reads `RNG_SEED` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidValue`] if `RNG_SEED` is not a `u64`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads `RNG_SEED` through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`RngProvider::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup_parsed::<_, u64>(&lookup, "RNG_SEED")? {
            Some(seed) => {
                tracing::info!(seed, "Using deterministic RNG");
                Ok(Self::new_seeded(seed))
            }
            None => Ok(Self::new_random()),
        }
    }

    /// Creates a generator for one batch of draws.
    #[must_use]
    pub fn generator(&self) -> StdRng {
        match self.parent_seed {
            Some(seed) => {
                let sequence = self.draws.fetch_add(1, Ordering::Relaxed);
                StdRng::seed_from_u64(seed.wrapping_add(sequence))
            }
            None => StdRng::from_os_rng(),
        }
    }
}

impl Default for RngProvider {
    fn default() -> Self {
        Self::new_random()
    }
}

/// Draws a priority uniformly from `{0, 1, 2}`.
pub fn random_priority<R: Rng>(rng: &mut R) -> Priority {
    Priority::ALL[rng.random_range(0..Priority::ALL.len())]
}
