//! Randomness for battle resolution. Every draw is tagged with the [`Roll`] it
//! decides so test doubles can force individual outcomes and trace logs show
//! what each value was used for.

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// What a random draw is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Roll {
    Accuracy,
    CriticalHit,
    DamageVariance,
    SecondaryEffect,
    SpeedTie,
    FullParalysis,
    SleepDuration,
    ConfusionDuration,
    ConfusionSelfHit,
    Replacement,
}

/// Source of randomness owned by the caller and lent to a field for the
/// duration of a match.
pub trait BattleRng {
    /// A value in `[0, 1)`.
    fn uniform(&mut self, roll: Roll) -> f64;

    fn chance(&mut self, roll: Roll, probability: f64) -> bool {
        self.uniform(roll) < probability
    }

    /// An index in `[0, n)`. `n` must be non-zero.
    fn choice(&mut self, roll: Roll, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.uniform(roll) * n as f64) as usize).min(n - 1)
    }
}

/// Seeded, replayable generator. Same seed plus same sequence of calls gives
/// the same outcomes.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    rng: StdRng,
    draws: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn since construction or the last reseed.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Restart the stream, optionally from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.draws = 0;
    }
}

impl BattleRng for SeededRng {
    fn uniform(&mut self, roll: Roll) -> f64 {
        let value: f64 = self.rng.random();
        self.draws += 1;
        trace!("[RNG] draw #{} = {:.4} for {:?}", self.draws, value, roll);
        value
    }

    fn choice(&mut self, roll: Roll, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let value = self.rng.random_range(0..n);
        self.draws += 1;
        trace!("[RNG] draw #{} = {}/{} for {:?}", self.draws, value, n, roll);
        value
    }
}

/// Just under 1.0: fails every `chance` below certainty and picks the
/// highest index in `choice`.
pub const ALWAYS_HIGH: f64 = 0.999_999;
/// Passes every `chance` with non-zero probability and picks index 0.
pub const ALWAYS_LOW: f64 = 0.0;

/// Test double. Rolls with a queued or forced value use it; everything else
/// falls through to a seeded stream.
#[derive(Debug, Clone)]
pub struct RiggedRng {
    forced: HashMap<Roll, f64>,
    queued: HashMap<Roll, VecDeque<f64>>,
    fallback: SeededRng,
}

impl RiggedRng {
    pub fn new(seed: u64) -> Self {
        Self {
            forced: HashMap::new(),
            queued: HashMap::new(),
            fallback: SeededRng::new(seed),
        }
    }

    /// Every draw for `roll` returns `value`.
    pub fn force(mut self, roll: Roll, value: f64) -> Self {
        self.forced.insert(roll, value);
        self
    }

    /// The next draws for `roll` return `values` in order, then forcing or
    /// the seeded stream take over again.
    pub fn queue(mut self, roll: Roll, values: impl IntoIterator<Item = f64>) -> Self {
        self.queued.entry(roll).or_default().extend(values);
        self
    }

    /// Moves always land, never crit, secondary effects never trigger,
    /// paralysis and confusion never stop an action, and damage takes the
    /// top of the variance range.
    pub fn always_hit_max_damage() -> Self {
        Self::new(0)
            .force(Roll::Accuracy, ALWAYS_LOW)
            .force(Roll::CriticalHit, ALWAYS_HIGH)
            .force(Roll::DamageVariance, ALWAYS_HIGH)
            .force(Roll::SecondaryEffect, ALWAYS_HIGH)
            .force(Roll::FullParalysis, ALWAYS_HIGH)
            .force(Roll::ConfusionSelfHit, ALWAYS_HIGH)
    }
}

impl BattleRng for RiggedRng {
    fn uniform(&mut self, roll: Roll) -> f64 {
        if let Some(value) = self.queued.get_mut(&roll).and_then(VecDeque::pop_front) {
            trace!("[RNG] queued {:.4} for {:?}", value, roll);
            return value;
        }
        if let Some(&value) = self.forced.get(&roll) {
            trace!("[RNG] forced {:.4} for {:?}", value, roll);
            return value;
        }
        self.fallback.uniform(roll)
    }
}
