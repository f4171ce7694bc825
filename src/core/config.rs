//! Configuration for workshop simulation runs
//!
//! This module provides the knobs that drive a run: the clock that advances
//! time, the hiring policy, the service-duration policy, and how batches of
//! scenarios are executed.

use super::errors::WorkshopError;
use super::types::SimTime;
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backlog (queued jobs of one specialty) tolerated before hiring
pub const DEFAULT_BACKLOG_THRESHOLD: usize = 3;
/// Default seed for synthetic scenarios and duration sampling
pub const DEFAULT_SEED: u64 = 42;
/// Default probability that a synthetic vehicle is flagged priority
pub const DEFAULT_PRIORITY_RATIO: f64 = 0.25;
/// Longest service duration a single incident may take; longer values are clamped
pub const MAX_SERVICE_DURATION: SimTime = u32::MAX as SimTime;

/// How multiple scenarios in a batch are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// One scenario after another on the calling thread
    Sequential,
    /// Scenarios run concurrently on a Rayon thread pool
    Rayon,
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        ConcurrencyMode::Sequential
    }
}

/// How time advances during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockMode {
    /// Discrete-event time: jump straight to the next completion
    Simulated,
    /// Each job sleeps `duration * unit` of wall-clock time on its own thread
    RealTime { unit: Duration },
}

impl Default for ClockMode {
    fn default() -> Self {
        ClockMode::Simulated
    }
}

/// When the dispatcher adds a mechanic.
///
/// A specialty with no idle mechanic triggers a hire when more than
/// `backlog_threshold` of its jobs are queued, or when the pool has no
/// mechanic of that specialty at all. `max_hires_per_specialty` caps the
/// number of hires for each specialty within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiringPolicy {
    pub backlog_threshold: usize,
    pub max_hires_per_specialty: Option<usize>,
}

impl HiringPolicy {
    pub fn new(backlog_threshold: usize) -> Self {
        Self {
            backlog_threshold,
            max_hires_per_specialty: None,
        }
    }

    pub fn with_max_hires(mut self, max: usize) -> Self {
        self.max_hires_per_specialty = Some(max);
        self
    }

    /// Decide whether to hire for a specialty that has no idle mechanic.
    pub fn should_hire(&self, waiting: usize, staffed: usize, hired: usize) -> bool {
        if waiting == 0 {
            return false;
        }
        if let Some(max) = self.max_hires_per_specialty {
            if hired >= max {
                return false;
            }
        }
        staffed == 0 || waiting > self.backlog_threshold
    }
}

impl Default for HiringPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BACKLOG_THRESHOLD)
    }
}

/// Distribution of incident service durations, in simulated units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DurationPolicy {
    Fixed(SimTime),
    /// Inclusive range
    Uniform { min: SimTime, max: SimTime },
    Normal { mean: f64, std_dev: f64 },
    Exponential { mean: f64 },
}

impl Default for DurationPolicy {
    fn default() -> Self {
        DurationPolicy::Uniform { min: 2, max: 8 }
    }
}

impl DurationPolicy {
    pub fn validate(&self) -> Result<(), WorkshopError> {
        match *self {
            DurationPolicy::Fixed(0) => Err(WorkshopError::InvalidConfig(
                "fixed duration must be greater than 0".to_string(),
            )),
            DurationPolicy::Uniform { min, max } if min > max => Err(WorkshopError::InvalidConfig(
                "uniform duration min cannot be greater than max".to_string(),
            )),
            DurationPolicy::Normal { mean, std_dev }
                if !(mean > 0.0) || !mean.is_finite() || !(std_dev >= 0.0) || !std_dev.is_finite() =>
            {
                Err(WorkshopError::InvalidConfig(
                    "normal duration needs a finite positive mean and a finite, non-negative std dev"
                        .to_string(),
                ))
            }
            DurationPolicy::Exponential { mean } if !(mean > 0.0) || !mean.is_finite() => Err(
                WorkshopError::InvalidConfig("exponential duration mean must be finite and positive".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Draw one duration, clamped to `1..=MAX_SERVICE_DURATION`.
    ///
    /// Callers validate the policy first; an invalid parameterization falls
    /// back to a single unit.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> SimTime {
        let raw = match *self {
            DurationPolicy::Fixed(d) => d,
            DurationPolicy::Uniform { min, max } => {
                if min >= max {
                    min
                } else {
                    rng.gen_range(min..=max)
                }
            }
            DurationPolicy::Normal { mean, std_dev } => Normal::new(mean, std_dev)
                .map(|dist| dist.sample(rng).round().max(0.0) as SimTime)
                .unwrap_or(1),
            DurationPolicy::Exponential { mean } => Exp::new(1.0 / mean)
                .map(|dist| dist.sample(rng).round() as SimTime)
                .unwrap_or(1),
        };
        raw.clamp(1, MAX_SERVICE_DURATION)
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub clock: ClockMode,
    pub hiring: HiringPolicy,
    pub durations: DurationPolicy,
    /// Seed for every random draw of a run
    pub seed: u64,
    /// Chance that a synthetic vehicle is a priority vehicle
    pub priority_ratio: f64,
    /// Stop once simulated time reaches this value, leaving the rest pending
    pub time_limit: Option<SimTime>,
    /// How batches of scenarios are executed
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for batch execution
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl SimulationConfig {
    /// Create a configuration with default values
    ///
    /// Defaults: simulated clock, backlog threshold 3 with no hiring cap,
    /// uniform 2..=8 durations, seed 42, 25% priority vehicles, no time limit,
    /// sequential batches.
    pub fn new() -> Self {
        Self {
            clock: ClockMode::default(),
            hiring: HiringPolicy::default(),
            durations: DurationPolicy::default(),
            seed: DEFAULT_SEED,
            priority_ratio: DEFAULT_PRIORITY_RATIO,
            time_limit: None,
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
        }
    }

    pub fn with_clock(mut self, clock: ClockMode) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_hiring(mut self, hiring: HiringPolicy) -> Self {
        self.hiring = hiring;
        self
    }

    pub fn with_durations(mut self, durations: DurationPolicy) -> Self {
        self.durations = durations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_priority_ratio(mut self, ratio: f64) -> Self {
        self.priority_ratio = ratio;
        self
    }

    pub fn with_time_limit(mut self, limit: SimTime) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Set the concurrency mode for scenario batches
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for batch execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn validate(&self) -> Result<(), WorkshopError> {
        self.durations.validate()?;

        if !(0.0..=1.0).contains(&self.priority_ratio) {
            return Err(WorkshopError::InvalidConfig(
                "priority ratio must be between 0 and 1".to_string(),
            ));
        }

        if let ClockMode::RealTime { unit } = self.clock {
            if unit.is_zero() {
                return Err(WorkshopError::InvalidConfig(
                    "real-time unit must be greater than 0".to_string(),
                ));
            }
        }

        if self.thread_pool_size == Some(0) {
            return Err(WorkshopError::InvalidConfig(
                "thread pool size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
