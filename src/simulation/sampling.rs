// src/simulation/sampling.rs

use crate::error::{Result, ShrinkageError};
use crate::simulation::config::SimulationConfig;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// The normal distributions of a run, with the floors and clamps applied to
/// every draw so nothing downstream sees a negative size or a rate above 1.
#[derive(Debug, Clone)]
pub struct Sampler {
    sc_size: Normal<f64>,
    sc_shrinkage_rate: Normal<f64>,
    general_shrinkage_rate: Normal<f64>,
    batch_size: Normal<f64>,
    trip_duration: Normal<f64>,
    max_batches_per_day: u32,
}

// `Normal::new` does not reject a negative standard deviation.
fn normal(name: &str, mean: f64, sd: f64) -> Result<Normal<f64>> {
    if !mean.is_finite() {
        return Err(ShrinkageError::Config(format!(
            "invalid {} distribution: mean must be finite, got {}",
            name, mean
        )));
    }
    if !sd.is_finite() || sd < 0.0 {
        return Err(ShrinkageError::Config(format!(
            "invalid {} distribution: standard deviation must be finite and non-negative, got {}",
            name, sd
        )));
    }
    Normal::new(mean, sd)
        .map_err(|e| ShrinkageError::Config(format!("invalid {} distribution: {}", name, e)))
}

/// Integer part of a draw, floored at `min`. Truncation goes toward zero.
fn truncate_at_least(value: f64, min: i64) -> i64 {
    (value as i64).max(min)
}

impl Sampler {
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        if config.max_batches_per_day == 0 {
            return Err(ShrinkageError::Config(
                "max_batches_per_day must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            sc_size: normal("sc_size", config.sc_size_avg, config.sc_size_sd)?,
            sc_shrinkage_rate: normal(
                "sc_shrinkage_rate",
                config.sc_shrinkage_rate_avg,
                config.sc_shrinkage_rate_sd,
            )?,
            general_shrinkage_rate: normal(
                "general_shrinkage_rate",
                config.general_shrinkage_rate_avg,
                config.general_shrinkage_rate_sd,
            )?,
            batch_size: normal(
                "rpc_batch_size",
                config.rpc_batch_avg_size,
                config.rpc_batch_sd_size,
            )?,
            trip_duration: normal(
                "rpc_trip_days_duration",
                config.rpc_trip_avg_days_duration,
                config.rpc_trip_sd_days_duration,
            )?,
            max_batches_per_day: config.max_batches_per_day,
        })
    }

    /// Initial pool size of a storage center, at least 1.
    pub fn capacity<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        truncate_at_least(self.sc_size.sample(rng), 1).min(i64::from(u32::MAX)) as u32
    }

    /// Base shrinkage rate of a storage center, clamped to [0, 1].
    pub fn base_shrinkage_rate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sc_shrinkage_rate.sample(rng).clamp(0.0, 1.0)
    }

    /// Number of batches a center attempts today, uniform in `[1, max_batches_per_day]`.
    pub fn batches_today<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(1..=self.max_batches_per_day)
    }

    pub fn batch_size<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        truncate_at_least(self.batch_size.sample(rng), 1).min(i64::from(u32::MAX)) as u32
    }

    /// Trip length in whole days, at least 1.
    pub fn trip_duration<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        truncate_at_least(self.trip_duration.sample(rng), 1)
    }

    /// Extra shrinkage for one batch; negative draws count as zero.
    pub fn batch_shrinkage<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.general_shrinkage_rate.sample(rng).max(0.0)
    }
}
