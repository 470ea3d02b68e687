// src/simulation/config.rs

use crate::error::{Result, ShrinkageError};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Parameters of one simulation run. Field names follow the keys of the
/// `params` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    pub days_number: u32,
    pub starting_date: NaiveDate,
    pub max_batches_per_day: u32,
    pub sc_quantity: u32,

    // Storage center size distribution
    pub sc_size_avg: f64,
    pub sc_size_sd: f64,

    /// Centers holding fewer containers than this stop issuing for the day.
    pub target_sc_rpc_pool_size: u32,

    // Per-center shrinkage rate distribution
    pub sc_shrinkage_rate_avg: f64,
    pub sc_shrinkage_rate_sd: f64,

    // Extra shrinkage drawn for every batch
    pub general_shrinkage_rate_avg: f64,
    pub general_shrinkage_rate_sd: f64,

    pub rpc_batch_avg_size: f64,
    pub rpc_batch_sd_size: f64,

    pub rpc_trip_avg_days_duration: f64,
    pub rpc_trip_sd_days_duration: f64,
}

/// On-disk layout: everything lives under a top-level `params` object.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    params: SimulationConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days_number: 365,
            starting_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            max_batches_per_day: 5,
            sc_quantity: 5,
            sc_size_avg: 5000.0,
            sc_size_sd: 1000.0,
            target_sc_rpc_pool_size: 500,
            sc_shrinkage_rate_avg: 0.02,
            sc_shrinkage_rate_sd: 0.01,
            general_shrinkage_rate_avg: 0.01,
            general_shrinkage_rate_sd: 0.005,
            rpc_batch_avg_size: 100.0,
            rpc_batch_sd_size: 30.0,
            rpc_trip_avg_days_duration: 14.0,
            rpc_trip_sd_days_duration: 4.0,
        }
    }
}

impl SimulationConfig {
    /// Reads a JSON configuration file and validates it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            ShrinkageError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    /// Parses the `{"params": {...}}` layout and validates the result.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(raw)
            .map_err(|e| ShrinkageError::Config(format!("invalid configuration: {}", e)))?;
        file.params.validate()?;
        Ok(file.params)
    }

    /// First calendar day outside the simulated horizon.
    pub fn end_date(&self) -> NaiveDate {
        self.starting_date + Duration::days(i64::from(self.days_number))
    }

    /// Checks the preconditions of a run. `Sampler::new` repeats the
    /// distribution checks for callers that skip this.
    pub fn validate(&self) -> Result<()> {
        if self.days_number == 0 {
            return Err(ShrinkageError::Config(
                "days_number must be at least 1".to_string(),
            ));
        }
        if self.sc_quantity == 0 {
            return Err(ShrinkageError::Config(
                "sc_quantity must be at least 1".to_string(),
            ));
        }
        if self.max_batches_per_day == 0 {
            return Err(ShrinkageError::Config(
                "max_batches_per_day must be at least 1".to_string(),
            ));
        }
        if self
            .starting_date
            .checked_add_signed(Duration::days(i64::from(self.days_number)))
            .is_none()
        {
            return Err(ShrinkageError::Config(
                "simulation horizon overflows the calendar".to_string(),
            ));
        }

        for (name, mean, sd) in self.distributions() {
            if !mean.is_finite() {
                return Err(ShrinkageError::Config(format!(
                    "{} mean must be finite, got {}",
                    name, mean
                )));
            }
            if !sd.is_finite() || sd < 0.0 {
                return Err(ShrinkageError::Config(format!(
                    "{} standard deviation must be finite and non-negative, got {}",
                    name, sd
                )));
            }
        }
        Ok(())
    }

    fn distributions(&self) -> [(&'static str, f64, f64); 5] {
        [
            ("sc_size", self.sc_size_avg, self.sc_size_sd),
            (
                "sc_shrinkage_rate",
                self.sc_shrinkage_rate_avg,
                self.sc_shrinkage_rate_sd,
            ),
            (
                "general_shrinkage_rate",
                self.general_shrinkage_rate_avg,
                self.general_shrinkage_rate_sd,
            ),
            ("rpc_batch_size", self.rpc_batch_avg_size, self.rpc_batch_sd_size),
            (
                "rpc_trip_days_duration",
                self.rpc_trip_avg_days_duration,
                self.rpc_trip_sd_days_duration,
            ),
        ]
    }
}
