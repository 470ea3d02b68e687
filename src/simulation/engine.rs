// src/simulation/engine.rs

use crate::error::{Result, ShrinkageError};
use crate::model::storage_center::StorageCenter;
use crate::simulation::config::SimulationConfig;
use crate::simulation::sampling::Sampler;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, trace};

/// One rental batch issued by a storage center.
// Serialize so the reporting layer can write it straight to CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalBatch {
    pub storage_center: u32,
    pub batch_size: u32,
    pub rental_date: NaiveDate,
    pub return_date: NaiveDate,
    pub lost_boxes_quantity: u32,
    /// Containers left at the center right after this batch went out.
    pub pool_size: u32,
}

/// Day-by-day simulation of container rentals, losses and returns.
pub struct ShrinkageSimulation<R: Rng> {
    config: SimulationConfig,
    sampler: Sampler,
    rng: R,

    // The Actors
    centers: Vec<StorageCenter>,

    pub current_day: u32,
    history: Vec<RentalBatch>,
}

impl<R: Rng> ShrinkageSimulation<R> {
    /// Validates the configuration and draws every storage center's size and
    /// base shrinkage rate, in id order.
    pub fn new(config: SimulationConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let sampler = Sampler::new(&config)?;

        let centers = (1..=config.sc_quantity)
            .map(|id| {
                let capacity = sampler.capacity(&mut rng);
                let base_rate = sampler.base_shrinkage_rate(&mut rng);
                StorageCenter::new(id, capacity, base_rate)
            })
            .collect();

        Ok(Self {
            config,
            sampler,
            rng,
            centers,
            current_day: 0,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn centers(&self) -> &[StorageCenter] {
        &self.centers
    }

    /// Every batch issued so far, including those still out past the horizon.
    pub fn history(&self) -> &[RentalBatch] {
        &self.history
    }

    pub fn current_date(&self) -> NaiveDate {
        self.config.starting_date + Duration::days(i64::from(self.current_day))
    }

    pub fn is_finished(&self) -> bool {
        self.current_day >= self.config.days_number
    }

    /// Runs every remaining day of the horizon.
    pub fn run(&mut self) -> Result<()> {
        info!(
            days = self.config.days_number,
            centers = self.centers.len(),
            start = %self.config.starting_date,
            "starting simulation"
        );
        while !self.is_finished() {
            self.step()?;
        }

        let lost: u64 = self.centers.iter().map(StorageCenter::lost_total).sum();
        let in_transit: u64 = self
            .centers
            .iter()
            .map(|sc| u64::from(sc.in_transit()))
            .sum();
        info!(
            batches = self.history.len(),
            lost,
            in_transit,
            "simulation complete"
        );
        Ok(())
    }

    /// Simulates one day: every center issues its batches, then every center
    /// takes back the containers due today.
    pub fn step(&mut self) -> Result<()> {
        let today = self.current_date();
        let issued_before = self.history.len();

        // PHASE 1: issuance, center by center in id order
        for idx in 0..self.centers.len() {
            self.issue_batches(idx, today)?;
        }

        // PHASE 2: returns
        let mut returned = 0u64;
        for sc in &mut self.centers {
            returned += u64::from(sc.receive_returns(today)?);
        }

        debug!(
            date = %today,
            issued = self.history.len() - issued_before,
            returned,
            "day complete"
        );
        self.current_day += 1;
        Ok(())
    }

    fn issue_batches(&mut self, idx: usize, today: NaiveDate) -> Result<()> {
        let sc = &mut self.centers[idx];
        if !sc.can_issue(self.config.target_sc_rpc_pool_size) {
            trace!(
                storage_center = sc.id,
                available = sc.available(),
                "below target pool size, skipping day"
            );
            return Ok(());
        }

        let num_batches = self.sampler.batches_today(&mut self.rng);
        for _ in 0..num_batches {
            let batch_size = self.sampler.batch_size(&mut self.rng);
            // No partial batches
            if !sc.has_room_for(batch_size) {
                continue;
            }

            let trip_duration = self.sampler.trip_duration(&mut self.rng);
            let return_date = Duration::try_days(trip_duration)
                .and_then(|trip| today.checked_add_signed(trip))
                .ok_or_else(|| {
                    ShrinkageError::Domain(format!(
                        "storage center {}: a {} day trip from {} leaves the calendar",
                        sc.id, trip_duration, today
                    ))
                })?;

            let batch_shrinkage = self.sampler.batch_shrinkage(&mut self.rng);
            let total_shrinkage = (sc.base_shrinkage_rate + batch_shrinkage).clamp(0.0, 1.0);
            let lost = batch_lost(batch_size, total_shrinkage);

            let pool_size = sc.issue(batch_size, lost, return_date)?;
            trace!(
                storage_center = sc.id,
                batch_size,
                lost,
                %return_date,
                pool_size,
                "batch issued"
            );
            self.history.push(RentalBatch {
                storage_center: sc.id,
                batch_size,
                rental_date: today,
                return_date,
                lost_boxes_quantity: lost,
                pool_size,
            });
        }
        Ok(())
    }
}

/// Containers lost from a batch at the given shrinkage rate, rounded down.
fn batch_lost(batch_size: u32, shrinkage_rate: f64) -> u32 {
    let lost = (f64::from(batch_size) * shrinkage_rate).floor() as u32;
    lost.min(batch_size)
}

/// Keeps only the batches back before `end_date`; trips still running at the
/// end of the horizon are dropped.
pub fn truncate(records: &[RentalBatch], end_date: NaiveDate) -> Vec<RentalBatch> {
    records
        .iter()
        .filter(|record| record.return_date < end_date)
        .cloned()
        .collect()
}

/// Runs a full simulation with a `StdRng` seeded from `seed` and returns the
/// completed trips.
pub fn simulate(config: &SimulationConfig, seed: u64) -> Result<Vec<RentalBatch>> {
    let mut sim = ShrinkageSimulation::new(config.clone(), StdRng::seed_from_u64(seed))?;
    sim.run()?;
    Ok(truncate(sim.history(), sim.config().end_date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn record(return_date: NaiveDate) -> RentalBatch {
        RentalBatch {
            storage_center: 1,
            batch_size: 10,
            rental_date: day(1),
            return_date,
            lost_boxes_quantity: 1,
            pool_size: 90,
        }
    }

    #[test]
    fn lost_rounds_down() {
        assert_eq!(batch_lost(10, 0.19), 1);
        assert_eq!(batch_lost(10, 0.0), 0);
        assert_eq!(batch_lost(7, 1.0), 7);
    }

    #[test]
    fn truncate_drops_trips_ending_on_or_after_end() {
        let records = vec![record(day(4)), record(day(5)), record(day(9))];
        let kept = truncate(&records, day(5));
        assert_eq!(kept, vec![record(day(4))]);
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn step_advances_one_day() {
        let config = SimulationConfig {
            days_number: 3,
            sc_quantity: 2,
            ..Default::default()
        };
        let mut sim = ShrinkageSimulation::new(config.clone(), StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(sim.current_date(), config.starting_date);
        sim.step().unwrap();
        assert_eq!(sim.current_day, 1);
        assert!(sim
            .history()
            .iter()
            .all(|r| r.rental_date == config.starting_date));
        sim.run().unwrap();
        assert!(sim.is_finished());
        assert_eq!(sim.current_day, 3);
    }

    #[test]
    fn same_seed_same_log() {
        let config = SimulationConfig {
            days_number: 60,
            ..Default::default()
        };
        let a = simulate(&config, 42).unwrap();
        let b = simulate(&config, 42).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }
}
