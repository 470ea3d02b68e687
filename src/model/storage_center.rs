// src/model/storage_center.rs

use crate::error::{Result, ShrinkageError};
use crate::model::returns::ReturnSchedule;
use chrono::NaiveDate;

/// A storage center and its pool of returnable containers.
#[derive(Debug, Clone)]
pub struct StorageCenter {
    // Identity
    pub id: u32,

    // Fixed at creation
    pub capacity: u32,
    pub base_shrinkage_rate: f64,

    // State Variables
    available: u32,
    returns: ReturnSchedule,

    // Running totals, for the conservation check
    issued_total: u64,
    returned_total: u64,
    lost_total: u64,
}

impl StorageCenter {
    /// A full center: every container is on the shelf.
    pub fn new(id: u32, capacity: u32, base_shrinkage_rate: f64) -> Self {
        Self {
            id,
            capacity,
            base_shrinkage_rate,
            available: capacity,
            returns: ReturnSchedule::new(),
            issued_total: 0,
            returned_total: 0,
            lost_total: 0,
        }
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    pub fn returns(&self) -> &ReturnSchedule {
        &self.returns
    }

    /// Containers currently on a trip and expected back.
    pub fn in_transit(&self) -> u32 {
        self.returns.outstanding()
    }

    pub fn issued_total(&self) -> u64 {
        self.issued_total
    }

    /// Containers back on the shelf after a trip.
    pub fn returned_total(&self) -> u64 {
        self.returned_total
    }

    pub fn lost_total(&self) -> u64 {
        self.lost_total
    }

    /// The minimum-pool guard: a center issues only while `available` is not
    /// strictly below the target.
    pub fn can_issue(&self, target_pool_size: u32) -> bool {
        self.available >= target_pool_size
    }

    /// Whether a batch of this size fits in the current pool.
    pub fn has_room_for(&self, batch_size: u32) -> bool {
        batch_size <= self.available
    }

    /// Takes `batch_size` containers off the shelf, books the `batch_size - lost`
    /// survivors for `return_date` and returns the pool size left behind.
    pub fn issue(&mut self, batch_size: u32, lost: u32, return_date: NaiveDate) -> Result<u32> {
        if batch_size == 0 {
            return Err(ShrinkageError::Domain(format!(
                "storage center {}: empty batch",
                self.id
            )));
        }
        if lost > batch_size {
            return Err(ShrinkageError::Domain(format!(
                "storage center {}: {} lost out of a batch of {}",
                self.id, lost, batch_size
            )));
        }
        self.available = self.available.checked_sub(batch_size).ok_or_else(|| {
            ShrinkageError::Domain(format!(
                "storage center {}: batch of {} exceeds {} available",
                self.id, batch_size, self.available
            ))
        })?;

        self.returns.schedule(return_date, batch_size - lost);
        self.issued_total += u64::from(batch_size);
        self.lost_total += u64::from(lost);
        Ok(self.available)
    }

    /// Puts every container due back by `today` on the shelf and returns how many arrived.
    pub fn receive_returns(&mut self, today: NaiveDate) -> Result<u32> {
        let arrived = self.returns.pop_due(today);
        let restored = self
            .available
            .checked_add(arrived)
            .filter(|restored| *restored <= self.capacity)
            .ok_or_else(|| {
                ShrinkageError::Domain(format!(
                    "storage center {}: {} returning containers overflow capacity {} ({} available)",
                    self.id, arrived, self.capacity, self.available
                ))
            })?;
        self.available = restored;
        self.returned_total += u64::from(arrived);
        Ok(arrived)
    }
}
