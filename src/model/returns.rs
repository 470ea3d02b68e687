// src/model/returns.rs

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Containers on a trip, keyed by the day they come back.
///
/// Several batches may share a return date; their counts are summed.
#[derive(Debug, Clone, Default)]
pub struct ReturnSchedule {
    pending: BTreeMap<NaiveDate, u32>,
}

impl ReturnSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Books `count` containers to arrive on `date`.
    pub fn schedule(&mut self, date: NaiveDate, count: u32) {
        *self.pending.entry(date).or_insert(0) += count;
    }

    /// Removes every entry dated on or before `today` and returns their total.
    /// Call this once per day, after the issuance pass.
    pub fn pop_due(&mut self, today: NaiveDate) -> u32 {
        let mut due = 0;
        while let Some(entry) = self.pending.first_entry() {
            if *entry.key() > today {
                break;
            }
            due += entry.remove();
        }
        due
    }

    /// Containers still travelling.
    pub fn outstanding(&self) -> u32 {
        self.pending.values().sum()
    }

    /// Earliest pending return date, if any.
    pub fn next_due(&self) -> Option<NaiveDate> {
        self.pending.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
