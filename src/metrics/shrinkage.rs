// src/metrics/shrinkage.rs

use crate::error::{Result, ShrinkageError};
use crate::simulation::engine::RentalBatch;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// A rental batch with its observed shrinkage rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedBatch {
    pub storage_center: u32,
    pub batch_size: u32,
    pub rental_date: NaiveDate,
    pub return_date: NaiveDate,
    pub lost_boxes_quantity: u32,
    pub pool_size: u32,
    pub shrinkage_rate: f64,
}

impl AnnotatedBatch {
    fn from_batch(batch: &RentalBatch) -> Result<Self> {
        if batch.batch_size == 0 {
            return Err(ShrinkageError::Domain(format!(
                "storage center {}: batch rented on {} has size 0",
                batch.storage_center, batch.rental_date
            )));
        }
        Ok(Self {
            storage_center: batch.storage_center,
            batch_size: batch.batch_size,
            rental_date: batch.rental_date,
            return_date: batch.return_date,
            lost_boxes_quantity: batch.lost_boxes_quantity,
            pool_size: batch.pool_size,
            shrinkage_rate: f64::from(batch.lost_boxes_quantity) / f64::from(batch.batch_size),
        })
    }
}

/// Adds `shrinkage_rate = lost / batch_size` to every record, keeping order.
pub fn annotate_shrinkage_rate(records: &[RentalBatch]) -> Result<Vec<AnnotatedBatch>> {
    records.iter().map(AnnotatedBatch::from_batch).collect()
}

/// Shrinkage totals for one storage center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CenterSummary {
    pub storage_center: u32,
    pub batches: usize,
    pub boxes_rented: u64,
    pub boxes_lost: u64,
    /// Mean of the per-batch rates.
    pub mean_shrinkage_rate: f64,
}

/// Per-center totals, ordered by storage center id.
pub fn shrinkage_breakdown(rows: &[AnnotatedBatch]) -> Vec<CenterSummary> {
    let mut by_center: BTreeMap<u32, (usize, u64, u64, f64)> = BTreeMap::new();
    for row in rows {
        let entry = by_center.entry(row.storage_center).or_default();
        entry.0 += 1;
        entry.1 += u64::from(row.batch_size);
        entry.2 += u64::from(row.lost_boxes_quantity);
        entry.3 += row.shrinkage_rate;
    }

    by_center
        .into_iter()
        .map(|(storage_center, (batches, rented, lost, rate_sum))| CenterSummary {
            storage_center,
            batches,
            boxes_rented: rented,
            boxes_lost: lost,
            mean_shrinkage_rate: rate_sum / batches as f64,
        })
        .collect()
}

/// Lost over rented across the whole table; `None` when nothing was rented.
pub fn overall_shrinkage_rate(rows: &[AnnotatedBatch]) -> Option<f64> {
    let rented: u64 = rows.iter().map(|r| u64::from(r.batch_size)).sum();
    if rented == 0 {
        return None;
    }
    let lost: u64 = rows.iter().map(|r| u64::from(r.lost_boxes_quantity)).sum();
    Some(lost as f64 / rented as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(storage_center: u32, batch_size: u32, lost: u32) -> RentalBatch {
        let rental_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        RentalBatch {
            storage_center,
            batch_size,
            rental_date,
            return_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            lost_boxes_quantity: lost,
            pool_size: 500,
        }
    }

    #[test]
    fn rate_is_lost_over_size() {
        let rows = annotate_shrinkage_rate(&[batch(1, 10, 2), batch(2, 4, 0)]).unwrap();
        assert_eq!(rows[0].shrinkage_rate, 0.2);
        assert_eq!(rows[1].shrinkage_rate, 0.0);
        assert_eq!(rows[0].storage_center, 1);
        assert_eq!(rows[1].storage_center, 2);
    }

    #[test]
    fn zero_batch_size_is_domain_error() {
        let err = annotate_shrinkage_rate(&[batch(1, 10, 1), batch(1, 0, 0)]).unwrap_err();
        assert!(matches!(err, ShrinkageError::Domain(_)));
    }

    #[test]
    fn annotating_twice_is_stable() {
        let records = vec![batch(1, 10, 3), batch(1, 7, 1)];
        let once = annotate_shrinkage_rate(&records).unwrap();
        let twice = annotate_shrinkage_rate(&records).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn breakdown_groups_by_center() {
        let rows =
            annotate_shrinkage_rate(&[batch(2, 10, 1), batch(1, 20, 4), batch(2, 10, 3)]).unwrap();
        let summary = shrinkage_breakdown(&rows);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].storage_center, 1);
        assert_eq!(summary[0].boxes_lost, 4);
        assert_eq!(summary[1].batches, 2);
        assert_eq!(summary[1].boxes_rented, 20);
        assert!((summary[1].mean_shrinkage_rate - 0.2).abs() < 1e-12);
    }

    #[test]
    fn overall_rate_of_empty_table_is_none() {
        assert_eq!(overall_shrinkage_rate(&[]), None);
        let rows = annotate_shrinkage_rate(&[batch(1, 10, 1), batch(2, 30, 3)]).unwrap();
        assert_eq!(overall_shrinkage_rate(&rows), Some(0.1));
    }
}
