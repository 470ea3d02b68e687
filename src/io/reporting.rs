// src/io/reporting.rs

use crate::error::Result;
use crate::metrics::shrinkage::{overall_shrinkage_rate, shrinkage_breakdown, AnnotatedBatch};
use std::path::Path;
use tracing::info;

/// Exports the annotated batch table as CSV, one row per batch, with a
/// header row taken from the `AnnotatedBatch` field names.
pub fn write_batch_log<P: AsRef<Path>>(file_path: P, data: &[AnnotatedBatch]) -> Result<()> {
    let path = file_path.as_ref();

    let mut wtr = csv::Writer::from_path(path)?;
    for record in data {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    info!(rows = data.len(), path = %path.display(), "exported batch log");
    Ok(())
}

/// Renders the batch table followed by the per-center breakdown.
pub fn format_table(rows: &[AnnotatedBatch]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>6} {:>6} {:>12} {:>12} {:>6} {:>9} {:>9}\n",
        "sc", "size", "rental", "return", "lost", "pool", "rate"
    ));
    out.push_str(&format!("{}\n", "-".repeat(66)));
    for row in rows {
        out.push_str(&format!(
            "{:>6} {:>6} {:>12} {:>12} {:>6} {:>9} {:>9.4}\n",
            row.storage_center,
            row.batch_size,
            row.rental_date.to_string(),
            row.return_date.to_string(),
            row.lost_boxes_quantity,
            row.pool_size,
            row.shrinkage_rate
        ));
    }
    out.push_str(&format!("[{} rows]\n", rows.len()));

    out.push_str("\n=== Shrinkage by Storage Center ===\n");
    for summary in shrinkage_breakdown(rows) {
        out.push_str(&format!(
            "SC {}: {} batches, {} lost / {} rented, mean rate {:.4}\n",
            summary.storage_center,
            summary.batches,
            summary.boxes_lost,
            summary.boxes_rented,
            summary.mean_shrinkage_rate
        ));
    }
    match overall_shrinkage_rate(rows) {
        Some(rate) => out.push_str(&format!("Overall shrinkage rate: {:.4}\n", rate)),
        None => out.push_str("Overall shrinkage rate: n/a (no completed trips)\n"),
    }
    out
}

pub fn print_table(rows: &[AnnotatedBatch]) {
    print!("{}", format_table(rows));
}
