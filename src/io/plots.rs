// src/io/plots.rs

//! HTML charts of a finished run: shrinkage-rate histograms and the pool size
//! of every storage center over time.

use crate::error::Result;
use crate::metrics::shrinkage::AnnotatedBatch;
use plotly::{
    color::NamedColor,
    common::{Marker, Mode},
    layout::{Axis, Layout},
    Histogram, Plot, Scatter,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const HISTOGRAM_BINS: usize = 30;

fn save(plot: &Plot, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    fs::write(&path, plot.to_html())?;
    info!(path = %path.display(), "chart saved");
    Ok(path)
}

fn rate_histogram(rates: Vec<f64>, title: &str) -> Plot {
    let trace = Histogram::new(rates)
        .name("Shrinkage Rate")
        .n_bins_x(HISTOGRAM_BINS)
        .marker(Marker::new().color(NamedColor::Blue));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("Shrinkage Rate"))
            .y_axis(
                Axis::new()
                    .title("Frequency")
                    .grid_color(NamedColor::LightGray),
            ),
    );
    plot
}

/// Histogram of every batch's shrinkage rate, saved as `shrinkage_rate_overall.html`.
pub fn plot_shrinkage_rate<P: AsRef<Path>>(rows: &[AnnotatedBatch], output_dir: P) -> Result<PathBuf> {
    let rates = rows.iter().map(|r| r.shrinkage_rate).collect();
    let plot = rate_histogram(rates, "Distribution of overall Shrinkage Rates");
    save(&plot, output_dir.as_ref(), "shrinkage_rate_overall.html")
}

/// One histogram per storage center, saved as `shrinkage_rate_sc_<id>.html`.
pub fn plot_shrinkage_rates_by_sc<P: AsRef<Path>>(
    rows: &[AnnotatedBatch],
    output_dir: P,
) -> Result<Vec<PathBuf>> {
    let mut by_center: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for row in rows {
        by_center
            .entry(row.storage_center)
            .or_default()
            .push(row.shrinkage_rate);
    }

    let mut paths = Vec::with_capacity(by_center.len());
    for (storage_center, rates) in by_center {
        let title = format!(
            "Distribution of Shrinkage Rates for Storage Center {}",
            storage_center
        );
        let plot = rate_histogram(rates, &title);
        let file_name = format!("shrinkage_rate_sc_{}.html", storage_center);
        paths.push(save(&plot, output_dir.as_ref(), &file_name)?);
    }
    Ok(paths)
}

/// Pool size after each rental, one line per storage center, saved as `pool_size.html`.
pub fn plot_pool_size<P: AsRef<Path>>(rows: &[AnnotatedBatch], output_dir: P) -> Result<PathBuf> {
    let mut by_center: BTreeMap<u32, (Vec<String>, Vec<u32>)> = BTreeMap::new();
    for row in rows {
        let (dates, pool) = by_center.entry(row.storage_center).or_default();
        dates.push(row.rental_date.format("%Y-%m-%d").to_string());
        pool.push(row.pool_size);
    }

    let mut plot = Plot::new();
    for (storage_center, (dates, pool)) in by_center {
        let trace = Scatter::new(dates, pool)
            .name(&format!("SC {}", storage_center))
            .mode(Mode::Lines);
        plot.add_trace(trace);
    }
    plot.set_layout(
        Layout::new()
            .title("Pool Size Over Time by Storage Center")
            .x_axis(Axis::new().title("Rental Date"))
            .y_axis(
                Axis::new()
                    .title("Pool Size")
                    .grid_color(NamedColor::LightGray),
            ),
    );
    save(&plot, output_dir.as_ref(), "pool_size.html")
}
