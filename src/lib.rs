//! Synthetic rental log for returnable pooled containers (RPCs).
//!
//! Storage centers issue batches of containers every day; some of each batch
//! is lost on the trip and the rest comes back. The log is then annotated with
//! per-batch shrinkage rates for reporting.

pub mod error;
pub mod io;
pub mod metrics;
pub mod model;
pub mod simulation;

pub use error::{Result, ShrinkageError};
pub use metrics::shrinkage::{annotate_shrinkage_rate, AnnotatedBatch};
pub use simulation::config::SimulationConfig;
pub use simulation::engine::{simulate, truncate, RentalBatch, ShrinkageSimulation};
