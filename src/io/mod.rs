pub mod plots;
pub mod reporting;
