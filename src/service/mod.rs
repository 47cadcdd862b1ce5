pub mod aggregator;
pub mod pipeline;
pub mod reconciler;
pub mod sales_file;

pub use pipeline::{ProductFailure, ProductOutcome, ReportPipeline, RunSummary, Stage};
