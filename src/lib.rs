//! Chartify Insight - tabular data exploration and chart report
//!
//! Loads a table (the built-in Iris sample or a delimited file), reports its
//! structure, drops incomplete rows, prints summary statistics with group
//! means, and renders a 2x2 chart grid to a PNG file.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod stats;

pub use charts::{ChartRenderer, Panel, RenderOutcome};
pub use config::AnalysisConfig;
pub use data::{DataLoader, Explorer, LoadResult, LoaderError, Table};
pub use error::Skipped;
pub use pipeline::{run, RunSummary, Stage};
pub use stats::{analyze, AnalysisReport};
