//! Statistics module - descriptive statistics and group analysis

mod analyzer;
mod calculator;

pub use analyzer::{analyze, AnalysisReport, AnalyzeError};
pub use calculator::{DescriptiveStats, GroupMeans, GroupSummary, HistogramBin, StatsCalculator};
