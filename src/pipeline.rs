//! Pipeline Module
//! Runs load, explore, analyze and visualize in order, handing the table
//! from one stage to the next.

use crate::charts::{ChartRenderer, RenderOutcome};
use crate::config::AnalysisConfig;
use crate::data::{DataLoader, Explorer};
use crate::error::Skipped;
use crate::stats::{self, AnalyzeError};
use std::fmt;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Explore,
    Analyze,
    Visualize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Explore => "explore",
            Stage::Analyze => "analyze",
            Stage::Visualize => "visualize",
        };
        write!(f, "{name}")
    }
}

/// What happened during one run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub loaded: bool,
    /// Stages that ran to completion.
    pub completed: Vec<Stage>,
    pub chart: Option<RenderOutcome>,
}

impl RunSummary {
    pub fn ran(&self, stage: Stage) -> bool {
        self.completed.contains(&stage)
    }

    pub fn is_complete(&self) -> bool {
        self.completed.len() == 4
    }
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(50));
    println!("{title}");
    println!("{}", "=".repeat(50));
}

/// Run every stage against the dataset named by `selector`.
///
/// A failed load is reported and ends the run; it is never returned as an
/// error. Later stage failures are logged and leave the remaining stages to run
/// where they still can.
pub fn run(selector: &str, config: &AnalysisConfig) -> RunSummary {
    let mut summary = RunSummary::default();

    let table = match DataLoader::load(selector) {
        Ok(table) => table,
        Err(err) => {
            log::warn!("load of '{selector}' failed: {err}");
            for stage in [Stage::Explore, Stage::Analyze, Stage::Visualize] {
                log::info!("{stage} skipped: {}", Skipped::NotLoaded);
            }
            return summary;
        }
    };
    summary.loaded = true;
    summary.completed.push(Stage::Load);

    let table = match Explorer::explore(table) {
        Ok(table) => table,
        Err(err) => {
            log::error!("exploration failed: {err}");
            println!("❌ Could not clean the dataset: {err}");
            return summary;
        }
    };
    summary.completed.push(Stage::Explore);

    banner("BASIC DATA ANALYSIS");
    match stats::analyze(&table) {
        Ok(report) => {
            println!("{report}");
            summary.completed.push(Stage::Analyze);
        }
        Err(AnalyzeError::Skipped(skip)) => {
            log::info!("analysis skipped: {skip}");
            println!("⚠️ Analysis skipped: {skip}");
        }
        Err(err) => {
            log::error!("analysis failed: {err}");
            println!("❌ {err}");
        }
    }

    banner("DATA VISUALIZATIONS");
    let renderer = ChartRenderer::new(config.chart.clone());
    match renderer.render(&table) {
        Ok(outcome) => {
            println!(
                "✅ Visualizations saved as '{}' ({} of 4 charts)",
                outcome.path.display(),
                outcome.panels.len()
            );
            summary.chart = Some(outcome);
            summary.completed.push(Stage::Visualize);
        }
        Err(err) => {
            log::error!("rendering failed: {err}");
            println!("❌ {err}");
        }
    }

    summary
}

/// Closing lines for the console.
pub fn print_summary(summary: &RunSummary) {
    if !summary.loaded {
        println!("❌ Failed to load dataset. Please check the file path or dataset source.");
        return;
    }

    banner(if summary.is_complete() {
        "✅ ANALYSIS COMPLETED SUCCESSFULLY!"
    } else {
        "⚠️ ANALYSIS FINISHED WITH SKIPPED STAGES"
    });
    println!("\n📋 Summary of completed tasks:");
    let mark = |stage| if summary.ran(stage) { "✓" } else { "✗" };
    println!("{} Task 1: Dataset loaded and explored", mark(Stage::Explore));
    println!("{} Task 2: Basic statistical analysis performed", mark(Stage::Analyze));
    match &summary.chart {
        Some(chart) => {
            println!("✓ Task 3: {} visualizations created", chart.panels.len());
            println!("\n📊 Generated file: '{}'", chart.path.display());
        }
        None => println!("✗ Task 3: visualizations not created"),
    }
}
