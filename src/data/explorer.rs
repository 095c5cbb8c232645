//! Data Explorer Module
//! Reports table structure and removes rows with missing values.

use super::table::{ColumnInfo, Table, TableError};
use polars::prelude::DataFrame;
use std::fmt;

/// Number of rows shown in the preview.
pub const PREVIEW_ROWS: usize = 5;

/// What the explorer saw before cleaning.
#[derive(Debug, Clone)]
pub struct ExplorationReport {
    pub preview: DataFrame,
    pub shape: (usize, usize),
    pub columns: Vec<ColumnInfo>,
    /// Only columns with at least one missing value.
    pub missing: Vec<(String, usize)>,
}

impl ExplorationReport {
    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|(_, n)| n).sum()
    }
}

impl fmt::Display for ExplorationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n📊 First {} rows of the dataset:", PREVIEW_ROWS)?;
        writeln!(f, "{}", self.preview)?;

        writeln!(f, "\n📐 Dataset Shape: {:?}", self.shape)?;

        writeln!(f, "\n🔍 Data Types:")?;
        let name_width = self.columns.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for column in &self.columns {
            writeln!(
                f,
                "{:<width$}  {:<11}  {}",
                column.name,
                column.kind.to_string(),
                column.dtype,
                width = name_width
            )?;
        }

        writeln!(f, "\n🔎 Missing Values:")?;
        if self.missing.is_empty() {
            writeln!(f, "(none)")?;
        }
        for (name, count) in &self.missing {
            writeln!(f, "{:<width$}  {}", name, count, width = name_width)?;
        }
        Ok(())
    }
}

/// Inspects and cleans a table.
pub struct Explorer;

impl Explorer {
    /// Collect shape, types and missing-value counts without touching the table.
    pub fn inspect(table: &Table) -> Result<ExplorationReport, TableError> {
        let missing = table
            .missing_counts()?
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .collect();

        Ok(ExplorationReport {
            preview: table.head(PREVIEW_ROWS),
            shape: table.shape(),
            columns: table.columns(),
            missing,
        })
    }

    /// Print the exploration report and return the table with every incomplete
    /// row removed. A clean table comes back unchanged.
    pub fn explore(table: Table) -> Result<Table, TableError> {
        println!("{}", "=".repeat(50));
        println!("DATASET EXPLORATION");
        println!("{}", "=".repeat(50));

        let report = Self::inspect(&table)?;
        println!("{report}");

        if report.total_missing() == 0 {
            println!("\n✅ No missing values found!");
            return Ok(table);
        }

        println!("\n🧹 Cleaning missing values...");
        let cleaned = table.drop_missing()?;
        let removed = table.height() - cleaned.height();
        log::info!(
            "dropped {removed} of {} rows holding {} missing values",
            table.height(),
            report.total_missing()
        );
        println!("Missing values removed ({removed} rows dropped).");

        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table_with_gaps() -> Table {
        let df = DataFrame::new(vec![
            Column::new("a".into(), vec![Some(1.0), None, Some(3.0), Some(4.0)]),
            Column::new("b".into(), vec![Some("x"), Some("y"), None, Some("x")]),
        ])
        .unwrap();
        Table::new(df)
    }

    #[test]
    fn test_inspect_lists_only_columns_with_gaps() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), vec![Some(1.0), None]),
            Column::new("b".into(), vec!["x", "y"]),
        ])
        .unwrap();
        let report = Explorer::inspect(&Table::new(df)).unwrap();
        assert_eq!(report.missing, vec![("a".to_string(), 1)]);
        assert_eq!(report.shape, (2, 2));
    }

    #[test]
    fn test_clean_report_ends_with_newline() {
        let df = DataFrame::new(vec![Column::new("a".into(), vec![1.0, 2.0])]).unwrap();
        let text = Explorer::inspect(&Table::new(df)).unwrap().to_string();
        assert!(text.ends_with("(none)\n"));
    }

    #[test]
    fn test_explore_drops_incomplete_rows() {
        let table = table_with_gaps();
        let before = table.height();
        let cleaned = Explorer::explore(table).unwrap();
        assert_eq!(cleaned.height(), 2);
        assert!(cleaned.height() <= before);
        assert_eq!(cleaned.total_missing().unwrap(), 0);
    }

    #[test]
    fn test_explore_is_idempotent() {
        let once = Explorer::explore(table_with_gaps()).unwrap();
        let names = once.column_names();
        let twice = Explorer::explore(once.clone()).unwrap();
        assert_eq!(twice.height(), once.height());
        assert_eq!(twice.column_names(), names);
    }
}
