//! Table Module
//! Typed view over a Polars DataFrame: column kinds, missing values, value extraction.

use polars::prelude::*;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
}

/// How a column takes part in the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    fn of(dtype: &DataType) -> Self {
        if matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        ) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Name, kind and storage type of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: String,
}

/// In-memory table shared by the pipeline stages.
///
/// Rows are addressed by position; the position doubles as the x axis of the
/// trend chart.
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
}

impl From<DataFrame> for Table {
    fn from(df: DataFrame) -> Self {
        Self::new(df)
    }
}

impl Table {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> DataFrame {
        self.df.head(Some(n))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Column descriptions in column order.
    pub fn columns(&self) -> Vec<ColumnInfo> {
        self.df
            .get_columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                kind: ColumnKind::of(col.dtype()),
                dtype: col.dtype().to_string(),
            })
            .collect()
    }

    fn columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.columns()
            .into_iter()
            .filter(|info| info.kind == kind)
            .map(|info| info.name)
            .collect()
    }

    /// Names of numeric columns in column order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns_of_kind(ColumnKind::Numeric)
    }

    /// Names of categorical columns in column order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns_of_kind(ColumnKind::Categorical)
    }

    /// Row-aligned values of a numeric column. Nulls and NaN come back as `None`.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>, TableError> {
        let column = self.df.column(name)?;
        if ColumnKind::of(column.dtype()) != ColumnKind::Numeric {
            return Err(TableError::NotNumeric(name.to_string()));
        }

        let as_f64 = column.cast(&DataType::Float64)?;
        let values = as_f64
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// Non-missing values of a numeric column, in row order.
    pub fn present_values(&self, name: &str) -> Result<Vec<f64>, TableError> {
        Ok(self.numeric_values(name)?.into_iter().flatten().collect())
    }

    /// Row-aligned values of any column rendered as strings.
    pub fn label_values(&self, name: &str) -> Result<Vec<Option<String>>, TableError> {
        let as_str = self.df.column(name)?.cast(&DataType::String)?;
        let labels = as_str
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_owned))
            .collect();
        Ok(labels)
    }

    /// Per-row "is missing" flags for one column.
    fn missing_flags(&self, column: &Column) -> Result<Vec<bool>, TableError> {
        if ColumnKind::of(column.dtype()) == ColumnKind::Numeric {
            let values = self.numeric_values(column.name().as_str())?;
            return Ok(values.iter().map(Option::is_none).collect());
        }

        Ok(column
            .as_materialized_series()
            .is_null()
            .into_iter()
            .map(|v| v.unwrap_or(true))
            .collect())
    }

    /// Missing-value count for every column, in column order.
    pub fn missing_counts(&self) -> Result<Vec<(String, usize)>, TableError> {
        self.df
            .get_columns()
            .iter()
            .map(|col| {
                let missing = self.missing_flags(col)?.into_iter().filter(|m| *m).count();
                Ok((col.name().to_string(), missing))
            })
            .collect()
    }

    pub fn total_missing(&self) -> Result<usize, TableError> {
        Ok(self.missing_counts()?.iter().map(|(_, n)| n).sum())
    }

    /// New table without the rows that hold a missing value in any column.
    pub fn drop_missing(&self) -> Result<Table, TableError> {
        let mut keep = vec![true; self.height()];
        for col in self.df.get_columns() {
            for (row, missing) in self.missing_flags(col)?.into_iter().enumerate() {
                if missing {
                    keep[row] = false;
                }
            }
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        Ok(Table::new(self.df.filter(&mask)?))
    }
}
