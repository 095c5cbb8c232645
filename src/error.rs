//! Precondition skips shared by the pipeline stages.
//!
//! A skip is not a failure: the stage or chart is left out and the run goes on.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Skipped {
    #[error("No dataset loaded. Please load a dataset first.")]
    NotLoaded,
    #[error("table still holds {0} missing values")]
    MissingValues(usize),
    #[error("no categorical columns found")]
    NoCategoricalColumn,
    #[error("needs {needed} numeric column(s), found {found}")]
    NotEnoughNumeric { needed: usize, found: usize },
    #[error("table has no rows")]
    EmptyTable,
}
