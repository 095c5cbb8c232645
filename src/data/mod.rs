//! Data module - dataset loading, table model and cleaning

mod explorer;
mod loader;
pub mod sample;
mod table;

pub use explorer::{ExplorationReport, Explorer, PREVIEW_ROWS};
pub use loader::{DataLoader, DataSource, LoadResult, LoaderError};
pub use table::{ColumnInfo, ColumnKind, Table, TableError};
