//! Data Loader Module
//! Resolves a source selector to a table: the embedded sample or a delimited file.

use super::sample::{self, SAMPLE_SELECTOR};
use super::table::Table;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File {} not found.", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to load dataset: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset {} has no columns", path.display())]
    Empty { path: PathBuf },
}

/// Field values read as missing, on top of empty fields.
pub const NULL_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Outcome of a load; the error carries the message shown to the user.
pub type LoadResult = Result<Table, LoaderError>;

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Sample,
    File(PathBuf),
}

impl DataSource {
    pub fn from_selector(selector: &str) -> Self {
        let trimmed = selector.trim();
        if trimmed.eq_ignore_ascii_case(SAMPLE_SELECTOR) {
            DataSource::Sample
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }
}

/// Handles dataset loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load the table named by `selector` and print a status line either way.
    pub fn load(selector: &str) -> LoadResult {
        let source = DataSource::from_selector(selector);
        let result = Self::load_source(&source);

        match (&result, &source) {
            (Ok(table), DataSource::Sample) => {
                log::debug!("sample dataset shape {:?}", table.shape());
                println!("✅ Iris dataset loaded successfully from the built-in sample!");
            }
            (Ok(table), DataSource::File(path)) => {
                log::debug!("{} shape {:?}", path.display(), table.shape());
                println!("✅ Dataset loaded successfully from {}!", path.display());
            }
            (Err(err @ LoaderError::NotFound { .. }), _) => {
                log::debug!("load failed: {err:?}");
                println!("❌ Error: {err}");
            }
            (Err(err), _) => {
                log::debug!("load failed: {err:?}");
                println!("❌ Error loading dataset: {err}");
            }
        }

        result
    }

    /// Load without reporting.
    pub fn load_source(source: &DataSource) -> LoadResult {
        match source {
            DataSource::Sample => Ok(Table::new(sample::iris()?)),
            DataSource::File(path) => Self::load_csv(path).map(Table::new),
        }
    }

    /// Read a delimited text file. `.tsv` files are tab separated, everything else
    /// is comma separated. Empty fields and [`NULL_MARKERS`] become nulls, and
    /// column types are inferred from every row.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let separator = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };

        let markers = NULL_MARKERS.iter().map(|m| PlSmallStr::from(*m)).collect();

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(separator)
            .with_missing_is_null(true)
            .with_null_values(Some(NullValues::AllColumns(markers)))
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        if df.width() == 0 {
            return Err(LoaderError::Empty {
                path: path.to_path_buf(),
            });
        }

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ColumnKind;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_selector_resolution() {
        assert_eq!(DataSource::from_selector("iris"), DataSource::Sample);
        assert_eq!(DataSource::from_selector("  IRIS "), DataSource::Sample);
        assert_eq!(
            DataSource::from_selector("data/iris.csv"),
            DataSource::File(PathBuf::from("data/iris.csv"))
        );
    }

    #[test]
    fn test_sample_shape() {
        let table = DataLoader::load_source(&DataSource::Sample).unwrap();
        assert_eq!(table.shape(), (150, 5));
        assert_eq!(table.numeric_columns().len(), 4);
        assert_eq!(table.categorical_columns(), vec!["species"]);
        assert_eq!(table.total_missing().unwrap(), 0);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = DataLoader::load("definitely/not/here.csv");
        assert!(matches!(result, Err(LoaderError::NotFound { .. })));
    }

    #[test]
    fn test_csv_kind_inference_and_nulls() {
        let file = write_temp(
            ".csv",
            "score,weight,team\n1.5,10,red\n,12,blue\n3.0,,red\n4.5,14,\n",
        );
        let table = DataLoader::load(file.path().to_str().unwrap()).unwrap();

        let kinds: Vec<ColumnKind> = table.columns().into_iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ColumnKind::Numeric, ColumnKind::Numeric, ColumnKind::Categorical]
        );
        assert_eq!(table.height(), 4);
        assert_eq!(table.total_missing().unwrap(), 3);
    }

    #[test]
    fn test_null_markers_are_missing() {
        let file = write_temp(".csv", "x,label\n1.0,a\nNA,b\n4.0,n/a\nnull,c\n");
        let table = DataLoader::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(table.numeric_columns(), vec!["x"]);
        assert_eq!(
            table.missing_counts().unwrap(),
            vec![("x".to_string(), 2), ("label".to_string(), 1)]
        );
        assert_eq!(table.present_values("x").unwrap(), vec![1.0, 4.0]);
    }

    #[test]
    fn test_late_text_value_makes_column_categorical() {
        let mut contents = String::from("code,value\n");
        for i in 0..10_050 {
            contents.push_str(&format!("{i},{}.5\n", i % 7));
        }
        contents.push_str("X-17,1.0\n");
        let file = write_temp(".csv", &contents);

        let table = DataLoader::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.height(), 10_051);
        assert_eq!(table.categorical_columns(), vec!["code"]);
        assert_eq!(table.numeric_columns(), vec!["value"]);
    }

    #[test]
    fn test_tsv_uses_tab_separator() {
        let file = write_temp(".tsv", "x\ty\n1\t2\n3\t4\n");
        let table = DataLoader::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.column_names(), vec!["x", "y"]);
        assert_eq!(table.present_values("y").unwrap(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_ragged_rows_fail_to_load() {
        let file = write_temp(".csv", "a,b\n1,2\n3,4,5,6\n");
        let result = DataLoader::load(file.path().to_str().unwrap());
        assert!(matches!(result, Err(LoaderError::CsvError(_))));
    }
}
