// Pipeline tests

use chartify_insight::charts::{ChartRenderer, Panel};
use chartify_insight::config::AnalysisConfig;
use chartify_insight::data::{DataLoader, Explorer, LoaderError, Table};
use chartify_insight::pipeline::{self, Stage};
use chartify_insight::stats::{analyze, StatsCalculator};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

fn small_config(output: &Path) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.chart.output_path = output.to_path_buf();
    config.chart.dpi = 30;
    config.chart.show = false;
    config
}

#[test]
fn test_builtin_dataset_shape() {
    let table = DataLoader::load("iris").unwrap();

    assert_eq!(table.height(), 150);
    assert_eq!(table.width(), 5);
    assert_eq!(table.numeric_columns().len(), 4);
    assert_eq!(table.categorical_columns(), vec!["species"]);
    assert_eq!(table.total_missing().unwrap(), 0);

    let mut per_label: BTreeMap<String, usize> = BTreeMap::new();
    for label in table.label_values("species").unwrap() {
        *per_label.entry(label.unwrap()).or_default() += 1;
    }
    assert_eq!(per_label.len(), 3);
    assert!(per_label.values().all(|&n| n == 50));
}

#[test]
fn test_builtin_sepal_length_statistics() {
    let table = DataLoader::load("iris").unwrap();
    let stats = StatsCalculator::describe(&table.present_values("sepal length (cm)").unwrap());

    assert_eq!(stats.count, 150);
    assert!((stats.mean - 5.8433).abs() < 1e-4);
    assert!((stats.std - 0.8281).abs() < 1e-4);
    assert!((stats.min - 4.3).abs() < 1e-12);
    assert!((stats.q25 - 5.1).abs() < 1e-9);
    assert!((stats.median - 5.8).abs() < 1e-9);
    assert!((stats.q75 - 6.4).abs() < 1e-9);
    assert!((stats.max - 7.9).abs() < 1e-12);
}

#[test]
fn test_petal_length_spreads_more_than_sepal_width() {
    let table = DataLoader::load("iris").unwrap();
    let report = analyze(&table).unwrap();
    let summary = report.grouping.as_ref().unwrap();

    let spread = summary.spread();
    let petal_length = summary.columns.iter().position(|c| c == "petal length (cm)").unwrap();
    let sepal_width = summary.columns.iter().position(|c| c == "sepal width (cm)").unwrap();
    assert!(spread[petal_length] > spread[sepal_width]);

    let winner = report.most_variation().unwrap();
    assert!(winner == "petal length (cm)" || winner == "petal width (cm)");
}

#[test]
fn test_missing_file_stops_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("charts.png");

    let result = DataLoader::load("no/such/dataset.csv");
    assert!(matches!(result, Err(LoaderError::NotFound { .. })));

    let summary = pipeline::run("no/such/dataset.csv", &small_config(&output));
    assert!(!summary.loaded);
    assert!(summary.completed.is_empty());
    assert!(summary.chart.is_none());
    assert!(!output.exists());
}

#[test]
fn test_malformed_file_stops_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("charts.png");
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "a,b").unwrap();
    writeln!(file, "1,2").unwrap();
    writeln!(file, "3,4,5,6").unwrap();
    file.flush().unwrap();
    let selector = file.path().to_str().unwrap();

    assert!(matches!(
        DataLoader::load(selector),
        Err(LoaderError::CsvError(_))
    ));

    let summary = pipeline::run(selector, &small_config(&output));
    assert!(!summary.loaded);
    assert!(summary.completed.is_empty());
    assert!(summary.chart.is_none());
    assert!(!output.exists());
}

#[test]
fn test_csv_with_gaps_is_cleaned() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "temp,humidity,city").unwrap();
    writeln!(file, "21.5,40,Oslo").unwrap();
    writeln!(file, ",42,Oslo").unwrap();
    writeln!(file, "25.0,55,Rome").unwrap();
    writeln!(file, "26.5,,Rome").unwrap();
    writeln!(file, "19.0,61,").unwrap();
    writeln!(file, "18.5,63,Bergen").unwrap();
    file.flush().unwrap();

    let table = DataLoader::load(file.path().to_str().unwrap()).unwrap();
    let before = table.height();
    let cleaned = Explorer::explore(table).unwrap();

    assert!(cleaned.height() <= before);
    assert_eq!(cleaned.height(), 3);
    for (_, missing) in cleaned.missing_counts().unwrap() {
        assert_eq!(missing, 0);
    }

    let again = Explorer::explore(cleaned.clone()).unwrap();
    assert_eq!(again.height(), cleaned.height());
    assert_eq!(again.column_names(), cleaned.column_names());

    let report = analyze(&cleaned).unwrap();
    assert_eq!(report.grouping.unwrap().labels(), vec!["Bergen", "Oslo", "Rome"]);
}

#[test]
fn test_single_numeric_column_renders_two_panels() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("single.png");
    let df = DataFrame::new(vec![Column::new(
        "reading".into(),
        vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0],
    )])
    .unwrap();
    let table = Table::new(df);

    assert_eq!(ChartRenderer::plan(&table), vec![Panel::Trend, Panel::Histogram]);

    let renderer = ChartRenderer::new(small_config(&output).chart);
    let outcome = renderer.render(&table).unwrap();
    assert_eq!(outcome.panels, vec![Panel::Trend, Panel::Histogram]);
    assert!(!outcome.displayed);
    assert!(output.exists());
}

#[test]
fn test_numeric_only_table_renders_plain_scatter() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("numeric.png");
    let df = DataFrame::new(vec![
        Column::new("width".into(), vec![1.0, 2.5, 3.0, 4.5, 5.0]),
        Column::new("height".into(), vec![2.0, 1.0, 4.0, 3.5, 6.0]),
    ])
    .unwrap();
    let table = Table::new(df);

    let renderer = ChartRenderer::new(small_config(&output).chart);
    let outcome = renderer.render(&table).unwrap();
    assert_eq!(
        outcome.panels,
        vec![Panel::Trend, Panel::Histogram, Panel::Scatter]
    );
    assert_eq!(image::image_dimensions(&output).unwrap(), outcome.size);
}

#[test]
fn test_negative_group_means_render() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("negative.png");
    let df = DataFrame::new(vec![
        Column::new("delta".into(), vec![-4.0, -2.5, -7.0, -1.0, -3.0, -6.5]),
        Column::new("drift".into(), vec![0.5, -0.5, 1.5, -1.5, 0.0, 2.0]),
        Column::new(
            "station".into(),
            vec![
                "Northern Observatory",
                "Southern Coastal Station",
                "Northern Observatory",
                "Southern Coastal Station",
                "Mountain Relay",
                "Mountain Relay",
            ],
        ),
    ])
    .unwrap();
    let table = Table::new(df);

    let report = analyze(&table).unwrap();
    let summary = report.grouping.as_ref().unwrap();
    assert!(summary.column_means(0).iter().all(|m| *m < 0.0));

    let renderer = ChartRenderer::new(small_config(&output).chart);
    let outcome = renderer.render(&table).unwrap();
    assert_eq!(outcome.panels, Panel::ALL.to_vec());
    assert!(output.exists());
}

#[test]
fn test_end_to_end_overwrites_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("data_visualizations.png");
    std::fs::write(&output, b"stale").unwrap();

    let config = small_config(&output);
    let summary = pipeline::run("iris", &config);

    assert!(summary.loaded);
    assert!(summary.is_complete());
    for stage in [Stage::Load, Stage::Explore, Stage::Analyze, Stage::Visualize] {
        assert!(summary.ran(stage));
    }

    let chart = summary.chart.unwrap();
    assert_eq!(chart.panels, Panel::ALL.to_vec());
    assert_eq!(chart.size, config.chart.pixel_size());

    let dimensions = image::image_dimensions(&output).unwrap();
    assert_eq!(dimensions, config.chart.pixel_size());

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}
