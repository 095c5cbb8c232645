//! Static Chart Renderer
//! Draws the 2x2 analysis grid with plotters and writes it as one PNG.
//!
//! Layout:
//! 1. Top left: trend of the first numeric column over the row index
//! 2. Top right: mean of the first numeric column per category
//! 3. Bottom left: histogram of the first numeric column
//! 4. Bottom right: scatter of the first two numeric columns, colored by category
//!
//! Every panel checks its own column requirements, so a table that lacks a
//! column kind still produces the panels it can.

use super::palette::{self, SKY_BLUE, TREND_BLUE};
use crate::config::ChartConfig;
use crate::data::{Table, TableError};
use crate::error::Skipped;
use crate::stats::{HistogramBin, StatsCalculator};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::fmt;
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

const SUPTITLE: &str = "Comprehensive Data Analysis Visualizations";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Unsupported image size {0}x{1} pixels")]
    Buffer(u32, u32),
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Table error: {0}")]
    TableError(#[from] TableError),
}

impl RenderError {
    fn draw<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(err.to_string())
    }
}

/// One cell of the output grid, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Trend,
    GroupedBar,
    Histogram,
    Scatter,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::Trend,
        Panel::GroupedBar,
        Panel::Histogram,
        Panel::Scatter,
    ];

    fn requirement(self, rows: usize, numeric: usize, categorical: usize) -> Result<(), Skipped> {
        if rows == 0 {
            return Err(Skipped::EmptyTable);
        }
        let needed = match self {
            Panel::Trend | Panel::Histogram => 1,
            Panel::GroupedBar => {
                if categorical == 0 {
                    return Err(Skipped::NoCategoricalColumn);
                }
                1
            }
            Panel::Scatter => 2,
        };
        if numeric < needed {
            return Err(Skipped::NotEnoughNumeric {
                needed,
                found: numeric,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Panel::Trend => "line chart",
            Panel::GroupedBar => "bar chart",
            Panel::Histogram => "histogram",
            Panel::Scatter => "scatter plot",
        };
        write!(f, "{name}")
    }
}

/// What a render call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub path: PathBuf,
    pub size: (u32, u32),
    pub panels: Vec<Panel>,
    pub displayed: bool,
}

/// Renders the analysis grid to a PNG file.
pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Whether `panel` can be drawn from `table`.
    pub fn check(panel: Panel, table: &Table) -> Result<(), Skipped> {
        panel.requirement(
            table.height(),
            table.numeric_columns().len(),
            table.categorical_columns().len(),
        )
    }

    /// Panels that will be drawn for `table`.
    pub fn plan(table: &Table) -> Vec<Panel> {
        Panel::ALL
            .into_iter()
            .filter(|panel| Self::check(*panel, table).is_ok())
            .collect()
    }

    /// Font size in pixels for a size in points.
    fn pt(&self, points: f64) -> f64 {
        points * f64::from(self.config.dpi) / 72.0
    }

    /// Pixel length that measures `base` at 100 DPI.
    fn px(&self, base: f64) -> u32 {
        (base * f64::from(self.config.dpi) / 100.0).round().max(1.0) as u32
    }

    /// Category names under the bars are slanted so long labels do not collide.
    fn category_tick_style(&self) -> TextStyle<'static> {
        ("sans-serif", self.pt(9.0))
            .into_font()
            .transform(FontTransform::Rotate45)
            .into()
    }

    /// Draw every panel the table supports, write the PNG (replacing any
    /// previous file) and ask the system viewer to show it.
    pub fn render(&self, table: &Table) -> Result<RenderOutcome, RenderError> {
        let (width, height) = self.config.pixel_size();
        if !self.config.fits() {
            return Err(RenderError::Buffer(width, height));
        }
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        let panels = {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(RenderError::draw)?;
            let body = root
                .titled(SUPTITLE, ("sans-serif", self.pt(16.0), FontStyle::Bold))
                .map_err(RenderError::draw)?;
            let panels = self.draw_grid(&body, table)?;
            root.present().map_err(RenderError::draw)?;
            panels
        };

        let image =
            RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        image.save_with_format(&self.config.output_path, ImageFormat::Png)?;
        log::info!(
            "wrote {}x{} chart grid to {}",
            width,
            height,
            self.config.output_path.display()
        );

        let displayed = self.config.show && self.show();

        Ok(RenderOutcome {
            path: self.config.output_path.clone(),
            size: (width, height),
            panels,
            displayed,
        })
    }

    fn draw_grid<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        table: &Table,
    ) -> Result<Vec<Panel>, RenderError> {
        let cells = area.split_evenly((2, 2));
        let numeric = table.numeric_columns();
        let category = table.categorical_columns().into_iter().next();

        let mut drawn = Vec::new();
        for (panel, cell) in Panel::ALL.into_iter().zip(cells.iter()) {
            if let Err(skip) = Self::check(panel, table) {
                log::info!("{panel} skipped: {skip}");
                continue;
            }

            match (panel, category.as_deref()) {
                (Panel::Trend, _) => self.draw_trend(cell, table, &numeric[0])?,
                (Panel::GroupedBar, Some(category)) => {
                    self.draw_group_bars(cell, table, &numeric[0], category)?
                }
                (Panel::GroupedBar, None) => continue,
                (Panel::Histogram, _) => self.draw_histogram(cell, table, &numeric[0])?,
                (Panel::Scatter, category) => {
                    self.draw_scatter(cell, table, &numeric[0], &numeric[1], category)?
                }
            }
            drawn.push(panel);
        }
        Ok(drawn)
    }

    fn chart_builder<'a, 'b, DB: DrawingBackend>(
        &self,
        area: &'a DrawingArea<DB, Shift>,
        caption: &str,
    ) -> ChartBuilder<'a, 'b, DB> {
        let mut builder = ChartBuilder::on(area);
        builder
            .caption(caption, ("sans-serif", self.pt(12.0), FontStyle::Bold))
            .margin(self.px(15.0))
            .x_label_area_size(self.px(45.0))
            .y_label_area_size(self.px(65.0));
        builder
    }

    fn draw_trend<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        table: &Table,
        column: &str,
    ) -> Result<(), RenderError> {
        let points: Vec<(f64, f64)> = table
            .numeric_values(column)?
            .into_iter()
            .enumerate()
            .filter_map(|(row, v)| v.map(|v| (row as f64, v)))
            .collect();
        let last_row = table.height().max(2) - 1;

        let mut chart = self
            .chart_builder(area, &format!("Line Chart: {column} Trend"))
            .build_cartesian_2d(0f64..last_row as f64, padded_range(points.iter().map(|p| p.1)))
            .map_err(RenderError::draw)?;

        chart
            .configure_mesh()
            .x_desc("Sample Index")
            .y_desc(column)
            .label_style(("sans-serif", self.pt(9.0)))
            .axis_desc_style(("sans-serif", self.pt(10.0)))
            .bold_line_style(BLACK.mix(0.15).stroke_width(1))
            .light_line_style(BLACK.mix(0.05).stroke_width(1))
            .draw()
            .map_err(RenderError::draw)?;

        let line_style = TREND_BLUE.mix(0.7).stroke_width(self.px(2.0));
        let legend_len = self.px(20.0) as i32;
        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))
            .map_err(RenderError::draw)?
            .label(column)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], line_style));

        let marker = self.px(4.0);
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, marker, TREND_BLUE.mix(0.7).filled())),
            )
            .map_err(RenderError::draw)?;

        chart
            .configure_series_labels()
            .label_font(("sans-serif", self.pt(9.0)))
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.stroke_width(1))
            .draw()
            .map_err(RenderError::draw)?;
        Ok(())
    }

    fn draw_group_bars<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        table: &Table,
        column: &str,
        category: &str,
    ) -> Result<(), RenderError> {
        let values = vec![(column.to_string(), table.numeric_values(column)?)];
        let summary = StatsCalculator::group_means(category, &table.label_values(category)?, &values);
        let names: Vec<String> = summary.groups.iter().map(|g| g.label.clone()).collect();
        let means = summary.column_means(0);

        let finite = means.iter().copied().filter(|m| m.is_finite());
        let top = finite.clone().fold(0.0, f64::max);
        let bottom = finite.fold(0.0, f64::min);
        let y_range = if top > bottom {
            (bottom * 1.15)..(top * 1.15)
        } else {
            0.0..1.0
        };
        let x_range = -0.5..(names.len().max(1) as f64 - 0.5);

        let mut chart = self
            .chart_builder(area, &format!("Bar Chart: Average {column} by {category}"))
            .build_cartesian_2d(x_range, y_range)
            .map_err(RenderError::draw)?;

        let tick_label = |x: &f64| {
            let nearest = x.round();
            if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
                return String::new();
            }
            names.get(nearest as usize).cloned().unwrap_or_default()
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(names.len() + 1)
            .x_label_formatter(&tick_label)
            .x_desc(category)
            .y_desc(format!("Average {column}"))
            .label_style(("sans-serif", self.pt(9.0)))
            .x_label_style(self.category_tick_style())
            .axis_desc_style(("sans-serif", self.pt(10.0)))
            .light_line_style(BLACK.mix(0.05).stroke_width(1))
            .draw()
            .map_err(RenderError::draw)?;

        let colors = palette::hue_palette(names.len());
        let bar = |i: usize, mean: f64| [(i as f64 - 0.4, 0.0), (i as f64 + 0.4, mean)];
        let bars: Vec<(usize, f64)> = means
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, m)| m.is_finite())
            .collect();

        chart
            .draw_series(
                bars.iter()
                    .map(|&(i, m)| Rectangle::new(bar(i, m), colors[i].mix(0.8).filled())),
            )
            .map_err(RenderError::draw)?;
        chart
            .draw_series(
                bars.iter()
                    .map(|&(i, m)| Rectangle::new(bar(i, m), BLACK.stroke_width(1))),
            )
            .map_err(RenderError::draw)?;

        let value_style = TextStyle::from(("sans-serif", self.pt(9.0)).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(bars.iter().map(|&(i, m)| {
                Text::new(format!("{m:.2}"), (i as f64, m), value_style.clone())
            }))
            .map_err(RenderError::draw)?;
        Ok(())
    }

    fn draw_histogram<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        table: &Table,
        column: &str,
    ) -> Result<(), RenderError> {
        let values = table.present_values(column)?;
        let bins = StatsCalculator::histogram(&values, self.config.histogram_bins);
        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            log::info!("histogram of '{column}' has no values to bin");
            return Ok(());
        };
        let top = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

        let mut chart = self
            .chart_builder(area, &format!("Histogram: Distribution of {column}"))
            .build_cartesian_2d(first.start..last.end, 0f64..top)
            .map_err(RenderError::draw)?;

        chart
            .configure_mesh()
            .x_desc(column)
            .y_desc("Frequency")
            .label_style(("sans-serif", self.pt(9.0)))
            .axis_desc_style(("sans-serif", self.pt(10.0)))
            .bold_line_style(BLACK.mix(0.15).stroke_width(1))
            .light_line_style(BLACK.mix(0.05).stroke_width(1))
            .draw()
            .map_err(RenderError::draw)?;

        let rect = |b: &HistogramBin| [(b.start, 0.0), (b.end, b.count as f64)];
        chart
            .draw_series(
                bins.iter()
                    .map(|b| Rectangle::new(rect(b), SKY_BLUE.mix(0.7).filled())),
            )
            .map_err(RenderError::draw)?;
        chart
            .draw_series(bins.iter().map(|b| Rectangle::new(rect(b), BLACK.stroke_width(1))))
            .map_err(RenderError::draw)?;
        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        table: &Table,
        x_column: &str,
        y_column: &str,
        category: Option<&str>,
    ) -> Result<(), RenderError> {
        let xs = table.numeric_values(x_column)?;
        let ys = table.numeric_values(y_column)?;
        let labels = match category {
            Some(category) => table.label_values(category)?,
            None => vec![None; table.height()],
        };

        // (x, y, label) for rows where both coordinates are present
        let points: Vec<(f64, f64, Option<&str>)> = xs
            .iter()
            .zip(&ys)
            .zip(&labels)
            .filter_map(|((x, y), label)| Some(((*x)?, (*y)?, label.as_deref())))
            .collect();

        let mut chart = self
            .chart_builder(area, &format!("Scatter Plot: {x_column} vs {y_column}"))
            .build_cartesian_2d(
                padded_range(points.iter().map(|p| p.0)),
                padded_range(points.iter().map(|p| p.1)),
            )
            .map_err(RenderError::draw)?;

        chart
            .configure_mesh()
            .x_desc(x_column)
            .y_desc(y_column)
            .label_style(("sans-serif", self.pt(9.0)))
            .axis_desc_style(("sans-serif", self.pt(10.0)))
            .light_line_style(BLACK.mix(0.05).stroke_width(1))
            .draw()
            .map_err(RenderError::draw)?;

        let radius = self.px(5.0);
        let Some(category) = category else {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y, _)| Circle::new((x, y), radius, TREND_BLUE.mix(0.7).filled())),
                )
                .map_err(RenderError::draw)?;
            return Ok(());
        };

        // Color codes follow first appearance of each label.
        let mut order: Vec<&str> = Vec::new();
        for label in points.iter().filter_map(|p| p.2) {
            if !order.contains(&label) {
                order.push(label);
            }
        }
        let colors = palette::category_colors(order.len());

        for (label, color) in order.iter().zip(colors) {
            let style = color.mix(0.7).filled();
            chart
                .draw_series(
                    points
                        .iter()
                        .filter(|p| p.2 == Some(*label))
                        .map(|&(x, y, _)| Circle::new((x, y), radius, style)),
                )
                .map_err(RenderError::draw)?
                .label(format!("{category}: {label}"))
                .legend(move |(x, y)| Circle::new((x, y), radius, style));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(("sans-serif", self.pt(9.0)))
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.stroke_width(1))
            .draw()
            .map_err(RenderError::draw)?;
        Ok(())
    }

    /// Ask the desktop to open the written image. Headless sessions skip it.
    fn show(&self) -> bool {
        if !display_available() {
            log::debug!("no display available, not opening the chart");
            return false;
        }
        match open::that(&self.config.output_path) {
            Ok(()) => true,
            Err(err) => {
                log::warn!(
                    "could not open {}: {err}",
                    self.config.output_path.display()
                );
                false
            }
        }
    }
}

fn display_available() -> bool {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        return true;
    }
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

/// Axis range around the data with 5% padding on each side.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    (lo - pad)..(hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataFrame};

    fn table(columns: Vec<Column>) -> Table {
        Table::new(DataFrame::new(columns).unwrap())
    }

    #[test]
    fn test_plan_single_numeric_column() {
        let t = table(vec![Column::new("x".into(), vec![1.0, 2.0, 3.0])]);
        assert_eq!(ChartRenderer::plan(&t), vec![Panel::Trend, Panel::Histogram]);
        assert_eq!(
            ChartRenderer::check(Panel::GroupedBar, &t),
            Err(Skipped::NoCategoricalColumn)
        );
        assert_eq!(
            ChartRenderer::check(Panel::Scatter, &t),
            Err(Skipped::NotEnoughNumeric { needed: 2, found: 1 })
        );
    }

    #[test]
    fn test_plan_full_table() {
        let t = table(vec![
            Column::new("x".into(), vec![1.0, 2.0]),
            Column::new("y".into(), vec![3.0, 4.0]),
            Column::new("g".into(), vec!["a", "b"]),
        ]);
        assert_eq!(ChartRenderer::plan(&t), Panel::ALL.to_vec());
    }

    #[test]
    fn test_plan_labels_only() {
        let t = table(vec![Column::new("g".into(), vec!["a", "b"])]);
        assert!(ChartRenderer::plan(&t).is_empty());
    }

    #[test]
    fn test_plan_empty_table() {
        let t = table(vec![Column::new("x".into(), Vec::<f64>::new())]);
        assert!(ChartRenderer::plan(&t).is_empty());
        assert_eq!(
            ChartRenderer::check(Panel::Trend, &t),
            Err(Skipped::EmptyTable)
        );
    }

    #[test]
    fn test_category_ticks_are_slanted() {
        let renderer = ChartRenderer::new(ChartConfig::default());
        let style = renderer.category_tick_style();
        assert!(matches!(style.font.get_transform(), FontTransform::Rotate45));
    }

    #[test]
    fn test_oversized_figure_is_refused() {
        let config = ChartConfig {
            width_inches: 1.0e6,
            show: false,
            ..ChartConfig::default()
        };
        let t = table(vec![Column::new("x".into(), vec![1.0, 2.0])]);
        let result = ChartRenderer::new(config).render(&t);
        assert!(matches!(result, Err(RenderError::Buffer(..))));
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range([0.0, 10.0].into_iter()), -0.5..10.5);
        assert_eq!(padded_range([2.0].into_iter()), 1.5..2.5);
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);
    }
}
