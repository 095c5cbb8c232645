//! Statistics Calculator Module
//! Descriptive statistics, group means and histogram binning over plain slices.

use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Summary of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Means of every numeric column within one category label.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMeans {
    pub label: String,
    pub count: usize,
    /// Aligned with `GroupSummary::columns`.
    pub means: Vec<f64>,
}

/// Per-category means of the numeric columns. Groups are sorted by label.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub category: String,
    pub columns: Vec<String>,
    pub groups: Vec<GroupMeans>,
}

impl GroupSummary {
    pub fn labels(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.label.as_str()).collect()
    }

    /// Group means of one numeric column, in group order.
    pub fn column_means(&self, column: usize) -> Vec<f64> {
        self.groups.iter().map(|g| g.means[column]).collect()
    }

    /// Sample standard deviation of the group means, per numeric column.
    pub fn spread(&self) -> Vec<f64> {
        (0..self.columns.len())
            .map(|i| StatsCalculator::std_dev(&self.column_means(i)))
            .collect()
    }

    /// Numeric column whose group means are spread the widest.
    pub fn most_variation(&self) -> Option<&str> {
        StatsCalculator::argmax(&self.spread()).map(|i| self.columns[i].as_str())
    }
}

/// One histogram bar: `[start, end)`, the last bin also holds `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn mean(values: &[f64]) -> f64 {
        values.iter().mean()
    }

    /// Sample (n - 1) standard deviation; NaN below two values.
    pub fn std_dev(values: &[f64]) -> f64 {
        values.iter().std_dev()
    }

    /// Compute descriptive statistics for an array of values.
    pub fn describe(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        DescriptiveStats {
            count: n,
            mean: Self::mean(values),
            std: Self::std_dev(values),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Group rows by `labels` and average each numeric column inside every group.
    ///
    /// `columns` holds row-aligned values; missing values are skipped per column
    /// and rows without a label are left out.
    pub fn group_means(
        category: &str,
        labels: &[Option<String>],
        columns: &[(String, Vec<Option<f64>>)],
    ) -> GroupSummary {
        let mut buckets: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (row, label) in labels.iter().enumerate() {
            if let Some(label) = label {
                buckets.entry(label.as_str()).or_default().push(row);
            }
        }

        let groups = buckets
            .into_iter()
            .map(|(label, rows)| {
                let means = columns
                    .iter()
                    .map(|(_, values)| {
                        let present: Vec<f64> = rows
                            .iter()
                            .filter_map(|&row| values.get(row).copied().flatten())
                            .collect();
                        Self::mean(&present)
                    })
                    .collect();
                GroupMeans {
                    label: label.to_string(),
                    count: rows.len(),
                    means,
                }
            })
            .collect();

        GroupSummary {
            category: category.to_string(),
            columns: columns.iter().map(|(name, _)| name.clone()).collect(),
            groups,
        }
    }

    /// Equal-width histogram over `[min, max]`. A constant input is binned over
    /// `[v - 0.5, v + 0.5]`.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: lo + i as f64 * width,
                end: if i + 1 == bins { hi } else { lo + (i + 1) as f64 * width },
                count,
            })
            .collect()
    }

    /// Index of the largest value, first one on ties. NaN never wins.
    pub fn argmax(values: &[f64]) -> Option<usize> {
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i)
    }
}
