use std::sync::Arc;

use crate::data::dataset::{trend_key, Dataset};

/// Relative margin added around the observed value range.
pub const Y_MARGIN: f64 = 0.02;

/// The two series of one chart, already in display order (oldest first).
/// Point `i` sits at x = `i`; its label is `labels[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub key: String,
    pub labels: Arc<[String]>,
    pub values: Vec<Option<f64>>,
    pub trend: Vec<Option<f64>>,
    /// Suggested y range, `None` when the raw series has no numbers.
    pub y_bounds: Option<(f64, f64)>,
}

impl ChartSeries {
    pub fn build(dataset: &Dataset, key: &str) -> Self {
        let trend_key = trend_key(key);
        let labels: Arc<[String]> = dataset.oldest_first().map(|row| row.timestamp_label()).collect();
        let values: Vec<Option<f64>> = dataset.oldest_first().map(|row| row.number(key)).collect();
        let trend = dataset.oldest_first().map(|row| row.number(&trend_key)).collect();
        let y_bounds = suggested_bounds(&values);

        Self {
            key: key.to_string(),
            labels,
            values,
            trend,
            y_bounds,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn trend_name(&self) -> String {
        format!("Trend {}", self.key)
    }

    pub fn value_points(&self) -> Vec<[f64; 2]> {
        to_points(&self.values)
    }

    /// Empty when the dataset has no `<key>_trend` numbers.
    pub fn trend_points(&self) -> Vec<[f64; 2]> {
        to_points(&self.trend)
    }
}

fn to_points(values: &[Option<f64>]) -> Vec<[f64; 2]> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|y| [i as f64, y]))
        .collect()
}

/// Observed min/max widened by `Y_MARGIN` of each bound's magnitude.
/// Never clamped to zero.
pub fn suggested_bounds(values: &[Option<f64>]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.iter().flatten() {
        min = min.min(*v);
        max = max.max(*v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min - min.abs() * Y_MARGIN, max + max.abs() * Y_MARGIN))
    } else {
        None
    }
}

/// Label of the category nearest to `x`.
pub fn label_at(labels: &[String], x: f64) -> Option<&str> {
    let rounded = x.round();
    if rounded < 0.0 || (rounded - x).abs() > 1e-6 {
        return None;
    }
    labels.get(rounded as usize).map(String::as_str)
}

/// Category indices that get an x tick, at most `max_ticks` of them,
/// evenly skipped.
pub fn tick_indices(count: usize, max_ticks: usize) -> Vec<usize> {
    if count == 0 || max_ticks == 0 {
        return Vec::new();
    }
    let step = count.div_ceil(max_ticks).max(1);
    (0..count).step_by(step).collect()
}

/// Tooltip line for one series at one point.
pub fn format_reading(name: &str, value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{name}: {v:.3}"),
        None => format!("{name}: N/A"),
    }
}
