/// Summary of a chart's raw series, shown in the detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl SeriesStats {
    /// Compute statistics over the present values, ignoring gaps.
    pub fn compute(values: &[Option<f64>]) -> Option<Self> {
        let mut vals: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = vals.iter().sum::<f64>() / count as f64;

        vals.sort_by(|a, b| a.total_cmp(b));
        let median = if count % 2 == 0 {
            (vals[count / 2 - 1] + vals[count / 2]) / 2.0
        } else {
            vals[count / 2]
        };

        let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(SeriesStats {
            count,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }

    /// One-line summary for the modal footer.
    pub fn summary(&self) -> String {
        format!(
            "n = {}   min {:.3}   max {:.3}   mean {:.3}   median {:.3}   σ {:.3}",
            self.count, self.min, self.max, self.mean, self.median, self.std_dev
        )
    }
}
