use crate::chart::palette::color_for_index;
use crate::data::dataset::{Dataset, ID_FIELD, TIMESTAMP_FIELD, TREND_SUFFIX};

/// A column that gets its own chart card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotColumn {
    /// Field name in the row records.
    pub key: String,
    pub title: String,
    /// Identifier of the card the chart is mounted in.
    pub container_id: String,
    pub color: [u8; 3],
}

/// Whether a field is charted: everything but the timestamp, the
/// identifier and trend companions.
pub fn is_plottable(key: &str) -> bool {
    key != TIMESTAMP_FIELD && key != ID_FIELD && !key.ends_with(TREND_SUFFIX)
}

/// Lower-case `key` and turn every whitespace character into `-`.
pub fn container_id_for(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Plot columns of `dataset`, in the field order of its first row.
pub fn infer_plot_columns(dataset: &Dataset) -> Vec<PlotColumn> {
    let Some(first) = dataset.first() else {
        return Vec::new();
    };

    first
        .keys()
        .filter(|key| is_plottable(key))
        .enumerate()
        .map(|(index, key)| PlotColumn {
            key: key.to_string(),
            title: key.to_string(),
            container_id: container_id_for(key),
            color: color_for_index(index),
        })
        .collect()
}
