use std::sync::atomic::{AtomicU64, Ordering};

use crate::chart::schema::PlotColumn;
use crate::chart::series::ChartSeries;
use crate::chart::style::ChartStyle;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

fn next_instance_id() -> u64 {
    NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)
}

/// A live chart bound to one container and one series pair.
///
/// The instance id salts the plot widget id, so the pan/zoom memory of a
/// dropped instance is never picked up by its replacement.
#[derive(Debug)]
pub struct ChartInstance {
    id: u64,
    column: PlotColumn,
    series: ChartSeries,
    style: ChartStyle,
}

impl ChartInstance {
    pub fn new(column: PlotColumn, series: ChartSeries, style: ChartStyle) -> Self {
        let id = next_instance_id();
        tracing::debug!(id, container = %column.container_id, points = series.len(), "chart created");
        Self {
            id,
            column,
            series,
            style,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn container_id(&self) -> &str {
        &self.column.container_id
    }

    /// Metadata recorded on the card: key, title and colour.
    pub fn column(&self) -> &PlotColumn {
        &self.column
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        tracing::debug!(id = self.id, container = %self.column.container_id, "chart destroyed");
    }
}

/// The grid's charts, keyed by container id, in mount order.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    instances: Vec<ChartInstance>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chart in `column.container_id`. Any chart already bound to
    /// that id is destroyed first and the new one takes its slot.
    pub fn mount(&mut self, column: PlotColumn, series: ChartSeries, style: ChartStyle) -> &ChartInstance {
        let slot = self
            .instances
            .iter()
            .position(|c| c.container_id() == column.container_id);

        let index = match slot {
            Some(index) => {
                drop(self.instances.remove(index));
                self.instances.insert(index, ChartInstance::new(column, series, style));
                index
            }
            None => {
                self.instances.push(ChartInstance::new(column, series, style));
                self.instances.len() - 1
            }
        };
        &self.instances[index]
    }

    /// Destroy every chart.
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn get(&self, container_id: &str) -> Option<&ChartInstance> {
        self.instances.iter().find(|c| c.container_id() == container_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartInstance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
