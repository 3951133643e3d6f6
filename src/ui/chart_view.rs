use std::sync::Arc;

use egui_plot::{Corner, GridInput, GridMark, Legend, Line, LineStyle, Plot, PlotPoints, Points};

use crate::chart::palette;
use crate::chart::registry::ChartInstance;
use crate::chart::series::{format_reading, label_at, tick_indices};

/// Category ticks for `count` points, at most `max_ticks` across the data.
fn category_spacer(count: usize, max_ticks: usize) -> impl Fn(GridInput) -> Vec<GridMark> {
    let ticks = tick_indices(count, max_ticks);
    let step = ticks.get(1).map_or(1.0, |second| *second as f64);
    move |input: GridInput| {
        let (lo, hi) = input.bounds;
        ticks
            .iter()
            .map(|&i| i as f64)
            .filter(|x| *x >= lo && *x <= hi)
            .map(|value| GridMark {
                value,
                step_size: step,
            })
            .collect()
    }
}

/// Draw a chart instance. The returned response is the plot's.
pub fn show_chart(ui: &mut egui::Ui, chart: &ChartInstance) -> egui::Response {
    let style = *chart.style();
    let series = chart.series();
    let color = palette::color32(chart.column().color);
    let value_name = series.key.clone();
    let trend_name = series.trend_name();

    let axis_labels = Arc::clone(&series.labels);
    let tooltip_labels = Arc::clone(&series.labels);
    let values = series.values.clone();
    let trend = series.trend.clone();
    let tooltip_value_name = value_name.clone();
    let tooltip_trend_name = trend_name.clone();

    let mut plot = Plot::new(("trendboard-chart", chart.id()))
        .height(style.height)
        .allow_zoom(style.interactive)
        .allow_drag(style.interactive)
        .allow_scroll(style.interactive)
        .allow_boxed_zoom(style.interactive)
        .allow_double_click_reset(style.interactive)
        .show_grid([false, true])
        .x_grid_spacer(category_spacer(series.len(), style.max_x_ticks))
        .x_axis_formatter(move |mark, _range| {
            label_at(&axis_labels, mark.value).unwrap_or_default().to_string()
        })
        .label_formatter(move |_name, point| {
            let Some(label) = label_at(&tooltip_labels, point.x.round()) else {
                return String::new();
            };
            let index = point.x.round() as usize;
            format!(
                "{label}\n{}\n{}",
                format_reading(&tooltip_value_name, values.get(index).copied().flatten()),
                format_reading(&tooltip_trend_name, trend.get(index).copied().flatten()),
            )
        });

    if let Some((lo, hi)) = series.y_bounds {
        plot = plot.include_y(lo).include_y(hi);
    }
    if !series.labels.is_empty() {
        plot = plot.include_x(-0.5).include_x(series.len() as f64 - 0.5);
    }
    if style.show_legend {
        plot = plot.legend(Legend::default().position(Corner::LeftTop));
    }

    let fill_base = series.y_bounds.map(|(lo, _)| lo as f32);
    let value_points = series.value_points();
    let trend_points = series.trend_points();

    plot.show(ui, |plot_ui| {
        let mut line = Line::new(value_name.clone(), PlotPoints::from(value_points.clone()))
            .color(color)
            .width(style.line_width);
        if let Some(base) = fill_base {
            line = line.fill(base);
        }
        plot_ui.line(line);

        if style.point_radius > 0.0 {
            plot_ui.points(
                Points::new(value_name.clone(), PlotPoints::from(value_points))
                    .color(color)
                    .radius(style.point_radius),
            );
        }

        if !trend_points.is_empty() {
            plot_ui.line(
                Line::new(trend_name.clone(), PlotPoints::from(trend_points))
                    .color(color)
                    .width(style.trend_width)
                    .style(LineStyle::Dashed {
                        length: style.trend_dash,
                    }),
            );
        }
    })
    .response
}
