use egui_extras::{Column, TableBuilder};

use crate::chart::series::ChartSeries;
use crate::dashboard::{Command, DetailModal};
use crate::ui::chart_view::show_chart;
use crate::ui::filter_panel::toggle_btn;

fn reading_cell(ui: &mut egui::Ui, value: Option<f64>) {
    match value {
        Some(v) => ui.label(format!("{v:.3}")),
        None => ui.label("-"),
    };
}

/// Newest-first table of the series behind the chart.
fn show_table(ui: &mut egui::Ui, series: &ChartSeries) {
    let row_count = series.len();
    let trend_header = series.trend_name();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(170.0))
        .columns(Column::auto().at_least(100.0), 2)
        .min_scrolled_height(300.0)
        .max_scroll_height(300.0)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Timestamp");
            });
            header.col(|ui| {
                ui.strong(&series.key);
            });
            header.col(|ui| {
                ui.strong(&trend_header);
            });
        })
        .body(|body| {
            body.rows(18.0, row_count, |mut row| {
                let index = row_count - 1 - row.index();
                row.col(|ui| {
                    ui.label(&series.labels[index]);
                });
                row.col(|ui| reading_cell(ui, series.values[index]));
                row.col(|ui| reading_cell(ui, series.trend[index]));
            });
        });
}

/// The detail view over the grid. Returns `CloseModal` on the close button,
/// Escape or a click on the backdrop.
pub fn show_detail_modal(ctx: &egui::Context, modal: &mut DetailModal) -> Option<Command> {
    let mut close = false;
    let width = (ctx.screen_rect().width() * 0.8).max(600.0);

    let response = egui::Modal::new(egui::Id::new("detail_modal")).show(ctx, |ui| {
        ui.set_width(width);

        ui.horizontal(|ui| {
            ui.heading(&modal.title);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    close = true;
                }
                let label = if modal.show_table { "Chart View" } else { "Table View" };
                if toggle_btn(ui, label, modal.show_table)
                    .on_hover_text("Toggle between chart and data table")
                    .clicked()
                {
                    modal.show_table = !modal.show_table;
                }
            });
        });
        ui.separator();

        if modal.show_table {
            show_table(ui, modal.chart.series());
        } else {
            show_chart(ui, &modal.chart);
        }

        ui.add_space(6.0);
        match &modal.stats {
            Some(stats) => ui.label(egui::RichText::new(stats.summary()).monospace()),
            None => ui.label(egui::RichText::new("No numeric values.").weak()),
        };
    });

    if close || response.should_close() {
        Some(Command::CloseModal)
    } else {
        None
    }
}
