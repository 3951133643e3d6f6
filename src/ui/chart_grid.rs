use crate::chart::palette;
use crate::chart::registry::ChartInstance;
use crate::dashboard::{ChartArea, Command, Dashboard, ERROR_MESSAGE, LOADING_MESSAGE, NO_DATA_MESSAGE};
use crate::state::theme::Theme;
use crate::ui::chart_view::show_chart;

/// Cards per row once the panel is at least this wide.
const TWO_COLUMN_MIN_WIDTH: f32 = 1000.0;

fn centered_notice(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.add_space(80.0);
    ui.vertical_centered(add_contents);
}

/// One chart card. Returns true when the card was clicked.
fn chart_card(ui: &mut egui::Ui, chart: &ChartInstance, theme: &Theme) -> bool {
    let mut plot_clicked = false;

    let frame = egui::Frame::group(ui.style())
        .fill(theme.card_fill())
        .inner_margin(egui::Margin::same(10))
        .corner_radius(egui::CornerRadius::same(8))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                ui.painter()
                    .circle_filled(dot.center(), 5.0, palette::color32(chart.column().color));
                ui.heading(&chart.column().title);
            });
            ui.add_space(4.0);
            plot_clicked = show_chart(ui, chart).clicked();
        });

    let card = frame
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .on_hover_text("Open detail view");
    card.clicked() || plot_clicked
}

/// The chart area: a status notice, or one card per plotted column.
pub fn show_chart_grid(ui: &mut egui::Ui, dashboard: &Dashboard, theme: &Theme) -> Option<Command> {
    match dashboard.area() {
        ChartArea::Idle => {
            centered_notice(ui, |ui| {
                ui.label(egui::RichText::new("Select a time range to load data.").weak());
            });
            None
        }
        ChartArea::Loading => {
            centered_notice(ui, |ui| {
                ui.spinner();
                ui.add_space(8.0);
                ui.label(LOADING_MESSAGE);
            });
            None
        }
        ChartArea::Error { detail } => {
            centered_notice(ui, |ui| {
                ui.colored_label(theme.error_text(), ERROR_MESSAGE);
                ui.add_space(4.0);
                ui.label(egui::RichText::new(detail).small().weak());
            });
            None
        }
        ChartArea::NoData => {
            centered_notice(ui, |ui| {
                ui.label(NO_DATA_MESSAGE);
            });
            None
        }
        ChartArea::Charts => show_cards(ui, dashboard, theme),
    }
}

fn show_cards(ui: &mut egui::Ui, dashboard: &Dashboard, theme: &Theme) -> Option<Command> {
    let mut command = None;
    let per_row = if ui.available_width() >= TWO_COLUMN_MIN_WIDTH { 2 } else { 1 };
    let charts: Vec<&ChartInstance> = dashboard.charts().iter().collect();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for row in charts.chunks(per_row) {
            ui.columns(per_row, |columns| {
                for (column_ui, chart) in columns.iter_mut().zip(row) {
                    column_ui.push_id(chart.container_id(), |ui| {
                        if chart_card(ui, chart, theme) {
                            command = Some(Command::OpenModal(chart.container_id().to_string()));
                        }
                    });
                }
            });
            ui.add_space(10.0);
        }
    });

    command
}
