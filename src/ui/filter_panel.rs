use crate::dashboard::{Command, Dashboard};
use crate::state::filter_state::{TimeRange, INTERVAL_PRESETS};
use crate::state::segments::NO_SEGMENTS_NOTICE;

/// Button with consistent min size, filled when `active`.
pub fn toggle_btn(ui: &mut egui::Ui, label: &str, active: bool) -> egui::Response {
    let btn = if active {
        egui::Button::new(egui::RichText::new(label).strong())
            .fill(ui.visuals().selection.bg_fill)
            .min_size(egui::vec2(0.0, 26.0))
    } else {
        egui::Button::new(label).min_size(egui::vec2(0.0, 26.0))
    };
    ui.add(btn)
}

fn apply_btn(ui: &mut egui::Ui) -> egui::Response {
    ui.add(egui::Button::new(egui::RichText::new("Apply").strong()).min_size(egui::vec2(80.0, 28.0)))
}

fn preset_label(secs: u32) -> String {
    match secs {
        0 => "Raw".to_string(),
        s if s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{s}s"),
    }
}

/// Filter controls: time range, interval form and splitting form.
///
/// The dashboard is only mutated through its edit buffers here; everything
/// else comes back as commands for the caller to dispatch.
pub fn show_filter_panel(ui: &mut egui::Ui, dashboard: &mut Dashboard) -> Vec<Command> {
    let mut commands = Vec::new();

    // --- Time range ---
    ui.strong("Time Range");
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        let current = dashboard.filters().time_range();
        for range in TimeRange::PRESETS {
            if toggle_btn(ui, range.label(), range == current).clicked() {
                commands.push(Command::SelectTimeRange(range));
            }
        }
    });

    ui.separator();

    // --- Interval ---
    ui.strong("Time Interval (seconds)");
    ui.horizontal(|ui| {
        let edit = ui.add(
            egui::TextEdit::singleline(dashboard.interval_input_mut())
                .desired_width(80.0)
                .hint_text("0-3600"),
        );
        if edit.lost_focus() {
            commands.push(Command::CommitInterval(dashboard.interval_input().to_string()));
        }
        ui.label(
            egui::RichText::new(format!("Current: {}", dashboard.interval_input())).weak(),
        );
    });
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        let current = dashboard.filters().interval_secs();
        for secs in INTERVAL_PRESETS {
            if toggle_btn(ui, &preset_label(secs), secs == current)
                .on_hover_text(format!("{secs} seconds"))
                .clicked()
            {
                commands.push(Command::IntervalPreset(secs));
            }
        }
    });
    if apply_btn(ui).clicked() {
        commands.push(Command::ApplyInterval);
    }

    ui.separator();

    // --- Splitting ---
    ui.strong("Number of Segments");
    ui.horizontal(|ui| {
        let edit = ui.add(
            egui::TextEdit::singleline(dashboard.segments_input_mut())
                .desired_width(80.0)
                .hint_text("1-100"),
        );
        if edit.lost_focus() {
            commands.push(Command::CommitSegmentCount(dashboard.segments_input().to_string()));
        }
        ui.label(
            egui::RichText::new(format!("Current: {}", dashboard.segments_input())).weak(),
        );
    });

    let buttons = dashboard.segments().buttons();
    if buttons.is_empty() {
        ui.label(egui::RichText::new(NO_SEGMENTS_NOTICE).weak());
    } else {
        egui::ScrollArea::vertical()
            .id_salt("segment_buttons")
            .max_height(160.0)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 4.0;
                    for button in &buttons {
                        if toggle_btn(ui, &button.label, button.active).clicked() {
                            commands.push(Command::SelectSegment(button.index));
                        }
                    }
                });
            });
    }
    if apply_btn(ui).clicked() {
        commands.push(Command::ApplySegments);
    }

    commands
}
