use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::dashboard::{Command, Dashboard};
use crate::data::worker::{FetchWorker, Job};
use crate::state::theme::Theme;
use crate::state::VERSION;
use crate::ui::{chart_grid, detail_modal, filter_panel};

/// The main Trendboard application.
pub struct TrendboardApp {
    dashboard: Dashboard,
    worker: FetchWorker,
    theme: Theme,
    /// Re-fetch period, if polling is enabled.
    auto_refresh: Option<Duration>,
    last_refresh: Instant,
}

fn apply_style(visuals: &mut egui::Visuals) {
    visuals.window_corner_radius = egui::CornerRadius::same(8);
    visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(6);
    visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);
    visuals.widgets.open.corner_radius = egui::CornerRadius::same(6);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.5, egui::Color32::from_gray(160));
    visuals.widgets.active.bg_stroke = egui::Stroke::new(2.0, egui::Color32::from_gray(200));
}

impl TrendboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        dashboard: Dashboard,
        worker: FetchWorker,
        auto_refresh: Option<Duration>,
    ) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();

        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.5));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(20.0));
        style.text_styles.insert(egui::TextStyle::Small, egui::FontId::proportional(12.0));
        style.text_styles.insert(egui::TextStyle::Monospace, egui::FontId::monospace(13.5));

        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);
        ctx.set_style(style);

        let theme = Theme::default();
        let mut app = Self {
            dashboard,
            worker,
            theme,
            auto_refresh,
            last_refresh: Instant::now(),
        };

        // Initial load with the configured filters.
        app.run(ctx, Command::Refresh);
        app
    }

    /// Dispatch a command and start whatever job it asks for.
    fn run(&mut self, ctx: &egui::Context, command: Command) {
        if let Some(job) = self.dashboard.dispatch(command) {
            self.submit(ctx, job);
        }
    }

    fn submit(&mut self, ctx: &egui::Context, job: Job) {
        // Any fetch restarts the auto-refresh period.
        if matches!(job, Job::Fetch(_)) {
            self.last_refresh = Instant::now();
        }
        let ctx = ctx.clone();
        self.worker.submit(job, move || ctx.request_repaint());
    }

    /// Feed finished jobs back into the dashboard.
    fn drain_completions(&mut self, ctx: &egui::Context) {
        while let Some(completion) = self.worker.try_recv() {
            if let Some(job) = self.dashboard.complete(completion) {
                self.submit(ctx, job);
            }
        }
    }

    fn poll_auto_refresh(&mut self, ctx: &egui::Context) {
        let Some(period) = self.auto_refresh else {
            return;
        };
        let elapsed = self.last_refresh.elapsed();
        if elapsed >= period {
            if !self.dashboard.is_loading() {
                tracing::debug!("Auto-refresh");
                self.run(ctx, Command::Refresh);
            }
            ctx.request_repaint_after(period);
        } else {
            ctx.request_repaint_after(period - elapsed);
        }
    }

    fn pick_csv() -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .add_filter("All Files", &["*"])
            .pick_file()
    }

    fn show_header(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.visuals_mut().override_text_color = Some(ui.visuals().strong_text_color());
                    ui.heading("Trendboard");
                    ui.visuals_mut().override_text_color = None;

                    ui.separator();

                    let uploading = self.dashboard.is_uploading();
                    let upload = ui
                        .add_enabled(!uploading, egui::Button::new("Upload CSV"))
                        .on_hover_text("Send a CSV file to the data server");
                    if upload.clicked() {
                        if let Some(path) = Self::pick_csv() {
                            commands.push(Command::UploadCsv(path));
                        }
                    }
                    if ui.button("Refresh").on_hover_text("Reload with the current filters").clicked() {
                        commands.push(Command::Refresh);
                    }
                    if self.worker.in_flight() > 0 {
                        ui.spinner();
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(self.theme.toggle_label()).clicked() {
                            self.theme = self.theme.toggle();
                        }
                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });
    }

    fn show_footer(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let filters = self.dashboard.filters();
                    ui.label(
                        egui::RichText::new(format!(
                            "{} | {}s | segment {} of {}",
                            filters.time_range().label(),
                            filters.interval_secs(),
                            filters.segment_index() + 1,
                            filters.num_segments(),
                        ))
                        .weak(),
                    );

                    let rows = self.dashboard.dataset().len();
                    ui.separator();
                    ui.label(egui::RichText::new(if rows == 1 { "1 row".to_string() } else { format!("{rows} rows") }).weak());

                    if let Some(msg) = self.dashboard.status() {
                        ui.separator();
                        ui.label(msg);
                        if ui.small_button("dismiss").clicked() {
                            commands.push(Command::DismissStatus);
                        }
                    }
                });
            });
    }

    fn show_alert(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        let Some(message) = self.dashboard.alert() else {
            return;
        };
        let response = egui::Modal::new(egui::Id::new("input_alert")).show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.label(message);
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.add(egui::Button::new("OK").min_size(egui::vec2(80.0, 28.0))).clicked() {
                    commands.push(Command::DismissAlert);
                }
            });
        });
        if response.should_close() {
            commands.push(Command::DismissAlert);
        }
    }
}

impl eframe::App for TrendboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut vis = self.theme.visuals();
        apply_style(&mut vis);
        ctx.set_visuals(vis);

        self.drain_completions(ctx);
        self.poll_auto_refresh(ctx);

        let mut commands: Vec<Command> = Vec::new();

        self.show_header(ctx, &mut commands);
        self.show_footer(ctx, &mut commands);

        egui::SidePanel::left("filters")
            .resizable(false)
            .exact_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(4.0);
                    commands.extend(filter_panel::show_filter_panel(ui, &mut self.dashboard));
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(command) = chart_grid::show_chart_grid(ui, &self.dashboard, &self.theme) {
                commands.push(command);
            }
        });

        if let Some(modal) = self.dashboard.modal_mut() {
            if let Some(command) = detail_modal::show_detail_modal(ctx, modal) {
                commands.push(command);
            }
        }

        self.show_alert(ctx, &mut commands);

        for command in commands {
            self.run(ctx, command);
        }
    }
}
