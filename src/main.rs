mod app;
mod chart;
mod dashboard;
mod data;
mod settings;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use app::TrendboardApp;
use dashboard::Dashboard;
use data::fetcher::{DataSource, HttpDataSource};
use data::worker::FetchWorker;
use eframe::egui;
use eframe::egui_wgpu;
use settings::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load()?;
    let filters = settings.initial_filters()?;
    tracing::info!(base_url = %settings.base_url, filters = ?filters, "Starting Trendboard");

    let source: Arc<dyn DataSource> = Arc::new(
        HttpDataSource::new(&settings.base_url, settings.request_timeout())
            .context("Failed to build HTTP client")?,
    );
    let worker = FetchWorker::new(source);
    let dashboard = Dashboard::new(filters);
    let auto_refresh = settings.auto_refresh();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Trendboard")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        wgpu_options: egui_wgpu::WgpuConfiguration {
            present_mode: eframe::wgpu::PresentMode::AutoVsync,
            wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
                instance_descriptor: eframe::wgpu::InstanceDescriptor {
                    backends: eframe::wgpu::Backends::DX12
                        | eframe::wgpu::Backends::VULKAN
                        | eframe::wgpu::Backends::GL,
                    ..Default::default()
                },
                power_preference: eframe::wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    eframe::run_native(
        "Trendboard",
        options,
        Box::new(move |cc| Ok(Box::new(TrendboardApp::new(cc, dashboard, worker, auto_refresh)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start the window: {e}"))
}
