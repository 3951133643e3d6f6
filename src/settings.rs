use std::time::Duration;

use anyhow::Context;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::state::filter_state::{
    FilterState, TimeRange, DEFAULT_INTERVAL_SECS, DEFAULT_NUM_SEGMENTS,
};

pub const CONFIG_FILE: &str = "config/dashboard";
pub const ENV_PREFIX: &str = "TRENDBOARD";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Start-up settings. Filter values seed the initial `FilterState`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub time_range: String,
    pub time_interval: u32,
    pub num_segments: u32,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Re-fetch with the current filters every this many seconds.
    #[serde(default)]
    pub auto_refresh_secs: Option<u64>,
}

impl Settings {
    /// Defaults, then `config/dashboard.*` if present, then `TRENDBOARD_*`
    /// environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let builder = defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let settings: Settings = builder
            .build()
            .context("Failed to read dashboard configuration")?
            .try_deserialize()
            .context("Invalid dashboard configuration")?;
        settings.initial_filters()?;
        Ok(settings)
    }

    /// The filter state the dashboard starts with.
    pub fn initial_filters(&self) -> anyhow::Result<FilterState> {
        let range: TimeRange = self.time_range.parse()?;
        let filters = FilterState::new(range, self.time_interval, self.num_segments)?;
        Ok(filters)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn auto_refresh(&self) -> Option<Duration> {
        self.auto_refresh_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

fn defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("time_range", "1h")?
        .set_default("time_interval", i64::from(DEFAULT_INTERVAL_SECS))?
        .set_default("num_segments", i64::from(DEFAULT_NUM_SEGMENTS))?)
}
