use std::path::PathBuf;

use crate::chart::registry::{ChartInstance, ChartRegistry};
use crate::chart::schema::infer_plot_columns;
use crate::chart::series::ChartSeries;
use crate::chart::statistics::SeriesStats;
use crate::chart::style::ChartStyle;
use crate::data::dataset::Dataset;
use crate::data::fetcher::FetchError;
use crate::data::worker::{Completion, FetchTicket, Job};
use crate::state::filter_state::{
    parse_interval, parse_segment_count, FilterState, InputError, TimeRange,
};
use crate::state::segments::SegmentSelector;

pub const LOADING_MESSAGE: &str = "Loading data...";
pub const ERROR_MESSAGE: &str = "Error loading data. Please try again.";
pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";

/// Every user interaction the dashboard reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Time-range button: applies immediately.
    SelectTimeRange(TimeRange),
    IntervalPreset(u32),
    /// The interval input lost focus or Enter was pressed.
    CommitInterval(String),
    /// Submit of the interval form.
    ApplyInterval,
    CommitSegmentCount(String),
    SelectSegment(u32),
    /// Submit of the splitting form.
    ApplySegments,
    Refresh,
    UploadCsv(PathBuf),
    /// A chart card was selected; carries its container id.
    OpenModal(String),
    CloseModal,
    DismissAlert,
    DismissStatus,
}

/// What the chart area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartArea {
    /// Nothing requested yet.
    Idle,
    Loading,
    Error { detail: String },
    NoData,
    Charts,
}

/// The single detail chart shown over the grid.
#[derive(Debug)]
pub struct DetailModal {
    pub title: String,
    pub chart: ChartInstance,
    pub stats: Option<SeriesStats>,
    pub show_table: bool,
}

/// Owns all dashboard state and applies commands to it.
///
/// Network work is not done here: commands that need it return a `Job`,
/// and its `Completion` is fed back through `complete`.
#[derive(Debug)]
pub struct Dashboard {
    filters: FilterState,
    interval_input: String,
    segments_input: String,
    segments: SegmentSelector,
    dataset: Dataset,
    charts: ChartRegistry,
    modal: Option<DetailModal>,
    area: ChartArea,
    alert: Option<String>,
    status: Option<String>,
    last_token: u64,
    pending: Option<u64>,
    uploading: usize,
}

impl Dashboard {
    pub fn new(filters: FilterState) -> Self {
        Self {
            interval_input: filters.interval_secs().to_string(),
            segments_input: filters.num_segments().to_string(),
            segments: SegmentSelector::generate(filters.num_segments(), filters.segment_index()),
            filters,
            dataset: Dataset::default(),
            charts: ChartRegistry::new(),
            modal: None,
            area: ChartArea::Idle,
            alert: None,
            status: None,
            last_token: 0,
            pending: None,
            uploading: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Edit buffer behind the interval input.
    pub fn interval_input_mut(&mut self) -> &mut String {
        &mut self.interval_input
    }

    pub fn interval_input(&self) -> &str {
        &self.interval_input
    }

    /// Edit buffer behind the segment-count input.
    pub fn segments_input_mut(&mut self) -> &mut String {
        &mut self.segments_input
    }

    pub fn segments_input(&self) -> &str {
        &self.segments_input
    }

    pub fn segments(&self) -> &SegmentSelector {
        &self.segments
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    pub fn modal(&self) -> Option<&DetailModal> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut DetailModal> {
        self.modal.as_mut()
    }

    pub fn area(&self) -> &ChartArea {
        &self.area
    }

    /// Message of the blocking alert, if one is up.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Transient status-bar message.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading > 0
    }

    /// Apply one command. Returns the network job it requires, if any.
    pub fn dispatch(&mut self, command: Command) -> Option<Job> {
        match command {
            Command::SelectTimeRange(range) => {
                self.filters.set_time_range(range);
                Some(self.request_fetch())
            }
            Command::IntervalPreset(secs) => {
                match self.filters.set_interval(secs) {
                    Ok(()) => self.interval_input = secs.to_string(),
                    Err(e) => self.reject(e),
                }
                None
            }
            Command::CommitInterval(text) => {
                match parse_interval(&text).and_then(|secs| self.filters.set_interval(secs)) {
                    Ok(()) => self.interval_input = self.filters.interval_secs().to_string(),
                    Err(e) => {
                        self.interval_input = self.filters.interval_secs().to_string();
                        self.reject(e);
                    }
                }
                None
            }
            Command::CommitSegmentCount(text) => {
                match parse_segment_count(&text).and_then(|n| self.filters.set_num_segments(n)) {
                    Ok(()) => {
                        self.segments_input = self.filters.num_segments().to_string();
                        self.segments = SegmentSelector::generate(
                            self.filters.num_segments(),
                            self.filters.segment_index(),
                        );
                    }
                    Err(e) => {
                        self.segments_input = self.filters.num_segments().to_string();
                        self.reject(e);
                    }
                }
                None
            }
            Command::SelectSegment(index) => {
                match self.filters.select_segment(index) {
                    Ok(()) => {
                        self.segments.select(index);
                    }
                    Err(e) => tracing::warn!("Ignoring segment selection: {e}"),
                }
                None
            }
            Command::ApplyInterval | Command::ApplySegments | Command::Refresh => {
                Some(self.request_fetch())
            }
            Command::UploadCsv(path) => {
                tracing::info!("Uploading {:?}", path);
                self.uploading += 1;
                self.status = Some(format!("Uploading {}...", display_name(&path)));
                Some(Job::Upload(path))
            }
            Command::OpenModal(container_id) => {
                self.open_modal(&container_id);
                None
            }
            Command::CloseModal => {
                self.close_modal();
                None
            }
            Command::DismissAlert => {
                self.alert = None;
                None
            }
            Command::DismissStatus => {
                self.status = None;
                None
            }
        }
    }

    /// Apply a finished job. May ask for a follow-up job.
    pub fn complete(&mut self, completion: Completion) -> Option<Job> {
        match completion {
            Completion::Fetched { token, result } => {
                self.finish_fetch(token, result);
                None
            }
            Completion::Uploaded { path, result } => {
                self.uploading = self.uploading.saturating_sub(1);
                match result {
                    Ok(()) => {
                        tracing::info!("Uploaded {:?}", path);
                        self.status = Some(format!("Uploaded {}", display_name(&path)));
                        Some(self.request_fetch())
                    }
                    Err(e) => {
                        tracing::error!("Upload of {:?} failed: {e}", path);
                        self.status = Some(format!("Upload failed: {e}"));
                        None
                    }
                }
            }
        }
    }

    fn request_fetch(&mut self) -> Job {
        self.last_token += 1;
        let ticket = FetchTicket {
            token: self.last_token,
            query: self.filters.query(),
        };
        tracing::info!(token = ticket.token, query = ?ticket.query, "Fetching data");
        self.pending = Some(ticket.token);
        self.area = ChartArea::Loading;
        Job::Fetch(ticket)
    }

    fn finish_fetch(&mut self, token: u64, result: Result<Dataset, FetchError>) {
        if token != self.last_token {
            tracing::warn!(token, latest = self.last_token, "Discarding response of a superseded request");
            return;
        }
        self.pending = None;

        match result {
            Ok(dataset) => {
                tracing::info!(token, rows = dataset.len(), "Data loaded");
                self.dataset = dataset;
                self.render();
            }
            Err(e) => {
                tracing::error!("Error fetching data: {e}");
                self.charts.clear();
                self.area = ChartArea::Error {
                    detail: e.to_string(),
                };
            }
        }
    }

    /// Rebuild every grid chart from the current dataset.
    fn render(&mut self) {
        self.charts.clear();

        if self.dataset.is_empty() {
            self.area = ChartArea::NoData;
            return;
        }

        for column in infer_plot_columns(&self.dataset) {
            let series = ChartSeries::build(&self.dataset, &column.key);
            self.charts.mount(column, series, ChartStyle::COMPACT);
        }
        self.area = ChartArea::Charts;
    }

    fn open_modal(&mut self, container_id: &str) {
        let Some(column) = self.charts.get(container_id).map(|c| c.column().clone()) else {
            tracing::warn!("No chart bound to {container_id}");
            return;
        };

        self.close_modal();

        let series = ChartSeries::build(&self.dataset, &column.key);
        let stats = SeriesStats::compute(&series.values);
        let title = format!("{} - Detail View", column.title);
        self.modal = Some(DetailModal {
            title,
            chart: ChartInstance::new(column, series, ChartStyle::DETAIL),
            stats,
            show_table: false,
        });
    }

    fn close_modal(&mut self) {
        self.modal = None;
    }

    fn reject(&mut self, error: InputError) {
        tracing::warn!("Rejected input: {error:?}");
        self.alert = Some(error.to_string());
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fetcher::DataQuery;

    const SAMPLE: &str = r#"[
        {"Timestamp":"2024-01-01T00:00:10Z","ID":2,"Value":12,"Value_trend":11.0,"Temp":20.5,"Temp_trend":20.1},
        {"Timestamp":"2024-01-01T00:00:00Z","ID":1,"Value":10,"Value_trend":9.5,"Temp":20.0,"Temp_trend":20.0}
    ]"#;

    fn dataset(json: &str) -> Dataset {
        Dataset::from_json_slice(json.as_bytes()).unwrap()
    }

    fn ticket(job: Option<Job>) -> FetchTicket {
        match job {
            Some(Job::Fetch(ticket)) => ticket,
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    fn fetch_ok(dashboard: &mut Dashboard, command: Command, json: &str) -> DataQuery {
        let t = ticket(dashboard.dispatch(command));
        assert!(dashboard
            .complete(Completion::Fetched {
                token: t.token,
                result: Ok(dataset(json)),
            })
            .is_none());
        t.query
    }

    #[test]
    fn test_submit_fetches_once_and_renders_per_column() {
        let mut dashboard = Dashboard::default();
        let job = dashboard.dispatch(Command::ApplyInterval);
        let t = ticket(job);
        assert_eq!(dashboard.area(), &ChartArea::Loading);
        assert!(dashboard.is_loading());

        dashboard.complete(Completion::Fetched {
            token: t.token,
            result: Ok(dataset(SAMPLE)),
        });
        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.area(), &ChartArea::Charts);
        let ids: Vec<&str> = dashboard.charts().iter().map(|c| c.container_id()).collect();
        assert_eq!(ids, vec!["value", "temp"]);
    }

    #[test]
    fn test_time_range_fetches_immediately_with_filters() {
        let mut dashboard = Dashboard::default();
        let query = ticket(dashboard.dispatch(Command::SelectTimeRange(TimeRange::SevenDays))).query;
        assert_eq!(query.time_range, TimeRange::SevenDays);
        assert_eq!(query.interval_secs, 300);
    }

    #[test]
    fn test_other_controls_do_not_fetch() {
        let mut dashboard = Dashboard::default();
        assert!(dashboard.dispatch(Command::IntervalPreset(60)).is_none());
        assert!(dashboard.dispatch(Command::CommitInterval("120".into())).is_none());
        assert!(dashboard.dispatch(Command::CommitSegmentCount("4".into())).is_none());
        assert!(dashboard.dispatch(Command::SelectSegment(3)).is_none());
        assert_eq!(dashboard.area(), &ChartArea::Idle);

        let query = ticket(dashboard.dispatch(Command::ApplySegments)).query;
        assert_eq!(query.interval_secs, 120);
        assert_eq!(query.num_segments, 4);
        assert_eq!(query.segment_index, 3);
    }

    #[test]
    fn test_invalid_interval_reverts_input() {
        let mut dashboard = Dashboard::default();
        *dashboard.interval_input_mut() = "9999".to_string();
        dashboard.dispatch(Command::CommitInterval("9999".into()));

        assert_eq!(dashboard.filters().interval_secs(), 300);
        assert_eq!(dashboard.interval_input(), "300");
        assert_eq!(
            dashboard.alert(),
            Some("Please enter a valid interval between 0 and 3600 seconds.")
        );
        dashboard.dispatch(Command::DismissAlert);
        assert_eq!(dashboard.alert(), None);

        dashboard.dispatch(Command::CommitInterval("ten".into()));
        assert_eq!(dashboard.filters().interval_secs(), 300);
        assert!(dashboard.alert().is_some());
    }

    #[test]
    fn test_valid_interval_normalises_input() {
        let mut dashboard = Dashboard::default();
        dashboard.dispatch(Command::CommitInterval(" 0060 ".into()));
        assert_eq!(dashboard.filters().interval_secs(), 60);
        assert_eq!(dashboard.interval_input(), "60");
        assert_eq!(dashboard.alert(), None);

        dashboard.dispatch(Command::IntervalPreset(900));
        assert_eq!(dashboard.filters().interval_secs(), 900);
        assert_eq!(dashboard.interval_input(), "900");
    }

    #[test]
    fn test_segment_count_rejected() {
        let mut dashboard = Dashboard::default();
        dashboard.dispatch(Command::CommitSegmentCount("0".into()));
        assert_eq!(dashboard.filters().num_segments(), 1);
        assert_eq!(dashboard.segments_input(), "1");
        assert_eq!(
            dashboard.alert(),
            Some("Please enter a valid number of segments between 1 and 100.")
        );
        assert_eq!(dashboard.segments(), &SegmentSelector::NoSegments);
    }

    #[test]
    fn test_segment_count_regenerates_buttons() {
        let mut dashboard = Dashboard::default();
        dashboard.dispatch(Command::CommitSegmentCount("5".into()));
        let buttons = dashboard.segments().buttons();
        assert_eq!(buttons.len(), 5);
        assert!(buttons[0].active);
        assert!(buttons[1..].iter().all(|b| !b.active));
    }

    #[test]
    fn test_shrinking_segments_resets_active_button() {
        let mut dashboard = Dashboard::default();
        dashboard.dispatch(Command::CommitSegmentCount("5".into()));
        dashboard.dispatch(Command::SelectSegment(4));
        assert_eq!(dashboard.segments().active(), Some(4));

        dashboard.dispatch(Command::CommitSegmentCount("3".into()));
        assert_eq!(dashboard.filters().segment_index(), 0);
        assert_eq!(dashboard.segments().active(), Some(0));
        assert_eq!(dashboard.segments().buttons().len(), 3);
    }

    #[test]
    fn test_out_of_range_segment_click_is_ignored() {
        let mut dashboard = Dashboard::default();
        dashboard.dispatch(Command::CommitSegmentCount("2".into()));
        dashboard.dispatch(Command::SelectSegment(5));
        assert_eq!(dashboard.filters().segment_index(), 0);
        assert_eq!(dashboard.segments().active(), Some(0));
    }

    #[test]
    fn test_empty_dataset_shows_no_data() {
        let mut dashboard = Dashboard::default();
        fetch_ok(&mut dashboard, Command::Refresh, SAMPLE);
        assert_eq!(dashboard.charts().len(), 2);

        fetch_ok(&mut dashboard, Command::Refresh, "[]");
        assert_eq!(dashboard.area(), &ChartArea::NoData);
        assert!(dashboard.charts().is_empty());
    }

    #[test]
    fn test_rerender_keeps_one_instance_per_id() {
        let mut dashboard = Dashboard::default();
        fetch_ok(&mut dashboard, Command::Refresh, SAMPLE);
        let before: Vec<u64> = dashboard.charts().iter().map(|c| c.id()).collect();
        fetch_ok(&mut dashboard, Command::Refresh, SAMPLE);
        let after: Vec<u64> = dashboard.charts().iter().map(|c| c.id()).collect();

        assert_eq!(after.len(), 2);
        assert!(before.iter().all(|id| !after.contains(id)));
    }

    #[test]
    fn test_single_row_chart() {
        let mut dashboard = Dashboard::default();
        fetch_ok(
            &mut dashboard,
            Command::Refresh,
            r#"[{"Timestamp":"2024-01-01T00:00:00Z","ID":1,"Value":10,"Value_trend":9.5}]"#,
        );
        assert_eq!(dashboard.charts().len(), 1);
        let chart = dashboard.charts().get("value").unwrap();
        assert_eq!(chart.column().title, "Value");

        let expected_label = crate::data::datetime::format_local(
            &crate::data::datetime::parse_timestamp("2024-01-01T00:00:00Z").unwrap(),
        );
        let series = chart.series();
        assert_eq!(series.labels[0], expected_label);
        assert_eq!(series.value_points(), vec![[0.0, 10.0]]);
        assert_eq!(series.trend_points(), vec![[0.0, 9.5]]);
        assert!(!chart.style().show_legend);
    }

    #[test]
    fn test_fetch_failure_shows_error() {
        let mut dashboard = Dashboard::default();
        fetch_ok(&mut dashboard, Command::Refresh, SAMPLE);

        let t = ticket(dashboard.dispatch(Command::Refresh));
        dashboard.complete(Completion::Fetched {
            token: t.token,
            result: Err(FetchError::Status {
                status: 500,
                message: None,
            }),
        });
        assert_eq!(
            dashboard.area(),
            &ChartArea::Error {
                detail: "HTTP error! status: 500".to_string()
            }
        );
        assert!(dashboard.charts().is_empty());
        assert!(!dashboard.is_loading());
        // The last good dataset stays around.
        assert_eq!(dashboard.dataset().len(), 2);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut dashboard = Dashboard::default();
        let first = ticket(dashboard.dispatch(Command::SelectTimeRange(TimeRange::All)));
        let second = ticket(dashboard.dispatch(Command::SelectTimeRange(TimeRange::OneDay)));

        dashboard.complete(Completion::Fetched {
            token: second.token,
            result: Ok(dataset(SAMPLE)),
        });
        dashboard.complete(Completion::Fetched {
            token: first.token,
            result: Ok(dataset("[]")),
        });

        assert_eq!(dashboard.area(), &ChartArea::Charts);
        assert_eq!(dashboard.dataset().len(), 2);
    }

    #[test]
    fn test_superseded_request_keeps_loading() {
        let mut dashboard = Dashboard::default();
        let first = ticket(dashboard.dispatch(Command::Refresh));
        let _second = ticket(dashboard.dispatch(Command::Refresh));
        dashboard.complete(Completion::Fetched {
            token: first.token,
            result: Ok(dataset(SAMPLE)),
        });
        assert!(dashboard.is_loading());
        assert_eq!(dashboard.area(), &ChartArea::Loading);
    }

    #[test]
    fn test_modal_lifecycle() {
        let mut dashboard = Dashboard::default();
        fetch_ok(&mut dashboard, Command::Refresh, SAMPLE);

        dashboard.dispatch(Command::OpenModal("temp".into()));
        let first_id = {
            let modal = dashboard.modal().unwrap();
            assert_eq!(modal.title, "Temp - Detail View");
            assert_eq!(modal.chart.column().color, dashboard.charts().get("temp").unwrap().column().color);
            assert!(modal.chart.style().show_legend);
            assert_eq!(modal.stats.as_ref().map(|s| s.count), Some(2));
            modal.chart.id()
        };

        dashboard.dispatch(Command::CloseModal);
        assert!(dashboard.modal().is_none());

        dashboard.dispatch(Command::OpenModal("value".into()));
        dashboard.dispatch(Command::OpenModal("temp".into()));
        let modal = dashboard.modal().unwrap();
        assert_ne!(modal.chart.id(), first_id);
        assert_eq!(modal.chart.column().key, "Temp");
    }

    #[test]
    fn test_modal_survives_grid_rerender_and_unknown_card_is_ignored() {
        let mut dashboard = Dashboard::default();
        fetch_ok(&mut dashboard, Command::Refresh, SAMPLE);
        dashboard.dispatch(Command::OpenModal("missing".into()));
        assert!(dashboard.modal().is_none());

        dashboard.dispatch(Command::OpenModal("value".into()));
        fetch_ok(&mut dashboard, Command::Refresh, "[]");
        assert!(dashboard.modal().is_some());
    }

    #[test]
    fn test_upload_success_triggers_refetch() {
        let mut dashboard = Dashboard::default();
        let job = dashboard.dispatch(Command::UploadCsv(PathBuf::from("/tmp/readings.csv")));
        assert_eq!(job, Some(Job::Upload(PathBuf::from("/tmp/readings.csv"))));
        assert!(dashboard.is_uploading());

        let follow_up = dashboard.complete(Completion::Uploaded {
            path: PathBuf::from("/tmp/readings.csv"),
            result: Ok(()),
        });
        assert!(matches!(follow_up, Some(Job::Fetch(_))));
        assert!(!dashboard.is_uploading());
        assert_eq!(dashboard.status(), Some("Uploaded readings.csv"));
    }

    #[test]
    fn test_upload_failure_reports_status() {
        let mut dashboard = Dashboard::default();
        dashboard.dispatch(Command::UploadCsv(PathBuf::from("notes.txt")));
        let follow_up = dashboard.complete(Completion::Uploaded {
            path: PathBuf::from("notes.txt"),
            result: Err(FetchError::Status {
                status: 400,
                message: Some("Invalid file type. Please upload a CSV file.".into()),
            }),
        });
        assert!(follow_up.is_none());
        assert_eq!(
            dashboard.status(),
            Some("Upload failed: HTTP error! status: 400 (Invalid file type. Please upload a CSV file.)")
        );
        dashboard.dispatch(Command::DismissStatus);
        assert_eq!(dashboard.status(), None);
    }
}
