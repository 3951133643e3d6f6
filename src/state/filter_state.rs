use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use thiserror::Error;

use crate::data::fetcher::DataQuery;

/// Accepted resampling interval, in seconds. Zero disables resampling.
pub const INTERVAL_RANGE: RangeInclusive<u32> = 0..=3600;
/// Accepted number of segments the filtered data is split into.
pub const SEGMENT_RANGE: RangeInclusive<u32> = 1..=100;
/// Quick-pick buttons shown next to the interval input.
pub const INTERVAL_PRESETS: [u32; 6] = [0, 60, 300, 900, 1800, 3600];

pub const DEFAULT_INTERVAL_SECS: u32 = 300;
pub const DEFAULT_NUM_SEGMENTS: u32 = 1;

/// Rejected user input. The display text is what the blocking alert shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter a valid interval between 0 and 3600 seconds.")]
    Interval { input: String },
    #[error("Please enter a valid number of segments between 1 and 100.")]
    SegmentCount { input: String },
    #[error("Segment {} does not exist; there are {count} segments.", .index + 1)]
    SegmentIndex { index: u32, count: u32 },
    #[error("Unknown time range `{0}`.")]
    TimeRange(String),
}

/// Time window preset, counted back from the newest sample on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    All,
    #[default]
    OneHour,
    SixHours,
    TwelveHours,
    OneDay,
    TwoDays,
    SevenDays,
    FourteenDays,
    ThirtyDays,
}

impl TimeRange {
    pub const PRESETS: [TimeRange; 9] = [
        TimeRange::OneHour,
        TimeRange::SixHours,
        TimeRange::TwelveHours,
        TimeRange::OneDay,
        TimeRange::TwoDays,
        TimeRange::SevenDays,
        TimeRange::FourteenDays,
        TimeRange::ThirtyDays,
        TimeRange::All,
    ];

    /// Token sent as the `time_range` query value.
    pub fn token(&self) -> &'static str {
        match self {
            TimeRange::All => "all",
            TimeRange::OneHour => "1h",
            TimeRange::SixHours => "6h",
            TimeRange::TwelveHours => "12h",
            TimeRange::OneDay => "1d",
            TimeRange::TwoDays => "2d",
            TimeRange::SevenDays => "7d",
            TimeRange::FourteenDays => "14d",
            TimeRange::ThirtyDays => "30d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::All => "All",
            TimeRange::OneHour => "1 Hour",
            TimeRange::SixHours => "6 Hours",
            TimeRange::TwelveHours => "12 Hours",
            TimeRange::OneDay => "1 Day",
            TimeRange::TwoDays => "2 Days",
            TimeRange::SevenDays => "7 Days",
            TimeRange::FourteenDays => "14 Days",
            TimeRange::ThirtyDays => "30 Days",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for TimeRange {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        TimeRange::PRESETS
            .into_iter()
            .find(|r| r.token().eq_ignore_ascii_case(token))
            .ok_or_else(|| InputError::TimeRange(s.to_string()))
    }
}

/// Parse the interval input. Only plain integers inside `INTERVAL_RANGE` pass.
pub fn parse_interval(text: &str) -> Result<u32, InputError> {
    parse_bounded(text, &INTERVAL_RANGE).ok_or_else(|| InputError::Interval {
        input: text.to_string(),
    })
}

/// Parse the segment-count input. Only plain integers inside `SEGMENT_RANGE` pass.
pub fn parse_segment_count(text: &str) -> Result<u32, InputError> {
    parse_bounded(text, &SEGMENT_RANGE).ok_or_else(|| InputError::SegmentCount {
        input: text.to_string(),
    })
}

fn parse_bounded(text: &str, range: &RangeInclusive<u32>) -> Option<u32> {
    text.trim()
        .parse::<i64>()
        .ok()
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| range.contains(v))
}

/// The active filters. Fields are private so the segment invariant
/// (`segment_index < num_segments`) cannot be broken from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    time_range: TimeRange,
    interval_secs: u32,
    num_segments: u32,
    segment_index: u32,
}

impl FilterState {
    pub fn new(
        time_range: TimeRange,
        interval_secs: u32,
        num_segments: u32,
    ) -> Result<Self, InputError> {
        let mut state = Self::default();
        state.set_time_range(time_range);
        state.set_interval(interval_secs)?;
        state.set_num_segments(num_segments)?;
        Ok(state)
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    pub fn num_segments(&self) -> u32 {
        self.num_segments
    }

    pub fn segment_index(&self) -> u32 {
        self.segment_index
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.time_range = range;
    }

    pub fn set_interval(&mut self, secs: u32) -> Result<(), InputError> {
        if !INTERVAL_RANGE.contains(&secs) {
            return Err(InputError::Interval {
                input: secs.to_string(),
            });
        }
        self.interval_secs = secs;
        Ok(())
    }

    /// Change the segment count, resetting the active index to 0 when it no
    /// longer points at an existing segment.
    pub fn set_num_segments(&mut self, count: u32) -> Result<(), InputError> {
        if !SEGMENT_RANGE.contains(&count) {
            return Err(InputError::SegmentCount {
                input: count.to_string(),
            });
        }
        self.num_segments = count;
        if self.segment_index >= count {
            self.segment_index = 0;
        }
        Ok(())
    }

    pub fn select_segment(&mut self, index: u32) -> Result<(), InputError> {
        if index >= self.num_segments {
            return Err(InputError::SegmentIndex {
                index,
                count: self.num_segments,
            });
        }
        self.segment_index = index;
        Ok(())
    }

    /// Snapshot of the filters as request parameters.
    pub fn query(&self) -> DataQuery {
        DataQuery {
            time_range: self.time_range,
            interval_secs: self.interval_secs,
            num_segments: self.num_segments,
            segment_index: self.segment_index,
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            time_range: TimeRange::default(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            num_segments: DEFAULT_NUM_SEGMENTS,
            segment_index: 0,
        }
    }
}
