/// How a chart is drawn: compact in the grid, detailed in the modal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub height: f32,
    pub max_x_ticks: usize,
    /// Radius of the sample markers; zero hides them.
    pub point_radius: f32,
    pub show_legend: bool,
    /// Pan and zoom. Off in the grid so a click selects the card.
    pub interactive: bool,
    pub line_width: f32,
    pub trend_width: f32,
    pub trend_dash: f32,
}

impl ChartStyle {
    pub const COMPACT: ChartStyle = ChartStyle {
        height: 384.0,
        max_x_ticks: 5,
        point_radius: 0.0,
        show_legend: false,
        interactive: false,
        line_width: 2.0,
        trend_width: 1.0,
        trend_dash: 5.0,
    };

    pub const DETAIL: ChartStyle = ChartStyle {
        height: 520.0,
        max_x_ticks: 10,
        point_radius: 2.0,
        show_legend: true,
        interactive: true,
        line_width: 2.0,
        trend_width: 1.0,
        trend_dash: 5.0,
    };
}
