pub mod chart_grid;
pub mod chart_view;
pub mod detail_modal;
pub mod filter_panel;
