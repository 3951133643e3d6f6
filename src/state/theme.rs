use egui::{Color32, Visuals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    /// Background of a chart card.
    pub fn card_fill(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(28, 28, 32),
            Theme::Light => Color32::WHITE,
        }
    }

    pub fn error_text(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(255, 110, 110),
            Theme::Light => Color32::from_rgb(239, 68, 68),
        }
    }

    /// Label for the button that switches to the other theme.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Dark => "Light Mode",
            Theme::Light => "Dark Mode",
        }
    }
}
