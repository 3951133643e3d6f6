/// Shown in place of the buttons when the data is not split.
pub const NO_SEGMENTS_NOTICE: &str = "No segments to display.";

/// One generated segment selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentButton {
    pub index: u32,
    pub label: String,
    pub active: bool,
}

/// The set of segment selector buttons for the current segment count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentSelector {
    /// Count is 1 (or less): nothing is selectable.
    NoSegments,
    Buttons { count: u32, active: u32 },
}

impl SegmentSelector {
    pub fn generate(num_segments: u32, active_index: u32) -> Self {
        if num_segments <= 1 {
            SegmentSelector::NoSegments
        } else {
            SegmentSelector::Buttons {
                count: num_segments,
                active: active_index,
            }
        }
    }

    /// Move the active marker. Returns false when `index` has no button.
    pub fn select(&mut self, index: u32) -> bool {
        match self {
            SegmentSelector::Buttons { count, active } if index < *count => {
                *active = index;
                true
            }
            _ => false,
        }
    }

    pub fn buttons(&self) -> Vec<SegmentButton> {
        match *self {
            SegmentSelector::NoSegments => Vec::new(),
            SegmentSelector::Buttons { count, active } => (0..count)
                .map(|index| SegmentButton {
                    index,
                    label: format!("Segment {}", index + 1),
                    active: index == active,
                })
                .collect(),
        }
    }

    pub fn active(&self) -> Option<u32> {
        match *self {
            SegmentSelector::NoSegments => None,
            SegmentSelector::Buttons { active, .. } => Some(active),
        }
    }
}
