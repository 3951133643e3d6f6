use egui::Color32;

/// Series colours, assigned in column order.
pub const CHART_PALETTE: [[u8; 3]; 9] = [
    [59, 130, 246],  // Blue
    [34, 197, 94],   // Green
    [168, 85, 247],  // Purple
    [249, 115, 22],  // Orange
    [239, 68, 68],   // Red
    [20, 184, 166],  // Teal
    [236, 72, 153],  // Pink
    [6, 182, 212],   // Cyan
    [139, 92, 246],  // Violet
];

pub fn color_for_index(index: usize) -> [u8; 3] {
    CHART_PALETTE[index % CHART_PALETTE.len()]
}

pub fn color32(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}
