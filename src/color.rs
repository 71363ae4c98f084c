use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Department;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// One stable colour per department, in [`Department::ALL`] order.
pub fn department_colors() -> [(Department, Color32); 4] {
    let palette = generate_palette(Department::ALL.len());
    [
        (Department::Engineering, palette[0]),
        (Department::Business, palette[1]),
        (Department::Arts, palette[2]),
        (Department::Science, palette[3]),
    ]
}

/// Look up a department's colour.
pub fn color_for(colors: &[(Department, Color32)], dept: Department) -> Color32 {
    colors
        .iter()
        .find(|(d, _)| *d == dept)
        .map(|(_, c)| *c)
        .unwrap_or(Color32::GRAY)
}
