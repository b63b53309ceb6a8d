use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Matplotlib's first cycle colour
const DEFAULT_COLOR: [u8; 3] = [31, 119, 180];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolinStyle {
    /// Number of points the density is evaluated at
    pub points: usize,
    /// Maximum violin width in x units, positions are one unit apart
    pub widths: f64,
    /// Quantile marker lines, empty to hide them
    pub quantiles: Vec<f64>,
    pub show_means: bool,
    pub show_medians: bool,
    pub show_extrema: bool,
    pub body_color: [u8; 3],
    pub body_alpha: f64,
    pub line_color: [u8; 3],
    pub background_alpha: f64,
    pub y_label: String,
    /// Font sizes in typographic points
    pub title_size: f64,
    pub suptitle_size: f64,
}

impl Default for ViolinStyle {
    fn default() -> Self {
        Self {
            points: 20,
            widths: 0.7,
            quantiles: vec![0.1, 0.9],
            show_means: true,
            show_medians: true,
            show_extrema: false,
            body_color: DEFAULT_COLOR,
            body_alpha: 0.3,
            line_color: DEFAULT_COLOR,
            background_alpha: 0.8,
            y_label: "Time [μs]".to_owned(),
            title_size: 16.0,
            suptitle_size: 10.0,
        }
    }
}

impl ViolinStyle {
    pub fn body_rgb(&self) -> RGBColor {
        let [r, g, b] = self.body_color;
        RGBColor(r, g, b)
    }

    pub fn line_rgb(&self) -> RGBColor {
        let [r, g, b] = self.line_color;
        RGBColor(r, g, b)
    }
}

/// Font points to pixels at 100 dpi
pub fn pt_to_px(pt: f64) -> f64 {
    pt * 100.0 / 72.0
}
