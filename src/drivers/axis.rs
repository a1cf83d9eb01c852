use crate::drivers::mapping::{round2, CoordinateMapper};
pub const DEPTH_TICK_COUNT: usize = 5;
pub const CURSOR_PLACEHOLDER: &str = "Cursor: -- m";
#[derive(Clone, Debug, PartialEq)]
pub struct DepthTick {
    pub row: usize,
    pub depth_m: f64,
    pub label: String,
}
/// Ticks spaced evenly over the visible sample range, not over pixel rows.
/// The last tick sits one past the final sample, so rows are clamped to the canvas.
pub fn depth_ticks(mapper: &CoordinateMapper) -> Vec<DepthTick> {
    // f64: tiny resolutions push the sample count towards usize::MAX
    let samples = mapper.visible_samples() as f64;
    let last_row = mapper.height().saturating_sub(1);
    (0..DEPTH_TICK_COUNT)
        .map(|i| {
            let sample_idx = (i as f64 * samples / (DEPTH_TICK_COUNT - 1) as f64).floor() as usize;
            let depth_m = round2(mapper.sample_index_to_depth(sample_idx));
            DepthTick {
                row: mapper.sample_index_to_pixel_row(sample_idx).min(last_row),
                depth_m,
                label: format!("{depth_m}m"),
            }
        })
        .collect()
}
pub fn range_label(range_m: f64) -> String {
    format!("0-{range_m}")
}
pub fn measured_depth_label(depth_m: Option<f64>) -> String {
    match depth_m {
        Some(depth) => format!("Depth: {}m", round2(depth)),
        None => "Depth: --m".to_owned(),
    }
}
/// What the overlay shows for the current pointer position.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorReadout {
    /// Row for the horizontal guide line; `None` once the pointer left.
    pub row: Option<f64>,
    pub label: String,
}
impl CursorReadout {
    pub fn hidden() -> Self {
        Self {
            row: None,
            label: CURSOR_PLACEHOLDER.to_owned(),
        }
    }
    pub fn at(mapper: &CoordinateMapper, y: f64) -> Self {
        Self {
            row: Some(y),
            label: format!("Cursor: {:.2} m", mapper.pixel_row_to_depth(y)),
        }
    }
    pub fn from_pointer(mapper: &CoordinateMapper, y: Option<f64>) -> Self {
        match y {
            Some(y) => Self::at(mapper, y),
            None => Self::hidden(),
        }
    }
}
