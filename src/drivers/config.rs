use crate::drivers::mapping::CoordinateMapper;
use crate::drivers::zoom::ZoomState;
use crate::drivers::SpectrogramError;
/// Selectable visible depth ranges in meters, shallowest first.
pub const DEPTH_RANGES_M: [f64; 4] = [5.0, 10.0, 20.0, 40.0];
/// Resolution assumed until the first message says otherwise.
pub const DEFAULT_RESOLUTION_CM: f64 = 1.0;
/// Display geometry shared by the renderer and the cursor overlay.
#[derive(Clone, Debug)]
pub struct DisplayConfig {
    resolution_cm_per_sample: f64,
    pub zoom: ZoomState,
}
impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            resolution_cm_per_sample: DEFAULT_RESOLUTION_CM,
            zoom: ZoomState::default(),
        }
    }
}
impl DisplayConfig {
    pub fn new() -> Self {
        Self::default()
    }
    /// Rejects anything that would make `meters_per_row` zero, negative or NaN.
    pub fn set_resolution(&mut self, cm_per_sample: f64) -> Result<(), SpectrogramError> {
        if !cm_per_sample.is_finite() || cm_per_sample <= 0.0 {
            return Err(SpectrogramError::InvalidResolution(cm_per_sample));
        }
        self.resolution_cm_per_sample = cm_per_sample;
        Ok(())
    }
    pub fn resolution_cm_per_sample(&self) -> f64 {
        self.resolution_cm_per_sample
    }
    pub fn meters_per_row(&self) -> f64 {
        self.resolution_cm_per_sample / 100.0
    }
    pub fn visible_range_m(&self) -> f64 {
        self.zoom.range_m()
    }
    pub fn visible_sample_count(&self) -> usize {
        ((self.visible_range_m() / self.meters_per_row()).floor() as usize).max(1)
    }
    pub fn mapper(&self, height: usize) -> CoordinateMapper {
        CoordinateMapper::new(self.meters_per_row(), self.visible_sample_count(), height)
    }
}
