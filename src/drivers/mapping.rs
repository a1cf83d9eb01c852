/// Round to the two decimals shown in labels and readouts.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
/// Conversions between pixel rows, sample indices and depth in meters.
///
/// Built fresh from the current [`DisplayConfig`](crate::drivers::DisplayConfig)
/// whenever it is needed, so a resolution or zoom change never leaves a stale
/// mapping behind. Row 0 is the top of the canvas (shallowest).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    meters_per_row: f64,
    visible_samples: usize,
    height: usize,
}
impl CoordinateMapper {
    pub fn new(meters_per_row: f64, visible_samples: usize, height: usize) -> Self {
        Self {
            meters_per_row,
            visible_samples: visible_samples.max(1),
            height,
        }
    }
    pub fn meters_per_row(&self) -> f64 {
        self.meters_per_row
    }
    pub fn visible_samples(&self) -> usize {
        self.visible_samples
    }
    pub fn height(&self) -> usize {
        self.height
    }
    /// Always within `[0, visible_samples - 1]`, also for rows outside the canvas.
    pub fn pixel_row_to_sample_index(&self, y: f64) -> usize {
        let last = self.visible_samples - 1;
        if self.height <= 1 || !y.is_finite() {
            return 0;
        }
        let idx = (y * self.visible_samples as f64 / (self.height - 1) as f64).floor();
        if idx <= 0.0 {
            0
        } else {
            (idx as usize).min(last)
        }
    }
    pub fn sample_index_to_pixel_row(&self, idx: usize) -> usize {
        if self.visible_samples > 1 && self.height > 0 {
            (idx as f64 * (self.height - 1) as f64 / (self.visible_samples - 1) as f64).round()
                as usize
        } else {
            0
        }
    }
    /// Depth under a pixel row, rounded for display.
    pub fn pixel_row_to_depth(&self, y: f64) -> f64 {
        round2(self.sample_index_to_depth(self.pixel_row_to_sample_index(y)))
    }
    pub fn depth_to_pixel_row(&self, depth: f64) -> usize {
        self.sample_index_to_pixel_row(self.depth_to_sample_index(depth))
    }
    /// Negative depths map to the surface sample.
    pub fn depth_to_sample_index(&self, depth: f64) -> usize {
        let idx = (depth / self.meters_per_row).round();
        if idx.is_finite() && idx > 0.0 {
            idx as usize
        } else {
            0
        }
    }
    /// Full precision; callers that display it round with [`round2`].
    pub fn sample_index_to_depth(&self, idx: usize) -> f64 {
        idx as f64 * self.meters_per_row
    }
}
