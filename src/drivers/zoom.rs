use crate::drivers::config::DEPTH_RANGES_M;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ZoomMode {
    /// Follow the deepest measured depth seen so far.
    #[default]
    Auto,
    /// The user picked a range; it sticks until the next zoom click.
    Manual,
}
impl ZoomMode {
    pub fn label(&self) -> &'static str {
        match self {
            ZoomMode::Auto => "AUTO",
            ZoomMode::Manual => "MANUAL",
        }
    }
}
/// Visible depth range selection over [`DEPTH_RANGES_M`].
///
/// There is no way back from `Manual` to `Auto`.
#[derive(Clone, Debug, Default)]
pub struct ZoomState {
    mode: ZoomMode,
    index: usize,
    max_measured_depth: f64,
}
impl ZoomState {
    pub fn mode(&self) -> ZoomMode {
        self.mode
    }
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn range_m(&self) -> f64 {
        DEPTH_RANGES_M[self.index]
    }
    pub fn max_measured_depth(&self) -> f64 {
        self.max_measured_depth
    }
    /// Raise the high-water mark and, in `Auto`, reselect the range.
    /// Returns true when the visible range changed.
    pub fn observe_depth(&mut self, depth: f64) -> bool {
        if depth.is_finite() && depth > self.max_measured_depth {
            self.max_measured_depth = depth;
        }
        self.refresh()
    }
    fn refresh(&mut self) -> bool {
        if self.mode == ZoomMode::Manual {
            return false;
        }
        let next = auto_index(self.max_measured_depth);
        let changed = next != self.index;
        self.index = next;
        changed
    }
    /// Step to the next shallower range. No-op at the first entry.
    pub fn zoom_in(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.mode = ZoomMode::Manual;
        true
    }
    /// Step to the next deeper range. No-op at the last entry.
    pub fn zoom_out(&mut self) -> bool {
        if self.index + 1 >= DEPTH_RANGES_M.len() {
            return false;
        }
        self.index += 1;
        self.mode = ZoomMode::Manual;
        true
    }
}
fn auto_index(max_depth: f64) -> usize {
    DEPTH_RANGES_M
        .iter()
        .position(|range| max_depth <= *range)
        .unwrap_or(DEPTH_RANGES_M.len() - 1)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::DisplayConfig;
    #[test]
    fn auto_picks_smallest_range_covering_max_depth() {
        let mut config = DisplayConfig::new();
        config.set_resolution(100.0).unwrap();
        config.zoom.observe_depth(5.0);
        assert_eq!(config.visible_range_m(), 5.0);
        config.zoom.observe_depth(15.0);
        assert_eq!(config.visible_range_m(), 20.0);
        assert_eq!(config.visible_sample_count(), 20);
        assert!(config.zoom.observe_depth(25.0));
        assert_eq!(config.visible_range_m(), 40.0);
        assert_eq!(config.visible_sample_count(), 40);
    }
    #[test]
    fn high_water_mark_never_decreases() {
        let mut zoom = ZoomState::default();
        zoom.observe_depth(12.0);
        assert!(!zoom.observe_depth(3.0));
        assert!(!zoom.observe_depth(f64::NAN));
        assert_eq!(zoom.max_measured_depth(), 12.0);
        assert_eq!(zoom.range_m(), 20.0);
    }
    #[test]
    fn clamps_to_largest_range_when_too_deep() {
        let mut zoom = ZoomState::default();
        zoom.observe_depth(120.0);
        assert_eq!(zoom.index(), DEPTH_RANGES_M.len() - 1);
    }
    #[test]
    fn manual_zoom_sticks_and_is_bounded() {
        let mut zoom = ZoomState::default();
        assert!(!zoom.zoom_in());
        assert_eq!(zoom.mode(), ZoomMode::Auto);
        assert!(zoom.zoom_out());
        assert_eq!(zoom.mode(), ZoomMode::Manual);
        assert_eq!(zoom.range_m(), 10.0);
        // Depth no longer drives the range.
        assert!(!zoom.observe_depth(35.0));
        assert_eq!(zoom.range_m(), 10.0);
        assert!(zoom.zoom_out());
        assert!(zoom.zoom_out());
        assert!(!zoom.zoom_out());
        assert_eq!(zoom.range_m(), 40.0);
        assert!(zoom.zoom_in());
        assert_eq!(zoom.range_m(), 20.0);
        assert_eq!(zoom.max_measured_depth(), 35.0);
    }
}
