use log::{debug, info};
use crate::drivers::axis::{depth_ticks, measured_depth_label, range_label, CursorReadout, DepthTick};
use crate::drivers::colormap::Colormap;
use crate::drivers::config::DisplayConfig;
use crate::drivers::error::SpectrogramError;
use crate::drivers::mapping::CoordinateMapper;
use crate::drivers::scroll::{ColumnRenderer, FrameBuffer};
use crate::drivers::source::StreamMessage;
use crate::drivers::stats::RunningStats;
use crate::drivers::zoom::ZoomMode;
/// Latest instrument telemetry that rides along with the columns.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Telemetry {
    pub measured_depth: Option<f64>,
    pub temperature: Option<f64>,
    pub drive_voltage: Option<f64>,
}
/// Sole owner of the display state: configuration, statistics and the
/// scrolling frame buffer. Every handler (stream, pointer, zoom, resize) goes
/// through `&mut self`, so one update always completes before the next starts.
pub struct SpectrogramSession {
    config: DisplayConfig,
    stats: RunningStats,
    renderer: ColumnRenderer,
    colormap: Box<dyn Colormap + Send>,
    telemetry: Telemetry,
    ticks: Vec<DepthTick>,
    columns_drawn: u64,
}
impl SpectrogramSession {
    pub fn new(width: usize, height: usize, colormap: Box<dyn Colormap + Send>) -> Self {
        let config = DisplayConfig::new();
        let ticks = depth_ticks(&config.mapper(height));
        Self {
            config,
            stats: RunningStats::new(),
            renderer: ColumnRenderer::new(width, height),
            colormap,
            telemetry: Telemetry::default(),
            ticks,
            columns_drawn: 0,
        }
    }
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }
    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }
    pub fn frame(&self) -> &FrameBuffer {
        self.renderer.frame()
    }
    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }
    pub fn ticks(&self) -> &[DepthTick] {
        &self.ticks
    }
    pub fn columns_drawn(&self) -> u64 {
        self.columns_drawn
    }
    pub fn zoom_mode(&self) -> ZoomMode {
        self.config.zoom.mode()
    }
    pub fn range_label(&self) -> String {
        range_label(self.config.visible_range_m())
    }
    pub fn depth_label(&self) -> String {
        measured_depth_label(self.telemetry.measured_depth)
    }
    pub fn mapper(&self) -> CoordinateMapper {
        self.config.mapper(self.frame().height())
    }
    /// Apply one stream message. An invalid resolution drops the whole update
    /// before anything is touched.
    pub fn handle_message(&mut self, message: &StreamMessage) -> Result<(), SpectrogramError> {
        if let Some(resolution) = message.resolution {
            self.config.set_resolution(resolution)?;
        }
        if let Some(depth) = message.measured_depth {
            if self.config.zoom.observe_depth(depth) {
                info!(
                    "auto range -> {} m (max depth {:.2} m)",
                    self.config.visible_range_m(),
                    self.config.zoom.max_measured_depth()
                );
            }
        }
        self.telemetry = Telemetry {
            measured_depth: message.measured_depth,
            temperature: message.temperature,
            drive_voltage: message.drive_voltage,
        };
        let mapper = self.mapper();
        self.renderer
            .insert_column(message, &mapper, &mut self.stats, self.colormap.as_ref());
        self.columns_drawn += 1;
        self.ticks = depth_ticks(&mapper);
        Ok(())
    }
    pub fn zoom_in(&mut self) -> bool {
        let changed = self.config.zoom.zoom_in();
        self.after_zoom(changed);
        changed
    }
    pub fn zoom_out(&mut self) -> bool {
        let changed = self.config.zoom.zoom_out();
        self.after_zoom(changed);
        changed
    }
    fn after_zoom(&mut self, changed: bool) {
        if changed {
            info!("manual range -> {} m", self.config.visible_range_m());
            self.ticks = depth_ticks(&self.mapper());
        }
    }
    /// Viewport changed size: reallocate, losing the scroll history.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.frame().size() == (width, height) {
            return;
        }
        debug!("viewport resized to {width}x{height}");
        self.renderer.resize(width, height);
        self.ticks = depth_ticks(&self.mapper());
    }
    pub fn clear(&mut self) {
        self.renderer.clear();
    }
    /// Swap the colour strategy; columns already drawn keep their colours.
    pub fn set_colormap(&mut self, colormap: Box<dyn Colormap + Send>) {
        self.colormap = colormap;
    }
    pub fn cursor(&self, y: Option<f64>) -> CursorReadout {
        CursorReadout::from_pointer(&self.mapper(), y)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::colormap::Palette;
    use crate::drivers::scroll::BACKGROUND;
    fn message(resolution: f64, depth: f64, len: usize) -> StreamMessage {
        StreamMessage {
            spectrogram: (0..len).map(|i| Some(i as f64)).collect(),
            measured_depth: Some(depth),
            resolution: Some(resolution),
            ..StreamMessage::default()
        }
    }
    fn session(width: usize, height: usize) -> SpectrogramSession {
        SpectrogramSession::new(width, height, Box::new(Palette::Viridis))
    }
    #[test]
    fn auto_range_follows_deepest_measurement() {
        let mut s = session(10, 100);
        s.handle_message(&message(100.0, 5.0, 40)).unwrap();
        assert_eq!(s.config().visible_range_m(), 5.0);
        assert_eq!(s.config().visible_sample_count(), 5);
        s.handle_message(&message(100.0, 25.0, 40)).unwrap();
        assert_eq!(s.config().visible_range_m(), 40.0);
        assert_eq!(s.range_label(), "0-40");
        s.handle_message(&message(100.0, 2.0, 40)).unwrap();
        assert_eq!(s.config().visible_range_m(), 40.0);
        assert_eq!(s.depth_label(), "Depth: 2m");
        assert_eq!(s.ticks().last().map(|t| t.depth_m), Some(40.0));
    }
    #[test]
    fn invalid_resolution_drops_the_update() {
        let mut s = session(4, 20);
        s.handle_message(&message(100.0, 3.0, 10)).unwrap();
        let before = s.frame().clone();
        let count = s.stats().count();
        let err = s.handle_message(&message(0.0, 30.0, 10)).unwrap_err();
        assert!(matches!(err, SpectrogramError::InvalidResolution(_)));
        assert_eq!(s.frame().as_rgba(), before.as_rgba());
        assert_eq!(s.stats().count(), count);
        assert_eq!(s.config().zoom.max_measured_depth(), 3.0);
        assert_eq!(s.config().resolution_cm_per_sample(), 100.0);
        assert_eq!(s.columns_drawn(), 1);
    }
    #[test]
    fn missing_resolution_keeps_the_previous_one() {
        let mut s = session(4, 20);
        s.handle_message(&message(2.0, 1.0, 10)).unwrap();
        let mut next = message(2.0, 1.0, 10);
        next.resolution = None;
        s.handle_message(&next).unwrap();
        assert_eq!(s.config().resolution_cm_per_sample(), 2.0);
    }
    #[test]
    fn manual_zoom_freezes_auto_range() {
        let mut s = session(4, 50);
        s.handle_message(&message(100.0, 8.0, 10)).unwrap();
        assert_eq!(s.config().visible_range_m(), 10.0);
        assert!(s.zoom_in());
        assert_eq!(s.zoom_mode(), ZoomMode::Manual);
        assert_eq!(s.ticks().last().map(|t| t.depth_m), Some(5.0));
        s.handle_message(&message(100.0, 35.0, 10)).unwrap();
        assert_eq!(s.config().visible_range_m(), 5.0);
        assert!(!s.zoom_in());
    }
    #[test]
    fn resize_discards_history_but_keeps_statistics() {
        let mut s = session(8, 8);
        s.handle_message(&message(100.0, 1.0, 8)).unwrap();
        let count = s.stats().count();
        s.resize(16, 4);
        assert_eq!(s.frame().size(), (16, 4));
        assert_eq!(s.stats().count(), count);
        assert_eq!(s.frame().pixel(15, 0), Some(BACKGROUND));
    }
    #[test]
    fn tiny_positive_resolution_is_rendered() {
        let mut s = session(4, 400);
        s.handle_message(&message(1.0e-17, 2.0, 10)).unwrap();
        assert_eq!(s.columns_drawn(), 1);
        assert_eq!(s.ticks().len(), 5);
        assert!(s.ticks().iter().all(|t| t.row < 400));
    }
    #[test]
    fn cursor_uses_current_mapping() {
        let mut s = session(4, 41);
        s.handle_message(&message(100.0, 9.0, 10)).unwrap();
        // 10 samples over rows 0..=40.
        assert_eq!(s.cursor(Some(40.0)).label, "Cursor: 9.00 m");
        assert_eq!(s.cursor(None).row, None);
    }
}
