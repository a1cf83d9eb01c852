use log::debug;
use crate::drivers::colormap::Colormap;
use crate::drivers::gain::GainWindow;
use crate::drivers::mapping::CoordinateMapper;
use crate::drivers::source::StreamMessage;
use crate::drivers::stats::RunningStats;
pub type Rgba = [u8; 4];
pub const BACKGROUND: Rgba = [0, 0, 0, 255];
/// Colour of the measured-depth marker.
pub const MARKER: Rgba = [255, 0, 0, 255];
/// Fixed-size RGBA image that scrolls one column left per insert.
///
/// Column 0 is the oldest visible column, `width - 1` the newest. Every pixel
/// always holds a colour; a fresh buffer is filled with [`BACKGROUND`].
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>, // row-major, 4 bytes per pixel
}
impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let mut pixels = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            pixels.extend_from_slice(&BACKGROUND);
        }
        Self {
            width,
            height,
            pixels,
        }
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.pixels[i..i + 4]);
        Some(out)
    }
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }
    /// Move every column one pixel left in place; the last column keeps its old
    /// contents until it is repainted.
    pub fn shift_left(&mut self) {
        if self.width < 2 {
            return;
        }
        let stride = self.width * 4;
        for row in self.pixels.chunks_exact_mut(stride) {
            row.copy_within(4.., 0);
        }
    }
    pub fn clear(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&BACKGROUND);
        }
    }
}
/// Owns the frame buffer and paints one incoming column per message.
pub struct ColumnRenderer {
    frame: FrameBuffer,
}
impl ColumnRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            frame: FrameBuffer::new(width, height),
        }
    }
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
    /// Reallocate for a new viewport size. Scroll history is discarded.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.frame.size() == (width, height) {
            return;
        }
        debug!(
            "frame buffer {}x{} -> {}x{}",
            self.frame.width, self.frame.height, width, height
        );
        self.frame = FrameBuffer::new(width, height);
    }
    pub fn clear(&mut self) {
        self.frame.clear();
    }
    /// Feed the statistics, scroll, and paint the newest column.
    ///
    /// `mapper` must be built for this buffer's height. Only the new column is
    /// coloured with the updated gain; older columns keep the colours they were
    /// drawn with.
    pub fn insert_column(
        &mut self,
        column: &StreamMessage,
        mapper: &CoordinateMapper,
        stats: &mut RunningStats,
        colormap: &dyn Colormap,
    ) {
        stats.observe(column.spectrogram.iter().copied());
        if self.frame.width == 0 {
            return;
        }
        self.frame.shift_left();
        let gain = GainWindow::from_stats(stats);
        let x = self.frame.width - 1;
        let meters_per_row = mapper.meters_per_row();
        for y in 0..self.frame.height {
            let sample_idx = mapper.pixel_row_to_sample_index(y as f64);
            let sample_depth = mapper.sample_index_to_depth(sample_idx);
            let on_marker = column
                .measured_depth
                .is_some_and(|depth| marks_measured_depth(depth, sample_depth, meters_per_row));
            let color = if on_marker {
                MARKER
            } else {
                let [r, g, b] = colormap.evaluate(gain.normalize(column.sample(sample_idx)));
                [r, g, b, 255]
            };
            self.frame.set_pixel(x, y, color);
        }
    }
}
/// A row is part of the marker when its depth is within 1.5 rows of the measurement.
pub fn marks_measured_depth(measured_depth: f64, sample_depth: f64, meters_per_row: f64) -> bool {
    (measured_depth - sample_depth).abs() < meters_per_row * 1.5
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::colormap::Palette;
    use crate::drivers::DisplayConfig;
    struct Gray;
    impl Colormap for Gray {
        fn evaluate(&self, value: f64) -> [u8; 3] {
            let g = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
            [g, g, g]
        }
    }
    fn column(values: &[f64], depth: Option<f64>) -> StreamMessage {
        StreamMessage {
            spectrogram: values.iter().copied().map(Some).collect(),
            measured_depth: depth,
            ..StreamMessage::default()
        }
    }
    fn tagged(x: usize) -> Rgba {
        [x as u8, 100, 200, 255]
    }
    #[test]
    fn shift_moves_every_column_left() {
        let mut frame = FrameBuffer::new(4, 3);
        for x in 0..4 {
            for y in 0..3 {
                frame.set_pixel(x, y, tagged(x));
            }
        }
        frame.shift_left();
        for y in 0..3 {
            assert_eq!(frame.pixel(0, y), Some(tagged(1)));
            assert_eq!(frame.pixel(2, y), Some(tagged(3)));
            assert_eq!(frame.pixel(3, y), Some(tagged(3)));
        }
    }
    #[test]
    fn inserts_preserve_older_columns_shifted() {
        let (width, height) = (8, 5);
        let mut renderer = ColumnRenderer::new(width, height);
        for x in 0..width {
            for y in 0..height {
                renderer.frame.set_pixel(x, y, tagged(x));
            }
        }
        let mapper = DisplayConfig::new().mapper(height);
        let mut stats = RunningStats::new();
        let k = 3;
        for _ in 0..k {
            renderer.insert_column(&column(&[1.0, 2.0, 3.0], None), &mapper, &mut stats, &Gray);
        }
        let frame = renderer.frame();
        assert_eq!(frame.size(), (width, height));
        for x in 0..width - k {
            for y in 0..height {
                assert_eq!(frame.pixel(x, y), Some(tagged(x + k)));
            }
        }
        for x in width - k..width {
            for y in 0..height {
                let px = frame.pixel(x, y).unwrap();
                assert_eq!(px[0], px[1], "column {x} should be freshly painted");
            }
        }
    }
    #[test]
    fn full_scroll_replaces_every_column() {
        let (width, height) = (6, 4);
        let mut renderer = ColumnRenderer::new(width, height);
        let mapper = DisplayConfig::new().mapper(height);
        let mut stats = RunningStats::new();
        for i in 0..width + 2 {
            renderer.insert_column(&column(&[i as f64; 4], None), &mapper, &mut stats, &Gray);
        }
        let frame = renderer.frame();
        assert_eq!(frame.as_rgba().len(), width * height * 4);
        for x in 0..width {
            for y in 0..height {
                let px = frame.pixel(x, y).unwrap();
                assert_eq!(px[3], 255);
                assert_eq!(px[0], px[1]);
            }
        }
    }
    #[test]
    fn marker_tolerance_is_one_and_a_half_rows() {
        assert!(marks_measured_depth(4.0, 4.1, 0.2));
        assert!(!marks_measured_depth(4.0, 4.4, 0.2));
    }
    #[test]
    fn paints_marker_at_measured_depth() {
        let mut config = DisplayConfig::new();
        config.set_resolution(100.0).unwrap();
        config.zoom.observe_depth(20.0);
        // 20 samples over 20 rows: row y shows sample floor(y * 20 / 19).
        let height = 20;
        let mapper = config.mapper(height);
        let mut renderer = ColumnRenderer::new(3, height);
        let mut stats = RunningStats::new();
        let values: Vec<f64> = (0..20).map(|v| v as f64).collect();
        renderer.insert_column(&column(&values, Some(10.0)), &mapper, &mut stats, &Palette::Viridis);
        let frame = renderer.frame();
        for y in 0..height {
            let depth = mapper.sample_index_to_depth(mapper.pixel_row_to_sample_index(y as f64));
            let px = frame.pixel(2, y).unwrap();
            if (depth - 10.0).abs() < 1.5 {
                assert_eq!(px, MARKER, "row {y}");
            } else {
                assert_ne!(px, MARKER, "row {y}");
            }
        }
    }
    #[test]
    fn short_column_is_zero_filled_and_only_present_values_counted() {
        let height = 50;
        let mapper = DisplayConfig::new().mapper(height);
        assert!(mapper.visible_samples() > 4);
        let mut renderer = ColumnRenderer::new(2, height);
        let mut stats = RunningStats::new();
        let short = StreamMessage {
            spectrogram: vec![Some(10.0), None, Some(30.0)],
            ..StreamMessage::default()
        };
        renderer.insert_column(&short, &mapper, &mut stats, &Gray);
        assert_eq!(stats.count(), 2);
        assert!((stats.mean_value() - 20.0).abs() < 1e-12);
        let gain = GainWindow::from_stats(&stats);
        let zero_level = Gray.evaluate(gain.normalize(0.0));
        let bottom = renderer.frame().pixel(1, height - 1).unwrap();
        assert_eq!(&bottom[..3], &zero_level[..]);
    }
    #[test]
    fn resize_reallocates_and_clears() {
        let mut renderer = ColumnRenderer::new(4, 4);
        renderer.frame.set_pixel(3, 3, MARKER);
        renderer.resize(4, 4);
        assert_eq!(renderer.frame().pixel(3, 3), Some(MARKER));
        renderer.resize(10, 2);
        assert_eq!(renderer.frame().size(), (10, 2));
        assert!(renderer
            .frame()
            .as_rgba()
            .chunks_exact(4)
            .all(|px| px == BACKGROUND));
    }
    #[test]
    fn zero_width_buffer_still_updates_statistics() {
        let mut renderer = ColumnRenderer::new(0, 10);
        let mapper = DisplayConfig::new().mapper(10);
        let mut stats = RunningStats::new();
        renderer.insert_column(&column(&[1.0, 2.0], None), &mapper, &mut stats, &Gray);
        assert_eq!(stats.count(), 2);
    }
}
