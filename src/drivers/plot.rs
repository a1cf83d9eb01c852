use std::io::Cursor;
use std::ops::Range;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::*;
use crate::drivers::error::SpectrogramError;
use crate::drivers::mapping::CoordinateMapper;
use crate::drivers::scroll::FrameBuffer;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub background: RGBColor,
    pub foreground: RGBColor,
    /// Draw depth and age axes around the waterfall.
    pub with_axes: bool,
    pub margin: u32,
    pub left_label_area: u32,
    pub bottom_label_area: u32,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            background: RGBColor(10, 10, 15),
            foreground: WHITE,
            with_axes: true,
            margin: 10,
            left_label_area: 60,
            bottom_label_area: 40,
        }
    }
}
impl PlotStyle {
    fn canvas_size(&self, frame: &FrameBuffer) -> (u32, u32) {
        let (w, h) = (frame.width() as u32, frame.height() as u32);
        if self.with_axes {
            (
                w + self.left_label_area + 2 * self.margin,
                h + self.bottom_label_area + 2 * self.margin,
            )
        } else {
            (w, h)
        }
    }
}
/// Render the current waterfall to PNG. Row labels use the mapping the frame
/// is being drawn with right now.
pub fn render_waterfall_png(
    frame: &FrameBuffer,
    mapper: &CoordinateMapper,
    style: &PlotStyle,
) -> Result<Vec<u8>, SpectrogramError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(SpectrogramError::Plot("frame buffer is empty".into()));
    }
    let (width, height) = style.canvas_size(frame);
    let columns = frame.width() as f64;
    let rows = frame.height() as f64;
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    let plot_area = {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&style.background)?;
        let mut builder = ChartBuilder::on(&root);
        if style.with_axes {
            builder
                .margin(style.margin)
                .set_label_area_size(LabelAreaPosition::Left, style.left_label_area)
                .set_label_area_size(LabelAreaPosition::Bottom, style.bottom_label_area);
        }
        let mut chart = builder.build_cartesian_2d(0f64..columns, 0f64..rows)?;
        if style.with_axes {
            let depth_label = |v: &f64| format!("{:.2}", mapper.pixel_row_to_depth(rows - *v));
            let age_label = |v: &f64| format!("{}", (columns - *v).round() as i64);
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("Columns ago")
                .y_desc("Depth (m)")
                .x_label_formatter(&age_label)
                .y_label_formatter(&depth_label)
                .axis_style(&style.foreground.mix(0.5))
                .label_style(("sans-serif", 12).into_font().color(&style.foreground))
                .draw()?;
        }
        let area = chart.plotting_area().get_pixel_range();
        root.present()?;
        area
    };
    blit_frame(&mut buffer, width, frame, plot_area);
    encode_png(&buffer, width, height)
}
/// Copy the frame into the plotting area of an RGB buffer, nearest neighbour
/// when the two sizes differ. Frame row 0 (shallowest) lands on the top row.
fn blit_frame(buffer: &mut [u8], width: u32, frame: &FrameBuffer, area: (Range<i32>, Range<i32>)) {
    let (xs, ys) = area;
    let (x0, x1) = (xs.start.max(0) as usize, xs.end.max(0) as usize);
    let (y0, y1) = (ys.start.max(0) as usize, ys.end.max(0) as usize);
    let (area_w, area_h) = (x1.saturating_sub(x0), y1.saturating_sub(y0));
    if area_w == 0 || area_h == 0 {
        return;
    }
    let stride = width as usize * 3;
    let rgba = frame.as_rgba();
    for py in 0..area_h {
        let fy = py * frame.height() / area_h;
        for px in 0..area_w {
            let fx = px * frame.width() / area_w;
            let src = (fy * frame.width() + fx) * 4;
            let dst = (y0 + py) * stride + (x0 + px) * 3;
            if let (Some(from), Some(to)) = (rgba.get(src..src + 3), buffer.get_mut(dst..dst + 3)) {
                to.copy_from_slice(from);
            }
        }
    }
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, SpectrogramError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| SpectrogramError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::DisplayConfig;
    #[test]
    fn renders_frame_to_png_of_frame_size() {
        let mut frame = FrameBuffer::new(32, 24);
        for y in 0..24 {
            frame.set_pixel(31, y, [200, 40, 40, 255]);
        }
        let mapper = DisplayConfig::new().mapper(24);
        let style = PlotStyle {
            with_axes: false,
            ..PlotStyle::default()
        };
        let png = render_waterfall_png(&frame, &mapper, &style).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (32, 24));
        assert_eq!(decoded.get_pixel(31, 0).0, [200, 40, 40]);
        assert_eq!(decoded.get_pixel(30, 23).0, [0, 0, 0]);
    }
    #[test]
    fn blit_scales_into_plot_area() {
        let mut frame = FrameBuffer::new(2, 2);
        frame.set_pixel(1, 0, [255, 0, 0, 255]);
        frame.set_pixel(0, 1, [0, 0, 255, 255]);
        // 6x5 canvas, plot area x 1..5, y 1..5
        let mut buffer = vec![7u8; 6 * 5 * 3];
        blit_frame(&mut buffer, 6, &frame, (1..5, 1..5));
        let at = |x: usize, y: usize| [buffer[(y * 6 + x) * 3], buffer[(y * 6 + x) * 3 + 1], buffer[(y * 6 + x) * 3 + 2]];
        assert_eq!(at(0, 0), [7, 7, 7]);
        assert_eq!(at(1, 1), [0, 0, 0]);
        assert_eq!(at(4, 2), [255, 0, 0]);
        assert_eq!(at(3, 1), [255, 0, 0]);
        assert_eq!(at(2, 4), [0, 0, 255]);
        assert_eq!(at(5, 4), [7, 7, 7]);
    }
    #[test]
    fn empty_frame_is_an_error() {
        let frame = FrameBuffer::new(0, 10);
        let mapper = DisplayConfig::new().mapper(10);
        assert!(matches!(
            render_waterfall_png(&frame, &mapper, &PlotStyle::default()),
            Err(SpectrogramError::Plot(_))
        ));
    }
}
