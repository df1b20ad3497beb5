// File: crates/logview-render-skia/src/lib.rs
// Summary: Skia CPU raster renderer: keeps chart option sets per handle and
//          draws them (or a whole correlation panel) to PNG.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use skia_safe as skia;
use tracing::debug;

use logview_core::config::Rgba;
use logview_core::correlation::{CorrelationPanel, RULER_WIDTH};
use logview_core::error::ChartError;
use logview_core::renderer::{ChartOptions, RendererAdapter, RendererHandle, SeriesKind};
use logview_core::scale::AxisScale;
use logview_core::types::{ContainerSize, DataPoint, Insets, PlotRect};

pub struct RasterStyle {
    pub background: skia::Color,
    pub grid: skia::Color,
    pub axis: skia::Color,
    pub text: skia::Color,
    pub cursor: skia::Color,
    pub well_top: skia::Color,
    /// Must match the insets of the charts drawn through this renderer.
    pub insets: Insets,
    pub draw_labels: bool,
}

impl Default for RasterStyle {
    fn default() -> Self {
        Self {
            background: skia::Color::from_argb(255, 18, 18, 20),
            grid: skia::Color::from_argb(255, 40, 40, 45),
            axis: skia::Color::from_argb(255, 180, 180, 190),
            text: skia::Color::from_argb(255, 210, 210, 220),
            cursor: skia::Color::from_argb(220, 255, 255, 255),
            well_top: skia::Color::from_argb(255, 255, 200, 60),
            insets: Insets::default(),
            draw_labels: true,
        }
    }
}

struct RasterChart {
    size: ContainerSize,
    options: ChartOptions,
    cursor: Option<DataPoint>,
}

/// Headless backend: `init`/`set_option` store state, `render_*` draws it.
#[derive(Default)]
pub struct SkiaRasterRenderer {
    style: RasterStyle,
    next: u64,
    charts: HashMap<u64, RasterChart>,
}

impl SkiaRasterRenderer {
    pub fn new() -> Self { Self::default() }

    pub fn with_style(style: RasterStyle) -> Self {
        Self { style, ..Self::default() }
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.style.insets = insets;
        self
    }

    pub fn style(&self) -> &RasterStyle { &self.style }
    pub fn live_charts(&self) -> usize { self.charts.len() }

    pub fn options(&self, handle: RendererHandle) -> Option<&ChartOptions> {
        self.charts.get(&handle.0).map(|c| &c.options)
    }

    /// Draw one chart into PNG bytes.
    pub fn render_png_bytes(&self, handle: RendererHandle) -> Result<Vec<u8>> {
        let chart = self.charts.get(&handle.0).ok_or(ChartError::UnknownHandle(handle.0))?;
        let mut surface = raster_surface(chart.size)?;
        let canvas = surface.canvas();
        canvas.clear(self.style.background);
        self.draw_chart(canvas, chart, true);
        encode_png(&mut surface)
    }

    pub fn render_png(&self, handle: RendererHandle, output_png_path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.render_png_bytes(handle)?;
        write_file(output_png_path.as_ref(), &bytes)
    }

    /// Compose every track of `panel` side by side, with the depth ruler on
    /// the left and the shared overlays on top.
    pub fn render_panel_png_bytes(&self, panel: &CorrelationPanel) -> Result<Vec<u8>> {
        let size = panel.size();
        let mut surface = raster_surface(size)?;
        let canvas = surface.canvas();
        canvas.clear(self.style.background);

        let top = panel.insets().top as f32;
        let bottom = top + panel.track_height();
        self.draw_ruler(canvas, panel, top);

        for slot in panel.layout() {
            let Some(chart) = slot.handle.and_then(|h| self.charts.get(&h.0)) else {
                debug!(chart = %slot.chart_id, "track not built yet, left blank");
                continue;
            };
            canvas.save();
            canvas.translate((slot.x_offset, 0.0));
            self.draw_chart(canvas, chart, false);
            canvas.restore();
        }

        if let Some(overlay) = panel.overlay() {
            let top_paint = stroke_paint(self.style.well_top, 1.5);
            let text = text_paint(self.style.text);
            let font = label_font(11.0);
            for well in &overlay.wells {
                for line in &well.tops {
                    let y = top + line.y_px;
                    canvas.draw_line((well.x_offset, y), (well.x_offset + well.width, y), &top_paint);
                    if let (Some(label), true) = (&line.label, self.style.draw_labels) {
                        canvas.draw_str(label, (well.x_offset + 4.0, y - 3.0), &font, &text);
                    }
                }
                if self.style.draw_labels {
                    canvas.draw_str(&well.name, (well.x_offset + 4.0, top - 2.0), &font, &text);
                }
            }
            if let Some(line) = &overlay.crosshair {
                let y = top + line.y_px;
                if y <= bottom {
                    canvas.draw_line((RULER_WIDTH, y), (size.width, y), &stroke_paint(self.style.cursor, 1.0));
                }
            }
        }
        encode_png(&mut surface)
    }

    pub fn render_panel_png(&self, panel: &CorrelationPanel, output_png_path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.render_panel_png_bytes(panel)?;
        write_file(output_png_path.as_ref(), &bytes)
    }

    fn draw_ruler(&self, canvas: &skia::Canvas, panel: &CorrelationPanel, top: f32) {
        let tick = stroke_paint(self.style.axis, 1.0);
        let text = text_paint(self.style.text);
        let font = label_font(11.0);
        let right = RULER_WIDTH - 2.0;
        canvas.draw_line((right, top), (right, top + panel.track_height()), &tick);
        for t in panel.depth_ruler(6) {
            let y = top + t.y_px;
            canvas.draw_line((right - 6.0, y), (right, y), &tick);
            if self.style.draw_labels {
                canvas.draw_str(format!("{:.0}", t.depth), (4.0, y + 4.0), &font, &text);
            }
        }
    }

    fn draw_chart(&self, canvas: &skia::Canvas, chart: &RasterChart, with_cursor: bool) {
        let rect = PlotRect::from_container(chart.size, &self.style.insets);
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let opts = &chart.options;
        let sx = AxisScale::horizontal(&opts.x_axis, rect.left, rect.right);
        let sy = AxisScale::vertical(&opts.y_axis, rect.top, rect.bottom);

        draw_grid(canvas, &rect, self.style.grid);
        draw_axes(canvas, &rect, self.style.axis);
        if self.style.draw_labels {
            let text = text_paint(self.style.text);
            let font = label_font(12.0);
            canvas.draw_str(&opts.x_axis.label, (rect.left, rect.top - 6.0), &font, &text);
            canvas.draw_str(format!("{:.2}", opts.x_axis.min), (rect.left, rect.bottom + 14.0), &font, &text);
            canvas.draw_str(format!("{:.2}", opts.x_axis.max), (rect.right - 36.0, rect.bottom + 14.0), &font, &text);
        }

        canvas.save();
        canvas.clip_rect(skia::Rect::from_ltrb(rect.left, rect.top, rect.right, rect.bottom), skia::ClipOp::Intersect, true);
        for s in &opts.series {
            match s.kind {
                SeriesKind::Line => {
                    if let [p] = s.points.as_slice() {
                        // a one-sample segment has no extent; mark it
                        let mut dot = skia::Paint::default();
                        dot.set_anti_alias(true);
                        dot.set_color(color(s.style.color));
                        canvas.draw_circle((sx.to_px(p.x), sy.to_px(p.y)), s.style.width.max(1.0), &dot);
                        continue;
                    }
                    if s.points.is_empty() {
                        continue;
                    }
                    let mut path = skia::Path::new();
                    let p0 = s.points[0];
                    path.move_to((sx.to_px(p0.x), sy.to_px(p0.y)));
                    for p in s.points.iter().skip(1) {
                        path.line_to((sx.to_px(p.x), sy.to_px(p.y)));
                    }
                    canvas.draw_path(&path, &stroke_paint(color(s.style.color), s.style.width));
                }
                SeriesKind::Scatter => {
                    let mut dot = skia::Paint::default();
                    dot.set_anti_alias(true);
                    dot.set_style(skia::paint::Style::Fill);
                    dot.set_color(color(s.style.color));
                    let radius = s.style.width.max(1.0) + 0.5;
                    for (i, p) in s.points.iter().enumerate() {
                        if let (Some(values), Some(overlay)) = (&s.color_values, &opts.color_overlay) {
                            if let Some(&v) = values.get(i) {
                                dot.set_color(color(overlay.color_for(v)));
                            }
                        }
                        canvas.draw_circle((sx.to_px(p.x), sy.to_px(p.y)), radius, &dot);
                    }
                }
            }
        }
        if let (true, Some(c)) = (with_cursor, chart.cursor) {
            let cursor = stroke_paint(self.style.cursor, 1.0);
            let y = sy.to_px(c.y);
            canvas.draw_line((rect.left, y), (rect.right, y), &cursor);
        }
        canvas.restore();
    }
}

impl RendererAdapter for SkiaRasterRenderer {
    fn init(&mut self, size: ContainerSize, options: &ChartOptions) -> logview_core::Result<RendererHandle> {
        if !size.is_renderable() {
            return Err(ChartError::ZeroSizedContainer { width: size.width, height: size.height });
        }
        self.next += 1;
        self.charts.insert(self.next, RasterChart { size, options: options.clone(), cursor: None });
        debug!(handle = self.next, width = size.width, height = size.height, "raster chart created");
        Ok(RendererHandle(self.next))
    }

    fn set_option(&mut self, handle: RendererHandle, options: &ChartOptions) -> logview_core::Result<()> {
        let chart = self.charts.get_mut(&handle.0).ok_or(ChartError::UnknownHandle(handle.0))?;
        chart.options = options.clone();
        Ok(())
    }

    fn resize(&mut self, handle: RendererHandle, size: ContainerSize) -> logview_core::Result<()> {
        let chart = self.charts.get_mut(&handle.0).ok_or(ChartError::UnknownHandle(handle.0))?;
        chart.size = size;
        Ok(())
    }

    fn show_cursor(&mut self, handle: RendererHandle, position: Option<DataPoint>) -> logview_core::Result<()> {
        let chart = self.charts.get_mut(&handle.0).ok_or(ChartError::UnknownHandle(handle.0))?;
        chart.cursor = position;
        Ok(())
    }

    fn dispose(&mut self, handle: RendererHandle) {
        if self.charts.remove(&handle.0).is_some() {
            debug!(handle = handle.0, "raster chart disposed");
        }
    }
}

// ---- helpers ----------------------------------------------------------------

fn raster_surface(size: ContainerSize) -> Result<skia::Surface> {
    let (w, h) = (size.width.round() as i32, size.height.round() as i32);
    skia::surfaces::raster_n32_premul((w, h)).ok_or_else(|| anyhow!("failed to create {w}x{h} raster surface"))
}

fn encode_png(surface: &mut skia::Surface) -> Result<Vec<u8>> {
    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

fn write_file(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
}

fn color(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.3, c.0, c.1, c.2)
}

fn stroke_paint(c: skia::Color, width: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint.set_color(c);
    paint
}

fn text_paint(c: skia::Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_color(c);
    paint
}

fn label_font(size: f32) -> skia::Font {
    let mut font = skia::Font::default();
    font.set_size(size);
    font
}

fn draw_grid(canvas: &skia::Canvas, rect: &PlotRect, c: skia::Color) {
    let paint = stroke_paint(c, 1.0);
    for i in 0..=4 {
        let x = rect.left + rect.width() * i as f32 / 4.0;
        canvas.draw_line((x, rect.top), (x, rect.bottom), &paint);
    }
    for i in 0..=10 {
        let y = rect.top + rect.height() * i as f32 / 10.0;
        canvas.draw_line((rect.left, y), (rect.right, y), &paint);
    }
}

fn draw_axes(canvas: &skia::Canvas, rect: &PlotRect, c: skia::Color) {
    let paint = stroke_paint(c, 1.5);
    canvas.draw_line((rect.left, rect.top), (rect.right, rect.top), &paint);
    canvas.draw_line((rect.left, rect.top), (rect.left, rect.bottom), &paint);
}
