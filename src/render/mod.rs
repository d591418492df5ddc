// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! PNG line charts of price series
//!
//! [`ChartRenderer`] draws sample index against price as a single connected
//! line, with a title, a legend, axis labels and min/max price ticks, and encodes the
//! result as PNG. Text uses a built-in bitmap font so the output is
//! byte-identical across machines.
//!
//! Rendering is CPU-bound; async callers should run it on the blocking pool
//! (see [`MarketDataService::get_chart`](crate::MarketDataService::get_chart)).

use tiny_skia::{
    Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use crate::errors::RenderError;
use crate::spans;
use crate::types::symbol::Symbol;

mod font;

/// Canvas size, colors and layout of a chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Price line color
    pub line_color: Color,
    /// Price line width in pixels
    pub line_width: f32,
    pub background: Color,
    /// Color of labels and axes
    pub foreground: Color,
    /// Color of the min/max guide lines
    pub grid: Color,
    /// Space reserved around the plot area: left, right, top, bottom
    pub margins: [u32; 4],
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            line_color: Color::from_rgba8(31, 174, 233, 255),
            line_width: 2.0,
            background: Color::WHITE,
            foreground: Color::from_rgba8(60, 60, 60, 255),
            grid: Color::from_rgba8(225, 225, 225, 255),
            margins: [90, 24, 44, 48],
        }
    }
}

/// Plot area in canvas pixels
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl PlotArea {
    fn from_style(style: &ChartStyle) -> Option<Self> {
        let [left, right, top, bottom] = style.margins;
        let width = style.width.checked_sub(left + right).filter(|w| *w > 0)?;
        let height = style.height.checked_sub(top + bottom).filter(|h| *h > 0)?;
        Some(Self {
            left: left as f32,
            top: top as f32,
            width: width as f32,
            height: height as f32,
        })
    }

    fn right(&self) -> f32 {
        self.left + self.width
    }

    fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Maps (index, price) to canvas pixels
#[derive(Debug, Clone, Copy)]
struct ValueMapper {
    area: PlotArea,
    last_index: usize,
    lo: f64,
    hi: f64,
}

impl ValueMapper {
    /// `lo..hi` is the finite data range; it is padded so the line stays off
    /// the plot edges and a flat range still has height
    fn new(area: PlotArea, len: usize, lo: f64, hi: f64) -> Self {
        let span = hi - lo;
        let pad = if span > f64::EPSILON * hi.abs().max(1.0) {
            span * 0.05
        } else if hi.abs() > 0.0 {
            hi.abs() * 0.05
        } else {
            1.0
        };
        Self {
            area,
            last_index: len.saturating_sub(1),
            lo: lo - pad,
            hi: hi + pad,
        }
    }

    fn x(&self, index: usize) -> f32 {
        if self.last_index == 0 {
            return self.area.left;
        }
        self.area.left + (index as f64 / self.last_index as f64) as f32 * self.area.width
    }

    fn y(&self, value: f64) -> f32 {
        let t = (self.hi - value) / (self.hi - self.lo);
        self.area.top + t as f32 * self.area.height
    }
}

/// Renders price series to PNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderer {
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Render `samples` for `symbol` as a PNG
    ///
    /// Non-finite samples are skipped. A series with a single finite sample,
    /// or with all samples equal, is drawn as a horizontal line.
    ///
    /// # Errors
    ///
    /// - [`RenderError::EmptySeries`] if there is no finite sample to draw
    /// - [`RenderError::Failed`] if the canvas cannot hold the layout or the
    ///   PNG cannot be encoded
    pub fn render(&self, symbol: &Symbol, samples: &[f64]) -> Result<Vec<u8>, RenderError> {
        let span = spans::render_chart(symbol, samples.len());
        let _guard = span.enter();

        let empty = || RenderError::EmptySeries {
            symbol: symbol.to_string(),
        };

        let (lo, hi) = finite_range(samples).ok_or_else(empty)?;

        let area = PlotArea::from_style(&self.style)
            .ok_or_else(|| RenderError::failed("canvas too small for chart margins"))?;
        let mut pixmap = Pixmap::new(self.style.width, self.style.height)
            .ok_or_else(|| RenderError::failed("invalid canvas size"))?;
        pixmap.fill(self.style.background);

        let mapper = ValueMapper::new(area, samples.len(), lo, hi);

        self.draw_frame(&mut pixmap, area, &mapper, lo, hi);
        self.draw_series(&mut pixmap, area, &mapper, samples);
        self.draw_labels(&mut pixmap, area, &mapper, symbol, lo, hi);

        pixmap
            .encode_png()
            .map_err(|e| RenderError::failed(format!("PNG encoding failed: {e}")))
    }

    fn draw_frame(&self, pixmap: &mut Pixmap, area: PlotArea, mapper: &ValueMapper, lo: f64, hi: f64) {
        let grid = solid(self.style.grid, false);
        for value in [lo, hi] {
            let y = mapper.y(value).round();
            fill_rect(pixmap, area.left, y, area.width, 1.0, &grid);
        }

        let axis = solid(self.style.foreground, false);
        fill_rect(pixmap, area.left - 1.0, area.top, 1.0, area.height + 1.0, &axis);
        fill_rect(pixmap, area.left - 1.0, area.bottom(), area.width + 1.0, 1.0, &axis);
    }

    fn draw_series(&self, pixmap: &mut Pixmap, area: PlotArea, mapper: &ValueMapper, samples: &[f64]) {
        let mut points = samples
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| (mapper.x(i), mapper.y(*v)));

        let mut builder = PathBuilder::new();
        let Some((x0, y0)) = points.next() else {
            return;
        };
        builder.move_to(x0, y0);

        let mut segments = 0;
        for (x, y) in points {
            builder.line_to(x, y);
            segments += 1;
        }
        if segments == 0 {
            builder = PathBuilder::new();
            builder.move_to(area.left, y0);
            builder.line_to(area.right(), y0);
        }

        let Some(path) = builder.finish() else {
            return;
        };

        let stroke = Stroke {
            width: self.style.line_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(
            &path,
            &solid(self.style.line_color, true),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    fn draw_labels(
        &self,
        pixmap: &mut Pixmap,
        area: PlotArea,
        mapper: &ValueMapper,
        symbol: &Symbol,
        lo: f64,
        hi: f64,
    ) {
        let paint = solid(self.style.foreground, false);

        let title = format!("{} Price (Last 24h)", symbol.display_upper());
        let scale = 2;
        let x = (self.style.width as f32 - font::text_width(&title, scale) as f32) / 2.0;
        draw_text(pixmap, &title, x, 12.0, scale, &paint);

        let label = "Time";
        let x = area.left + (area.width - font::text_width(label, 1) as f32) / 2.0;
        draw_text(pixmap, label, x, area.bottom() + 22.0, 1, &paint);

        let label = "Price (USD)";
        let y = area.top + (area.height + font::text_width(label, 1) as f32) / 2.0;
        draw_text_vertical(pixmap, label, 8.0, y, 1, &paint);

        let glyph_mid = (font::GLYPH_HEIGHT / 2) as f32;

        let (swatch_x, swatch_y) = legend_swatch(area);
        let swatch = solid(self.style.line_color, false);
        fill_rect(pixmap, swatch_x, swatch_y, LEGEND_SWATCH, self.style.line_width.max(1.0), &swatch);
        draw_text(
            pixmap,
            LEGEND_LABEL,
            swatch_x + LEGEND_SWATCH + 6.0,
            swatch_y - glyph_mid,
            1,
            &paint,
        );

        for value in [hi, lo] {
            let text = format_price(value);
            let x = area.left - 6.0 - font::text_width(&text, 1) as f32;
            let y = mapper.y(value).round() - glyph_mid;
            draw_text(pixmap, &text, x, y, 1, &paint);
            if hi == lo {
                break;
            }
        }
    }
}

const LEGEND_LABEL: &str = "Price";
const LEGEND_SWATCH: f32 = 20.0;

/// Top-left corner of the legend's line sample, inside the plot's top-right
fn legend_swatch(area: PlotArea) -> (f32, f32) {
    let label = font::text_width(LEGEND_LABEL, 1) as f32;
    let x = area.right() - 8.0 - label - 6.0 - LEGEND_SWATCH;
    (x.round(), (area.top + 10.0).round())
}

/// Smallest and largest finite sample
fn finite_range(samples: &[f64]) -> Option<(f64, f64)> {
    samples
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn solid(color: Color, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = anti_alias;
    paint
}

fn fill_rect(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, paint: &Paint<'_>) {
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        pixmap.fill_rect(rect, paint, Transform::identity(), None);
    }
}

/// Draw `text` left to right with its top-left corner at (x, y)
fn draw_text(pixmap: &mut Pixmap, text: &str, x: f32, y: f32, scale: u32, paint: &Paint<'_>) {
    let x = x.round();
    let y = y.round();
    let s = scale as f32;
    for (i, c) in text.chars().enumerate() {
        let origin = x + (i as u32 * font::ADVANCE * scale) as f32;
        for (col, row) in font::lit_pixels(c) {
            fill_rect(pixmap, origin + col as f32 * s, y + row as f32 * s, s, s, paint);
        }
    }
}

/// Draw `text` bottom to top, rotated a quarter turn counter-clockwise,
/// starting at (x, y) which is the bottom-left corner of the first glyph
fn draw_text_vertical(
    pixmap: &mut Pixmap,
    text: &str,
    x: f32,
    y: f32,
    scale: u32,
    paint: &Paint<'_>,
) {
    let x = x.round();
    let y = y.round();
    let s = scale as f32;
    for (i, c) in text.chars().enumerate() {
        let origin = y - (i as u32 * font::ADVANCE * scale) as f32;
        for (col, row) in font::lit_pixels(c) {
            fill_rect(
                pixmap,
                x + row as f32 * s,
                origin - (col + 1) as f32 * s,
                s,
                s,
                paint,
            );
        }
    }
}

/// Tick label for a price, e.g. `$37,000.50` or `$0.000123`
fn format_price(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    if abs >= 1.0 {
        let fixed = format!("{abs:.2}");
        let (int, frac) = fixed.split_once('.').unwrap_or((&fixed, "00"));
        return format!("{sign}${}.{frac}", group_thousands(int));
    }

    let fixed = format!("{abs:.8}");
    let trimmed = fixed.trim_end_matches('0');
    let trimmed = if trimmed.len() < 4 {
        &fixed[..4]
    } else {
        trimmed
    };
    format!("{sign}${trimmed}")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
