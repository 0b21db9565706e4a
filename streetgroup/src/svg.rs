use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StreetError};
use crate::geometry::bbox::Bbox;
use crate::geometry::limits;
use crate::model::{Color, Polyline, StreetRecord};

pub const DEFAULT_TITLE: &str = "Street Grouping Algorithm Result";

// Rough number of grid lines per axis
const GRID_TARGET_LINES: f64 = 5.0;
const GRID_MAX_LINES: i64 = 64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgOptions {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub stroke_width: f64,
    pub background: Option<String>,
    pub title: Option<String>,
    /// Coordinate grid with tick labels behind the streets
    pub grid: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        SvgOptions {
            width: 3000.0,
            height: 3000.0,
            padding: 20.0,
            stroke_width: 1.2,
            background: Some("#ffffff".to_string()),
            title: Some(DEFAULT_TITLE.to_string()),
            grid: false,
        }
    }
}

impl SvgOptions {
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if !v.is_finite() {
                return Err(StreetError::non_finite(name));
            }
            if !limits::in_canvas_bounds(v) {
                return Err(StreetError::out_of_range(name, 1.0, limits::CANVAS_MAX as f64, v));
            }
        }
        let half = self.width.min(self.height) / 2.0;
        if !self.padding.is_finite() {
            return Err(StreetError::non_finite("padding"));
        }
        if self.padding < 0.0 || self.padding >= half {
            return Err(StreetError::out_of_range("padding", 0.0, half, self.padding));
        }
        if !self.stroke_width.is_finite() {
            return Err(StreetError::non_finite("stroke_width"));
        }
        if self.stroke_width <= 0.0 || self.stroke_width > half {
            return Err(StreetError::out_of_range("stroke_width", 0.0, half, self.stroke_width));
        }
        Ok(())
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// Trim float noise from path data
fn num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 { "0".to_string() } else { format!("{}", r) }
}

/// Path data in source coordinates.
pub fn polyline_path(line: &Polyline) -> String {
    polyline_path_with(line, |x, y| (x, y))
}

fn polyline_path_with(line: &Polyline, map: impl Fn(f64, f64) -> (f64, f64)) -> String {
    let mut d = String::new();
    for (k, p) in line.points.iter().enumerate() {
        let (x, y) = map(p.x, p.y);
        let _ = write!(d, "{}{} {}", if k == 0 { "M " } else { " L " }, num(x), num(y));
    }
    d
}

// 1, 2 or 5 times a power of ten, close to span / target
fn nice_step(span: f64, target: f64) -> f64 {
    let raw = span / target;
    let mag = 10f64.powf(raw.log10().floor());
    let m = match raw / mag {
        f if f < 1.5 => 1.0,
        f if f < 3.5 => 2.0,
        f if f < 7.5 => 5.0,
        _ => 10.0,
    };
    m * mag
}

/// Grid positions inside `[lo, hi]` and the number of decimals their labels need.
fn grid_ticks(lo: f64, hi: f64) -> (Vec<f64>, usize) {
    let span = hi - lo;
    if !(span > 0.0) {
        return (Vec::new(), 0);
    }
    let step = nice_step(span, GRID_TARGET_LINES);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    if last < first || last.saturating_sub(first) > GRID_MAX_LINES {
        return (Vec::new(), 0);
    }
    let decimals = (-step.log10().floor()).clamp(0.0, 12.0) as usize;
    ((first..=last).map(|k| k as f64 * step).collect(), decimals)
}

fn write_grid(out: &mut String, b: &Bbox, map: impl Fn(f64, f64) -> (f64, f64), font: f64) {
    let (left, bottom) = map(b.min_x, b.min_y);
    let (right, top) = map(b.max_x, b.max_y);
    let (xs, x_dec) = grid_ticks(b.min_x, b.max_x);
    let (ys, y_dec) = grid_ticks(b.min_y, b.max_y);

    out.push_str("  <g stroke=\"#d0d0d0\" stroke-width=\"0.6\">\n");
    for &x in &xs {
        let (px, _) = map(x, b.min_y);
        let _ = writeln!(out, r#"    <line x1="{}" y1="{}" x2="{}" y2="{}"/>"#, num(px), num(top), num(px), num(bottom));
    }
    for &y in &ys {
        let (_, py) = map(b.min_x, y);
        let _ = writeln!(out, r#"    <line x1="{}" y1="{}" x2="{}" y2="{}"/>"#, num(left), num(py), num(right), num(py));
    }
    out.push_str("  </g>\n");

    let _ = writeln!(out, r##"  <g font-family="sans-serif" font-size="{}" fill="#333333">"##, num(font));
    for &x in &xs {
        let (px, _) = map(x, b.min_y);
        let _ = writeln!(
            out,
            r#"    <text x="{}" y="{}" text-anchor="middle">{:.*}</text>"#,
            num(px), num(bottom + font * 1.2), x_dec, x
        );
    }
    for &y in &ys {
        let (_, py) = map(b.min_x, y);
        let _ = writeln!(
            out,
            r#"    <text x="{}" y="{}" text-anchor="end">{:.*}</text>"#,
            num(left - font * 0.4), num(py + font * 0.35), y_dec, y
        );
    }
    out.push_str("  </g>\n");
}

fn drawable(rec: &StreetRecord) -> Option<&Polyline> {
    rec.polyline().filter(|l| l.len() >= 2)
}

/// Full SVG document. North is up and both axes share one scale.
/// `colors[i]` strokes record `i`; missing entries fall back to black.
pub fn render_svg(records: &[StreetRecord], colors: &[Color], opts: &SvgOptions) -> String {
    let bounds = records
        .iter()
        .filter_map(drawable)
        .fold(None, |acc, l| Bbox::union(acc, Bbox::of_polyline(l)));

    let (w, h, pad) = (opts.width, opts.height, opts.padding);
    let title_band = if opts.title.is_some() { (h * 0.02).clamp(12.0, 60.0) } else { 0.0 };
    let avail_w = (w - 2.0 * pad).max(1.0);
    let avail_h = (h - 2.0 * pad - title_band).max(1.0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        num(w), num(h), num(w), num(h)
    );
    if let Some(bg) = &opts.background {
        let _ = writeln!(out, r#"  <rect width="100%" height="100%" fill="{}"/>"#, escape_xml(bg));
    }
    if let Some(title) = &opts.title {
        let _ = writeln!(
            out,
            r#"  <text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="{}">{}</text>"#,
            num(w / 2.0), num(pad + title_band * 0.8), num(title_band * 0.8), escape_xml(title)
        );
    }

    if let Some(b) = bounds {
        let span_x = b.width();
        let span_y = b.height();
        let scale = match (span_x > 0.0, span_y > 0.0) {
            (true, true) => (avail_w / span_x).min(avail_h / span_y),
            (true, false) => avail_w / span_x,
            (false, true) => avail_h / span_y,
            (false, false) => 1.0,
        };
        // Center the drawing inside the available area
        let off_x = pad + (avail_w - span_x * scale) / 2.0;
        let off_y = pad + title_band + (avail_h - span_y * scale) / 2.0;
        let map = |x: f64, y: f64| (off_x + (x - b.min_x) * scale, off_y + (b.max_y - y) * scale);

        if opts.grid {
            write_grid(&mut out, &b, map, (h * 0.008).clamp(8.0, 24.0));
        }

        let _ = writeln!(
            out,
            r#"  <g fill="none" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round">"#,
            num(opts.stroke_width)
        );
        for (i, rec) in records.iter().enumerate() {
            let Some(line) = drawable(rec) else { continue };
            let color = colors.get(i).copied().unwrap_or(Color { r: 0, g: 0, b: 0, a: 255 });
            let opacity = if color.a == 255 {
                String::new()
            } else {
                format!(r#" stroke-opacity="{}""#, num(color.a as f64 / 255.0))
            };
            let _ = writeln!(
                out,
                r#"    <path data-index="{}" stroke="{}"{} d="{}"/>"#,
                i,
                color.to_hex(),
                opacity,
                polyline_path_with(line, map)
            );
        }
        out.push_str("  </g>\n");
    }
    out.push_str("</svg>\n");
    out
}
