//! Area chart of one metric over time, drawn with `plotters` into an SVG
//! string.
//!
//! Missing samples (`None`) are dropped from the series but keep their slot
//! on the x axis, so the line connects straight across gaps. The gradient
//! fill and per-point tooltips are spliced into the drawn SVG as markup.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use maud::{html, Markup, PreEscaped, Render};
use plotters::prelude::*;
use tracing::warn;

use crate::ChartPoint;

// ---

const VIEW_WIDTH: u32 = 600;
const Y_TICKS: usize = 5;
const X_LABELS: usize = 8;
const FALLBACK_COLOR: RGBColor = RGBColor(0x3b, 0x82, 0xf6);
const LABEL_COLOR: RGBColor = RGBColor(0x64, 0x74, 0x8b);
const AXIS_COLOR: RGBColor = RGBColor(0xcb, 0xd5, 0xe1);
const GRID_COLOR: RGBAColor = RGBAColor(0, 0, 0, 0.075);

static CHART_SEQ: AtomicU64 = AtomicU64::new(0);

/// Header statistics over the defined samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendStats {
    /// Last defined value, `0.0` if none.
    pub latest: f64,
    /// Mean of defined values, `0.0` if none.
    pub average: f64,
}

impl TrendStats {
    pub fn from_points(points: &[ChartPoint]) -> Self {
        // ---
        let values: Vec<f64> = points.iter().filter_map(|p| p.value).collect();
        if values.is_empty() {
            return Self {
                latest: 0.0,
                average: 0.0,
            };
        }
        Self {
            latest: values[values.len() - 1],
            average: values.iter().sum::<f64>() / values.len() as f64,
        }
    }
}

/// Padded `[min, max]` of the values; `[0, 1]` when there are none.
fn value_domain(values: impl Iterator<Item = f64>) -> (f64, f64) {
    // ---
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.1;
    let lo = if lo >= 0.0 { (lo - pad).max(0.0) } else { lo - pad };
    (lo, hi + pad)
}

/// `#rrggbb` to a plotters color.
fn parse_hex(color: &str) -> Option<RGBColor> {
    // ---
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Insert `overlay` just before the closing `</svg>`.
fn splice_overlay(mut svg: String, overlay: &str) -> String {
    // ---
    let at = svg.rfind("</svg>").unwrap_or(svg.len());
    svg.insert_str(at, overlay);
    svg
}

fn format_tick(value: f64) -> String {
    // ---
    if value.abs() >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Chart configuration plus its samples.
pub struct TrendChart<'a> {
    points: &'a [ChartPoint],
    color: &'a str,
    unit: &'a str,
    height: u32,
    title: Option<&'a str>,
    y_label: Option<&'a str>,
    show_header: bool,
    gradient_id: String,
}

impl<'a> TrendChart<'a> {
    pub fn new(points: &'a [ChartPoint]) -> Self {
        // ---
        let seq = CHART_SEQ.fetch_add(1, Ordering::Relaxed);
        Self {
            points,
            color: "#3b82f6",
            unit: "",
            height: 200,
            title: None,
            y_label: None,
            show_header: true,
            gradient_id: format!("chart-gradient-{}", seq),
        }
    }

    pub fn color(mut self, color: &'a str) -> Self {
        self.color = color;
        self
    }

    pub fn unit(mut self, unit: &'a str) -> Self {
        self.unit = unit;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title).filter(|t| !t.is_empty());
        self
    }

    pub fn y_label(mut self, label: &'a str) -> Self {
        self.y_label = Some(label);
        self
    }

    pub fn show_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }

    pub fn stats(&self) -> TrendStats {
        TrendStats::from_points(self.points)
    }

    pub fn gradient_id(&self) -> &str {
        &self.gradient_id
    }

    fn plot_id(&self) -> String {
        format!("{}-plot", self.gradient_id)
    }

    fn header(&self, title: &str) -> Markup {
        // ---
        let stats = self.stats();
        html! {
            div.chart-head {
                span.strong { (title) }
                span {
                    span.chart-stat {
                        span.dot style={ "background:" (self.color) } {}
                        span.muted { "Latest:" }
                        span.strong { (format!("{:.2}", stats.latest)) " " (self.unit) }
                    }
                    span.chart-stat {
                        span.dot style="background:rgba(37,99,235,.4)" {}
                        span.muted { "Avg:" }
                        span.strong { (format!("{:.2}", stats.average)) " " (self.unit) }
                    }
                }
            }
        }
    }

    /// Grid, axes, area and line through plotters; returns the overlay
    /// markup positioned with the chart's own coordinate mapping.
    fn draw(&self, buf: &mut String) -> Result<Markup> {
        // ---
        let n = self.points.len();
        let defined: Vec<(f64, f64)> = self
            .points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.value.map(|v| (i as f64, v)))
            .collect();

        let (y_min, y_max) = value_domain(defined.iter().map(|(_, v)| *v));
        let x_range = if n <= 1 {
            -1.0..1.0
        } else {
            0.0..(n - 1) as f64
        };
        let color = parse_hex(self.color).unwrap_or(FALLBACK_COLOR);

        let x_label = |x: &f64| {
            let slot = x.round();
            if (x - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            self.points
                .get(slot as usize)
                .map(|p| p.date.format("%b %-d").to_string())
                .unwrap_or_default()
        };
        let y_tick = |y: &f64| format_tick(*y);

        let root = SVGBackend::with_string(buf, (VIEW_WIDTH, self.height)).into_drawing_area();
        let mut chart = ChartBuilder::on(&root)
            .margin_top(10i32)
            .margin_right(10i32)
            .x_label_area_size(26u32)
            .y_label_area_size(if self.y_label.is_some() { 52u32 } else { 44u32 })
            .build_cartesian_2d(x_range.clone(), y_min..y_max)?;

        {
            let mut mesh = chart.configure_mesh();
            mesh.disable_x_mesh()
                .light_line_style(TRANSPARENT)
                .bold_line_style(GRID_COLOR.stroke_width(1))
                .axis_style(AXIS_COLOR)
                .x_labels(X_LABELS)
                .y_labels(Y_TICKS)
                .x_label_formatter(&x_label)
                .y_label_formatter(&y_tick)
                .label_style(("sans-serif", 10).into_font().color(&LABEL_COLOR))
                .axis_desc_style(("sans-serif", 9).into_font().color(&LABEL_COLOR));
            if let Some(label) = self.y_label {
                mesh.y_desc(label);
            }
            mesh.draw()?;
        }

        if !defined.is_empty() {
            chart.draw_series(AreaSeries::new(defined.iter().copied(), y_min, color.filled()))?;
            chart.draw_series(LineSeries::new(defined.iter().copied(), color.stroke_width(2)))?;
        }

        let markers: Vec<((i32, i32), &ChartPoint)> = self
            .points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.value.map(|v| (chart.backend_coord(&(i as f64, v)), p)))
            .collect();
        let center = chart.backend_coord(&(
            (x_range.start + x_range.end) / 2.0,
            (y_min + y_max) / 2.0,
        ));
        root.present()?;

        let rules = format!(
            "#{plot} polygon{{fill:url(#{grad});fill-opacity:1}}#{plot} line{{stroke-dasharray:3 3}}",
            plot = self.plot_id(),
            grad = self.gradient_id,
        );

        Ok(html! {
            defs {
                linearGradient id=(self.gradient_id) x1="0" y1="0" x2="0" y2="1" {
                    stop offset="5%" stop-color=(self.color) stop-opacity="0.7" {}
                    stop offset="60%" stop-color=(self.color) stop-opacity="0.3" {}
                    stop offset="95%" stop-color=(self.color) stop-opacity="0.1" {}
                }
            }
            style { (PreEscaped(rules)) }
            @if markers.is_empty() {
                text.empty x=(center.0) y=(center.1)
                    text-anchor="middle" font-size="12" fill="#94a3b8" { "No data" }
            }
            @for ((x, y), point) in &markers {
                circle.point cx=(x) cy=(y) r="3" fill=(self.color) stroke="#fff" stroke-width="1" {
                    title {
                        (point.date.format("%b %-d").to_string()) ": "
                        (format!("{:.2}", point.value.unwrap_or_default())) " " (self.unit)
                    }
                }
            }
        })
    }

    fn svg(&self) -> Result<String> {
        // ---
        let mut buf = String::new();
        let overlay = self.draw(&mut buf)?;
        Ok(splice_overlay(buf, &overlay.into_string()))
    }
}

impl Render for TrendChart<'_> {
    fn render(&self) -> Markup {
        // ---
        let plot = match self.svg() {
            Ok(svg) => PreEscaped(svg),
            Err(e) => {
                warn!("Chart {} failed to draw: {}", self.gradient_id, e);
                PreEscaped(String::new())
            }
        };

        html! {
            div.chart {
                @if self.show_header {
                    @if let Some(title) = self.title {
                        (self.header(title))
                    }
                }
                div.chart-plot id=(self.plot_id()) style={ "height:" (self.height) "px" } {
                    (plot)
                }
            }
        }
    }
}
