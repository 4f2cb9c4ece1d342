//! Request volume chart
//!
//! The chart is redrawn from scratch each time: [`draw`] turns a snapshot and
//! the canvas size into a flat list of primitives, and the canvas backend in
//! `components::logs::chart` replays them. Nothing here touches the DOM.
//!
//! Buckets are spaced evenly along the x-axis regardless of the time between
//! them, so a gap of several quiet minutes is not visible.

use crate::aggregate::AggregateSnapshot;

pub const GRID_COLOR: &str = "#e1e8f2";
pub const LINE_COLOR: &str = "#0d63d6";
pub const MUTED_TEXT_COLOR: &str = "#64748b";
pub const AREA_TOP_COLOR: &str = "rgba(13, 99, 214, 0.26)";
pub const AREA_BOTTOM_COLOR: &str = "rgba(13, 99, 214, 0.02)";
pub const EMPTY_MESSAGE: &str = "No telemetry data";

const GRID_LINES: usize = 4;

/// Canvas size as laid out by the browser
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartSurface {
    /// Width in CSS pixels
    pub css_width: f64,
    /// Height in CSS pixels
    pub css_height: f64,
    pub device_pixel_ratio: f64,
}

impl ChartSurface {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            css_width,
            css_height,
            device_pixel_ratio,
        }
    }

    /// Pixel ratio, falling back to 1 for nonsense values
    pub fn dpr(&self) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }

    /// Backing store size in device pixels, never zero
    pub fn backing_size(&self) -> (u32, u32) {
        let dpr = self.dpr();
        (device_pixels(self.css_width * dpr), device_pixels(self.css_height * dpr))
    }
}

fn device_pixels(value: f64) -> u32 {
    if value.is_finite() {
        value.floor().clamp(1.0, u32::MAX as f64) as u32
    } else {
        1
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Two-stop gradient running from `top` to `bottom`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalGradient {
    pub top: f64,
    pub bottom: f64,
    pub top_color: &'static str,
    pub bottom_color: &'static str,
}

/// A single drawing primitive
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Wipe the whole surface
    Clear { width: f64, height: f64 },

    /// Straight stroked segment
    Line {
        from: Point,
        to: Point,
        color: &'static str,
        width: f64,
    },

    /// Closed polygon filled with a gradient
    FillArea {
        outline: Vec<Point>,
        gradient: VerticalGradient,
    },

    /// Open stroked path through the points
    Polyline {
        points: Vec<Point>,
        color: &'static str,
        width: f64,
    },

    /// Filled circle
    Dot {
        center: Point,
        radius: f64,
        color: &'static str,
    },

    /// Text with its baseline at `at`
    Text {
        text: &'static str,
        at: Point,
        font: String,
        color: &'static str,
    },
}

/// Everything needed to paint one frame
#[derive(Clone, Debug, PartialEq)]
pub struct ChartFrame {
    /// Backing store width in device pixels
    pub width: u32,
    /// Backing store height in device pixels
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl ChartFrame {
    /// Data points, in bucket order
    pub fn points(&self) -> Vec<Point> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Dot { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }
}

struct Padding {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl Padding {
    fn scaled(dpr: f64) -> Self {
        Self {
            top: 14.0 * dpr,
            right: 16.0 * dpr,
            bottom: 18.0 * dpr,
            left: 16.0 * dpr,
        }
    }
}

/// Lay out the histogram for the given surface
///
/// With no snapshot, or a snapshot without buckets, the frame only carries a
/// short message.
pub fn draw(snapshot: Option<&AggregateSnapshot>, surface: &ChartSurface) -> ChartFrame {
    let dpr = surface.dpr();
    let (width_px, height_px) = surface.backing_size();
    let (width, height) = (f64::from(width_px), f64::from(height_px));
    let padding = Padding::scaled(dpr);

    let mut commands = vec![DrawCommand::Clear { width, height }];

    let buckets = snapshot.map(|s| s.buckets.as_slice()).unwrap_or_default();
    if buckets.is_empty() {
        commands.push(DrawCommand::Text {
            text: EMPTY_MESSAGE,
            at: Point::new(padding.left, padding.top + 14.0 * dpr),
            font: format!("{}px sans-serif", 12.0 * dpr),
            color: MUTED_TEXT_COLOR,
        });
        return ChartFrame {
            width: width_px,
            height: height_px,
            commands,
        };
    }

    let inner_width = width - padding.left - padding.right;
    let inner_height = height - padding.top - padding.bottom;
    let baseline = height - padding.bottom;

    for line in 0..=GRID_LINES {
        let y = padding.top + (inner_height / GRID_LINES as f64) * line as f64;
        commands.push(DrawCommand::Line {
            from: Point::new(padding.left, y),
            to: Point::new(width - padding.right, y),
            color: GRID_COLOR,
            width: 1.0,
        });
    }

    let peak = snapshot.map(AggregateSnapshot::peak).unwrap_or(1) as f64;
    let x_step = if buckets.len() > 1 {
        inner_width / (buckets.len() - 1) as f64
    } else {
        inner_width
    };

    let points: Vec<Point> = buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| {
            Point::new(
                padding.left + x_step * index as f64,
                padding.top + inner_height - (bucket.count as f64 / peak) * inner_height,
            )
        })
        .collect();

    // Both ends exist: `buckets` is non-empty.
    let (first_x, last_x) = (points[0].x, points[points.len() - 1].x);
    let mut outline = points.clone();
    outline.push(Point::new(last_x, baseline));
    outline.push(Point::new(first_x, baseline));

    commands.push(DrawCommand::FillArea {
        outline,
        gradient: VerticalGradient {
            top: padding.top,
            bottom: baseline,
            top_color: AREA_TOP_COLOR,
            bottom_color: AREA_BOTTOM_COLOR,
        },
    });
    commands.push(DrawCommand::Polyline {
        points: points.clone(),
        color: LINE_COLOR,
        width: 2.0 * dpr,
    });
    commands.extend(points.into_iter().map(|center| DrawCommand::Dot {
        center,
        radius: 2.5 * dpr,
        color: LINE_COLOR,
    }));

    ChartFrame {
        width: width_px,
        height: height_px,
        commands,
    }
}
