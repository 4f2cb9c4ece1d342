//! Canvas backend for the request chart
//!
//! Replays [`ChartFrame`] draw commands on a 2D context. Redraws whenever the
//! snapshot changes or the window is resized.

use std::f64::consts::TAU;

use leptos::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::render::chart::{self, ChartFrame, ChartSurface, DrawCommand, Point};
use crate::state::DashboardState;

#[component]
pub fn RequestChart() -> impl IntoView {
    let state = expect_context::<DashboardState>();
    let snapshot = state.snapshot;
    let height = state.chart_height();
    let canvas_ref = create_node_ref::<html::Canvas>();

    let (resized, set_resized) = create_signal(0u32);
    let resize_handle = window_event_listener(ev::resize, move |_| {
        set_resized.update(|n| *n = n.wrapping_add(1));
    });
    on_cleanup(move || resize_handle.remove());

    create_effect(move |_| {
        resized.get();
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        let surface = ChartSurface::new(
            f64::from(canvas.client_width()),
            height,
            window().device_pixel_ratio(),
        );
        let frame = snapshot.with(|snapshot| chart::draw(snapshot.as_ref(), &surface));
        if let Err(err) = paint(&canvas, &frame) {
            tracing::warn!("chart redraw failed: {:?}", err);
        }
    });

    view! {
        <div class="bg-slate-800 rounded-xl border border-slate-700 p-4">
            <h2 class="text-sm text-slate-400 mb-2">"Requests per minute"</h2>
            <canvas
                node_ref=canvas_ref
                class="w-full block"
                style=format!("height: {}px", height)
            />
        </div>
    }
}

/// Resize the backing store if needed, then run every command in order
pub fn paint(canvas: &HtmlCanvasElement, frame: &ChartFrame) -> Result<(), JsValue> {
    if canvas.width() != frame.width {
        canvas.set_width(frame.width);
    }
    if canvas.height() != frame.height {
        canvas.set_height(frame.height);
    }

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    for command in &frame.commands {
        execute(&ctx, command)?;
    }
    Ok(())
}

#[allow(deprecated)]
fn execute(ctx: &CanvasRenderingContext2d, command: &DrawCommand) -> Result<(), JsValue> {
    match command {
        DrawCommand::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),
        DrawCommand::Line {
            from,
            to,
            color,
            width,
        } => {
            ctx.set_stroke_style(&JsValue::from_str(color));
            ctx.set_line_width(*width);
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
        }
        DrawCommand::FillArea { outline, gradient } => {
            let fill = ctx.create_linear_gradient(0.0, gradient.top, 0.0, gradient.bottom);
            fill.add_color_stop(0.0, gradient.top_color)?;
            fill.add_color_stop(1.0, gradient.bottom_color)?;
            trace(ctx, outline);
            ctx.close_path();
            ctx.set_fill_style(&fill);
            ctx.fill();
        }
        DrawCommand::Polyline {
            points,
            color,
            width,
        } => {
            trace(ctx, points);
            ctx.set_stroke_style(&JsValue::from_str(color));
            ctx.set_line_width(*width);
            ctx.stroke();
        }
        DrawCommand::Dot {
            center,
            radius,
            color,
        } => {
            ctx.begin_path();
            ctx.arc(center.x, center.y, *radius, 0.0, TAU)?;
            ctx.set_fill_style(&JsValue::from_str(color));
            ctx.fill();
        }
        DrawCommand::Text {
            text,
            at,
            font,
            color,
        } => {
            ctx.set_font(font);
            ctx.set_fill_style(&JsValue::from_str(color));
            ctx.fill_text(text, at.x, at.y)?;
        }
    }
    Ok(())
}

fn trace(ctx: &CanvasRenderingContext2d, points: &[Point]) {
    ctx.begin_path();
    let mut points = points.iter();
    if let Some(first) = points.next() {
        ctx.move_to(first.x, first.y);
    }
    for point in points {
        ctx.line_to(point.x, point.y);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::aggregate::tests::{at, entry};
    use crate::aggregate::AggregateSnapshot;
    use heimdall_shared::LogEntry;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn canvas() -> HtmlCanvasElement {
        document()
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_paint_empty_frame_sizes_backing_store() {
        let canvas = canvas();
        let frame = chart::draw(None, &ChartSurface::new(320.0, 180.0, 2.0));

        paint(&canvas, &frame).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (640, 360));
    }

    #[wasm_bindgen_test]
    fn test_paint_full_frame() {
        let entries: Vec<LogEntry> = [(0, 200), (0, 500), (1, 200), (3, 404)]
            .into_iter()
            .map(|(minute, status)| LogEntry {
                timestamp: Some(at(10, minute, 5)),
                ..entry(status, 12)
            })
            .collect();
        let snapshot = AggregateSnapshot::from_entries(&entries);
        let frame = chart::draw(Some(&snapshot), &ChartSurface::new(400.0, 180.0, 1.0));

        let canvas = canvas();
        paint(&canvas, &frame).unwrap();
        assert_eq!(canvas.width(), 400);

        // A second paint with the same size leaves the backing store alone.
        paint(&canvas, &frame).unwrap();
        assert_eq!(canvas.height(), 180);
    }
}
