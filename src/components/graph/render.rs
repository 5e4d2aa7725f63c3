//! Canvas rendering for the node graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background and grid (screen space)
//! 2. Connections, then the link being drawn (world space)
//! 3. Nodes in draw order, each with its anchors

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::anchor::AnchorSide;
use super::config::GraphConfig;
use super::layout::connection_curve;
use super::state::{AnchorRef, GraphState};
use super::theme::Style;
use super::types::GraphNode;
use super::vector::Vec2;

/// Grid spacing in world units.
const GRID_SPACING: f64 = 40.0;
/// Grid lines closer than this many pixels are skipped.
const GRID_MIN_PX: f64 = 8.0;
const LABEL_PX: f64 = 14.0;
const ANCHOR_LABEL_PX: f64 = 11.0;
const CONNECTION_WIDTH: f64 = 2.5;

/// Renders the complete graph to the canvas.
pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d, config: &GraphConfig) {
	let style = &config.style;
	let size = state.size;

	ctx.set_fill_style_str(&style.primary.stringify());
	ctx.fill_rect(0.0, 0.0, size.width, size.height);
	draw_grid(state, ctx, style);

	ctx.save();
	// Same mapping as world_to_camera followed by camera_to_offset.
	let camera = state.camera;
	let _ = ctx.translate(size.width * 0.5, size.height * 0.5);
	let _ = ctx.scale(camera.zoom, camera.zoom);
	let _ = ctx.translate(-camera.position.x, -camera.position.y);

	draw_connections(state, ctx, config);
	draw_pending_link(state, ctx, config);
	for node in &state.data.nodes {
		draw_node(state, ctx, config, node);
	}

	ctx.restore();
}

/// World-space grid spacing for `zoom`, doubled until lines are at least
/// [`GRID_MIN_PX`] apart on screen. `None` when zoom is zero or not finite.
fn grid_spacing(zoom: f64) -> Option<f64> {
	let zoom = zoom.abs();
	if !zoom.is_finite() || zoom == 0.0 {
		return None;
	}
	let mut spacing = GRID_SPACING;
	while spacing * zoom < GRID_MIN_PX {
		spacing *= 2.0;
	}
	Some(spacing)
}

fn draw_grid(state: &GraphState, ctx: &CanvasRenderingContext2d, style: &Style) {
	let size = state.size;
	let Some(spacing) = grid_spacing(state.camera.zoom) else {
		return;
	};

	let (Ok(corner_a), Ok(corner_b)) = (
		state.camera.offset_to_world(Vec2::ZERO, &size),
		state
			.camera
			.offset_to_world(Vec2::new(size.width, size.height), &size),
	) else {
		return;
	};
	let top_left = Vec2::new(corner_a.x.min(corner_b.x), corner_a.y.min(corner_b.y));
	let bottom_right = Vec2::new(corner_a.x.max(corner_b.x), corner_a.y.max(corner_b.y));

	ctx.set_stroke_style_str(&style.grid_color.stringify());
	ctx.set_line_width(1.0);
	ctx.begin_path();

	let mut x = (top_left.x / spacing).floor() * spacing;
	while x <= bottom_right.x {
		let sx = state.camera.world_to_offset(Vec2::new(x, 0.0), &size).x.round() + 0.5;
		ctx.move_to(sx, 0.0);
		ctx.line_to(sx, size.height);
		x += spacing;
	}
	let mut y = (top_left.y / spacing).floor() * spacing;
	while y <= bottom_right.y {
		let sy = state.camera.world_to_offset(Vec2::new(0.0, y), &size).y.round() + 0.5;
		ctx.move_to(0.0, sy);
		ctx.line_to(size.width, sy);
		y += spacing;
	}
	ctx.stroke();
}

fn stroke_curve(ctx: &CanvasRenderingContext2d, from: Vec2, to: Vec2) {
	let (c1, c2) = connection_curve(from, to);
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y);
	ctx.stroke();
}

fn draw_connections(state: &GraphState, ctx: &CanvasRenderingContext2d, config: &GraphConfig) {
	ctx.set_line_width(CONNECTION_WIDTH);
	for c in &state.data.connections {
		let Ok((from_node, from)) = state.data.anchor(&c.from_node_id, &c.from_anchor_id) else {
			continue;
		};
		let Ok((to_node, to)) = state.data.anchor(&c.to_node_id, &c.to_anchor_id) else {
			continue;
		};
		let (Some(p1), Some(p2)) = (
			state.metrics.anchor_position(from_node, from),
			state.metrics.anchor_position(to_node, to),
		) else {
			continue;
		};
		ctx.set_stroke_style_str(&config.anchor_color(&from.kind).stringify());
		stroke_curve(ctx, p1, p2);
	}
}

fn draw_pending_link(state: &GraphState, ctx: &CanvasRenderingContext2d, config: &GraphConfig) {
	let Some(link) = &state.link else {
		return;
	};
	let Some(start) = state.anchor_position(&link.from) else {
		return;
	};

	let dash = 8.0 / state.camera.zoom;
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(dash * 0.5),
	));
	ctx.set_stroke_style_str(&config.style.accent.stringify());
	ctx.set_line_width(CONNECTION_WIDTH);
	match link.side {
		AnchorSide::Output => stroke_curve(ctx, start, link.end),
		AnchorSide::Input => stroke_curve(ctx, link.end, start),
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Path for a rectangle with rounded corners.
fn rounded_rect(ctx: &CanvasRenderingContext2d, pos: Vec2, size: Vec2, radius: f64) {
	let r = radius.min(size.x * 0.5).min(size.y * 0.5).max(0.0);
	let (x, y, w, h) = (pos.x, pos.y, size.x, size.y);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_node(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	config: &GraphConfig,
	node: &GraphNode,
) {
	let style = &config.style;
	let metrics = &state.metrics;
	let size = metrics.node_size(node);
	let header = Vec2::new(size.x, metrics.header_height);

	// body
	rounded_rect(ctx, node.position, size, style.node_radius);
	ctx.set_fill_style_str(&style.node_color.stringify());
	ctx.fill();

	// header, squared off where it meets the body
	let header_radius = style.node_radius.min(header.y * 0.5);
	rounded_rect(ctx, node.position, header, header_radius);
	ctx.set_fill_style_str(&config.node_header_color(&node.node_type).stringify());
	ctx.fill();
	ctx.fill_rect(
		node.position.x,
		node.position.y + header.y * 0.5,
		header.x,
		header.y * 0.5,
	);

	if state.drag.node_id.as_deref() == Some(node.id.as_str()) {
		rounded_rect(ctx, node.position, size, style.node_radius);
		ctx.set_stroke_style_str(&style.accent.stringify());
		ctx.set_line_width(2.0 / state.camera.zoom);
		ctx.stroke();
	}

	ctx.set_fill_style_str(&style.text_color.stringify());
	ctx.set_font(&style.font_at(LABEL_PX));
	ctx.set_text_baseline("middle");
	ctx.set_text_align("left");
	let _ = ctx.fill_text(
		&node.label,
		node.position.x + 12.0,
		node.position.y + header.y * 0.5,
	);

	ctx.set_font(&style.font_at(ANCHOR_LABEL_PX));
	for (anchor, pos) in metrics.anchor_positions(node) {
		let hovered = state.hovered.as_ref().is_some_and(|h: &AnchorRef| {
			h.node_id == node.id && h.anchor_id == anchor.id
		});
		let radius = if hovered {
			metrics.anchor_radius * 1.3
		} else {
			metrics.anchor_radius
		};

		ctx.begin_path();
		let _ = ctx.arc(pos.x, pos.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&config.anchor_color(&anchor.kind).stringify());
		ctx.fill();
		if hovered {
			ctx.set_stroke_style_str(&style.text_color.stringify());
			ctx.set_line_width(1.5 / state.camera.zoom);
			ctx.stroke();
		}

		let text = match (anchor.side, anchor.val.display()) {
			(AnchorSide::Input, Some(val)) => format!("{} = {}", anchor.id, val),
			_ => anchor.id.clone(),
		};
		ctx.set_fill_style_str(&style.text_color.with_alpha(0.8).stringify());
		let inset = metrics.anchor_radius + 6.0;
		match anchor.side {
			AnchorSide::Input => {
				ctx.set_text_align("left");
				let _ = ctx.fill_text(&text, pos.x + inset, pos.y);
			}
			AnchorSide::Output => {
				ctx.set_text_align("right");
				let _ = ctx.fill_text(&text, pos.x - inset, pos.y);
			}
		}
	}
}
