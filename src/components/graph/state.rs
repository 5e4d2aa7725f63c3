//! Graph editing state and pointer interaction tracking.
//!
//! Owns the [`GraphData`] being edited together with the [`Camera`] and the
//! in-progress gesture (node drag, canvas pan, or a connection being drawn
//! from an anchor). Pointer positions arrive in offset space and are mapped
//! to world space through the [`Surface`] they were measured against.

use log::{debug, warn};

use super::anchor::{self, AnchorSide, AnchorValue};
use super::error::{GraphError, Result};
use super::layout::NodeMetrics;
use super::transform::{Camera, Surface, SurfaceSize};
use super::types::{FullConnection, GraphData};
use super::vector::Vec2;

/// Zoom multiplier applied per wheel notch.
const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Identifies one anchor on one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorRef {
	pub node_id: String,
	pub anchor_id: String,
}

impl AnchorRef {
	pub fn new(node_id: impl Into<String>, anchor_id: impl Into<String>) -> Self {
		Self {
			node_id: node_id.into(),
			anchor_id: anchor_id.into(),
		}
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_id: Option<String>,
	/// Pointer position minus node position, in world units.
	pub grab_offset: Vec2,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	/// Last pointer position in offset space.
	pub last: Vec2,
}

/// A connection being drawn from an anchor towards the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkState {
	pub from: AnchorRef,
	pub side: AnchorSide,
	/// Loose end, in world space.
	pub end: Vec2,
}

/// Editable graph plus view and gesture state.
///
/// Created once when the component mounts, then mutated by pointer events.
pub struct GraphState {
	pub data: GraphData,
	pub camera: Camera,
	pub metrics: NodeMetrics,
	pub drag: DragState,
	pub pan: PanState,
	pub link: Option<LinkState>,
	/// Anchor under the pointer, if any.
	pub hovered: Option<AnchorRef>,
	/// Last known canvas size, used by the renderer.
	pub size: SurfaceSize,
}

impl GraphState {
	pub fn new(data: GraphData, size: SurfaceSize) -> Self {
		Self {
			data,
			camera: Camera::default(),
			metrics: NodeMetrics::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			link: None,
			hovered: None,
			size,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.size = SurfaceSize::new(width, height);
	}

	/// Centre the camera on the bounding box of all nodes.
	pub fn fit_to_content(&mut self) {
		let mut nodes = self.data.nodes.iter();
		let Some(first) = nodes.next() else {
			return;
		};
		let mut min = first.position;
		let mut max = first.position + self.metrics.node_size(first);
		for node in nodes {
			let end = node.position + self.metrics.node_size(node);
			min = Vec2::new(min.x.min(node.position.x), min.y.min(node.position.y));
			max = Vec2::new(max.x.max(end.x), max.y.max(end.y));
		}
		self.camera.position = (min + max).scale(0.5);
	}

	/// Topmost node containing the world position.
	pub fn node_at(&self, world: Vec2) -> Option<&str> {
		self.data
			.nodes
			.iter()
			.rev()
			.find(|n| self.metrics.contains(n, world))
			.map(|n| n.id.as_str())
	}

	/// Anchor within hit distance of the world position. The hit radius is
	/// fixed in screen pixels, so it shrinks in world units as zoom grows.
	pub fn anchor_at(&self, world: Vec2) -> Option<AnchorRef> {
		let radius = self.metrics.anchor_hit_px / self.camera.zoom.abs();
		self.data.nodes.iter().rev().find_map(|node| {
			self.metrics
				.anchor_positions(node)
				.find(|(_, pos)| pos.distance(world) <= radius)
				.map(|(a, _)| AnchorRef::new(node.id.clone(), a.id.clone()))
		})
	}

	/// World position of an anchor's connection point.
	pub fn anchor_position(&self, anchor: &AnchorRef) -> Option<Vec2> {
		let (node, a) = self.data.anchor(&anchor.node_id, &anchor.anchor_id).ok()?;
		self.metrics.anchor_position(node, a)
	}

	/// Replace an anchor's value through the owning node.
	pub fn set_anchor_value(
		&mut self,
		anchor: &AnchorRef,
		val: impl Into<AnchorValue>,
	) -> Result<AnchorValue> {
		let node = self
			.data
			.node_mut(&anchor.node_id)
			.ok_or_else(|| GraphError::NodeNotFound(anchor.node_id.clone()))?;
		anchor::set(&mut node.anchors, &anchor.anchor_id, val)
	}

	/// Start a gesture: draw a connection from an anchor, drag a node, or pan.
	///
	/// Pressing on a connected input detaches its connection and keeps it on
	/// the pointer, so it can be dropped elsewhere.
	pub fn pointer_down<S: Surface + ?Sized>(&mut self, offset: Vec2, surface: &S) -> Result<()> {
		let world = self.camera.offset_to_world(offset, surface)?;

		if let Some(hit) = self.anchor_at(world) {
			let (_, a) = self.data.anchor(&hit.node_id, &hit.anchor_id)?;
			let side = a.side;
			let attached = self
				.data
				.connections
				.iter()
				.position(|c| c.to_node_id == hit.node_id && c.to_anchor_id == hit.anchor_id);

			self.link = Some(match (side, attached) {
				(AnchorSide::Input, Some(index)) => {
					let c = self.data.connections.remove(index);
					debug!(
						"graph: detached {}.{} from {}.{}",
						c.from_node_id, c.from_anchor_id, c.to_node_id, c.to_anchor_id
					);
					LinkState {
						from: AnchorRef::new(c.from_node_id, c.from_anchor_id),
						side: AnchorSide::Output,
						end: world,
					}
				}
				_ => LinkState {
					from: hit,
					side,
					end: world,
				},
			});
			return Ok(());
		}

		if let Some(id) = self.node_at(world).map(str::to_string) {
			self.data.bring_to_front(&id);
			if let Some(node) = self.data.node(&id) {
				self.drag.grab_offset = world - node.position;
			}
			debug!("graph: dragging node {}", id);
			self.drag.node_id = Some(id);
		} else {
			self.pan.active = true;
			self.pan.last = offset;
		}
		Ok(())
	}

	pub fn pointer_move<S: Surface + ?Sized>(&mut self, offset: Vec2, surface: &S) -> Result<()> {
		if self.pan.active {
			self.camera.pan_by(offset - self.pan.last)?;
			self.pan.last = offset;
		}

		let world = self.camera.offset_to_world(offset, surface)?;

		if let Some(id) = &self.drag.node_id {
			let grab = self.drag.grab_offset;
			if let Some(node) = self.data.node_mut(id) {
				node.position = world - grab;
			}
		}
		if let Some(link) = &mut self.link {
			link.end = world;
		}
		self.hovered = self.anchor_at(world);
		Ok(())
	}

	/// Finish the current gesture. Returns the connection made, if a link was
	/// dropped on a compatible anchor.
	pub fn pointer_up<S: Surface + ?Sized>(
		&mut self,
		offset: Vec2,
		surface: &S,
	) -> Result<Option<FullConnection>> {
		self.drag = DragState::default();
		self.pan = PanState::default();

		let Some(link) = self.link.take() else {
			return Ok(None);
		};
		let world = self.camera.offset_to_world(offset, surface)?;
		let Some(target) = self.anchor_at(world) else {
			return Ok(None);
		};

		let connection = match link.side {
			AnchorSide::Output => FullConnection::new(
				link.from.node_id,
				link.from.anchor_id,
				target.node_id,
				target.anchor_id,
			),
			AnchorSide::Input => FullConnection::new(
				target.node_id,
				target.anchor_id,
				link.from.node_id,
				link.from.anchor_id,
			),
		};

		match self.data.connect(connection.clone()) {
			Ok(replaced) => {
				if let Some(old) = replaced {
					debug!(
						"graph: replaced {}.{} -> {}.{}",
						old.from_node_id, old.from_anchor_id, old.to_node_id, old.to_anchor_id
					);
				}
				debug!(
					"graph: connected {}.{} -> {}.{}",
					connection.from_node_id,
					connection.from_anchor_id,
					connection.to_node_id,
					connection.to_anchor_id
				);
				Ok(Some(connection))
			}
			Err(e) => {
				warn!("graph: connection rejected: {}", e);
				Ok(None)
			}
		}
	}

	/// Abandon any gesture, e.g. when the pointer leaves the canvas.
	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.link = None;
		self.hovered = None;
	}

	/// Zoom around the pointer; positive `delta_y` zooms out, negative zooms
	/// in. A purely horizontal scroll leaves the camera alone.
	pub fn wheel<S: Surface + ?Sized>(
		&mut self,
		offset: Vec2,
		delta_y: f64,
		surface: &S,
	) -> Result<()> {
		let factor = if delta_y > 0.0 {
			WHEEL_ZOOM_OUT
		} else if delta_y < 0.0 {
			WHEEL_ZOOM_IN
		} else {
			return Ok(());
		};
		self.camera.zoom_at(offset, factor, surface)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::anchor::Anchor;
	use crate::components::graph::types::GraphNode;

	const SURFACE: SurfaceSize = SurfaceSize::new(800.0, 600.0);

	fn node(id: &str, position: Vec2) -> GraphNode {
		GraphNode {
			id: id.into(),
			node_type: "t".into(),
			label: id.into(),
			position,
			anchors: vec![
				Anchor::new("in", "number", AnchorSide::Input).with_value(1.0),
				Anchor::new("out", "number", AnchorSide::Output),
			],
		}
	}

	/// Node `a` at world origin, node `b` at (300, 0). With the default camera
	/// world (0, 0) is offset (400, 300).
	fn state() -> GraphState {
		GraphState::new(
			GraphData {
				nodes: vec![node("a", Vec2::ZERO), node("b", Vec2::new(300.0, 0.0))],
				connections: Vec::new(),
			},
			SURFACE,
		)
	}

	// a.out is at world (160, 42); b.in at world (300, 42)
	const A_OUT: Vec2 = Vec2::new(560.0, 342.0);
	const B_IN: Vec2 = Vec2::new(700.0, 342.0);

	#[test]
	fn test_hit_testing() {
		let state = state();
		assert_eq!(state.node_at(Vec2::new(10.0, 10.0)), Some("a"));
		assert_eq!(state.node_at(Vec2::new(310.0, 10.0)), Some("b"));
		assert_eq!(state.node_at(Vec2::new(200.0, 10.0)), None);
		assert_eq!(
			state.anchor_at(Vec2::new(163.0, 40.0)),
			Some(AnchorRef::new("a", "out"))
		);
		assert_eq!(state.anchor_at(Vec2::new(100.0, 40.0)), None);
	}

	#[test]
	fn test_drag_node() {
		let mut state = state();
		state.pointer_down(Vec2::new(480.0, 310.0), &SURFACE).unwrap();
		assert_eq!(state.drag.node_id.as_deref(), Some("a"));
		// dragged node moves to the top of the draw order
		assert_eq!(state.data.nodes.last().unwrap().id, "a");

		state.pointer_move(Vec2::new(500.0, 350.0), &SURFACE).unwrap();
		assert_eq!(state.data.node("a").unwrap().position, Vec2::new(20.0, 40.0));

		state.pointer_up(Vec2::new(500.0, 350.0), &SURFACE).unwrap();
		assert!(state.drag.node_id.is_none());
	}

	#[test]
	fn test_pan_background() {
		let mut state = state();
		state.pointer_down(Vec2::new(10.0, 10.0), &SURFACE).unwrap();
		assert!(state.pan.active);
		state.pointer_move(Vec2::new(60.0, 30.0), &SURFACE).unwrap();
		assert_eq!(state.camera.position, Vec2::new(-50.0, -20.0));
		state.pointer_up(Vec2::new(60.0, 30.0), &SURFACE).unwrap();
		assert!(!state.pan.active);
	}

	#[test]
	fn test_link_output_to_input() {
		let mut state = state();
		state.pointer_down(A_OUT, &SURFACE).unwrap();
		assert_eq!(
			state.link.as_ref().map(|l| l.from.clone()),
			Some(AnchorRef::new("a", "out"))
		);
		state.pointer_move(B_IN, &SURFACE).unwrap();
		assert_eq!(state.hovered, Some(AnchorRef::new("b", "in")));

		let made = state.pointer_up(B_IN, &SURFACE).unwrap();
		assert_eq!(made, Some(FullConnection::new("a", "out", "b", "in")));
		assert_eq!(state.data.connections.len(), 1);
		assert!(state.link.is_none());
	}

	#[test]
	fn test_link_from_input_is_reversed() {
		let mut state = state();
		state.pointer_down(B_IN, &SURFACE).unwrap();
		let made = state.pointer_up(A_OUT, &SURFACE).unwrap();
		assert_eq!(made, Some(FullConnection::new("a", "out", "b", "in")));
	}

	#[test]
	fn test_rejected_link_is_dropped() {
		let mut state = state();
		state.pointer_down(A_OUT, &SURFACE).unwrap();
		// output onto output
		let made = state.pointer_up(Vec2::new(860.0, 342.0), &SURFACE).unwrap();
		assert_eq!(made, None);
		assert!(state.data.connections.is_empty());
		assert!(state.link.is_none());
	}

	#[test]
	fn test_press_on_connected_input_detaches() {
		let mut state = state();
		state
			.data
			.connect(FullConnection::new("a", "out", "b", "in"))
			.unwrap();

		state.pointer_down(B_IN, &SURFACE).unwrap();
		assert!(state.data.connections.is_empty());
		let link = state.link.clone().unwrap();
		assert_eq!(link.from, AnchorRef::new("a", "out"));
		assert_eq!(link.side, AnchorSide::Output);

		// dropping on empty canvas discards it
		assert_eq!(state.pointer_up(Vec2::new(5.0, 5.0), &SURFACE).unwrap(), None);
		assert!(state.data.connections.is_empty());
	}

	#[test]
	fn test_wheel_zooms_around_pointer() {
		let mut state = state();
		let pointer = Vec2::new(700.0, 100.0);
		let before = state.camera.offset_to_world(pointer, &SURFACE).unwrap();
		state.wheel(pointer, -1.0, &SURFACE).unwrap();
		assert!(state.camera.zoom > 1.0);
		let after = state.camera.offset_to_world(pointer, &SURFACE).unwrap();
		assert!(before.distance(after) < 1e-9);
		state.wheel(pointer, 1.0, &SURFACE).unwrap();
		assert!((state.camera.zoom - 0.99).abs() < 1e-9);
	}

	#[test]
	fn test_horizontal_scroll_keeps_zoom() {
		let mut state = state();
		let position = state.camera.position;
		state.wheel(Vec2::new(400.0, 300.0), 0.0, &SURFACE).unwrap();
		assert_eq!(state.camera.zoom, 1.0);
		assert_eq!(state.camera.position, position);
		state.wheel(Vec2::new(400.0, 300.0), f64::NAN, &SURFACE).unwrap();
		assert_eq!(state.camera.zoom, 1.0);
	}

	#[test]
	fn test_set_anchor_value() {
		let mut state = state();
		let target = AnchorRef::new("a", "in");
		let previous = state.set_anchor_value(&target, 5.0).unwrap();
		assert_eq!(previous, AnchorValue::Number(1.0));
		assert_eq!(
			state.data.node("a").unwrap().anchor("in").unwrap().val,
			AnchorValue::Number(5.0)
		);
		assert!(matches!(
			state.set_anchor_value(&AnchorRef::new("a", "zzz"), 1.0),
			Err(GraphError::AnchorNotFound(_))
		));
		assert!(matches!(
			state.set_anchor_value(&AnchorRef::new("q", "in"), 1.0),
			Err(GraphError::NodeNotFound(_))
		));
	}

	#[test]
	fn test_fit_to_content_centres_bounds() {
		let mut state = state();
		state.fit_to_content();
		// bounds: x 0..460, y 0..66
		assert_eq!(state.camera.position, Vec2::new(230.0, 33.0));
	}

	#[test]
	fn test_pointer_leave_cancels() {
		let mut state = state();
		state.pointer_down(A_OUT, &SURFACE).unwrap();
		state.pointer_leave();
		assert!(state.link.is_none());
		assert!(state.hovered.is_none());
	}
}
