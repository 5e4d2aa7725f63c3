//! Node geometry in world space.
//!
//! A node is a box whose top-left corner is [`GraphNode::position`]: a header
//! row with the label, then one row per anchor. Inputs sit on the left edge,
//! outputs on the right edge, each side filling rows from the top.

use super::anchor::{Anchor, AnchorSide};
use super::types::GraphNode;
use super::vector::Vec2;

/// Box and row dimensions, in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeMetrics {
	pub width: f64,
	pub header_height: f64,
	pub row_height: f64,
	/// Drawn anchor radius.
	pub anchor_radius: f64,
	/// Anchor hit radius in screen pixels, independent of zoom.
	pub anchor_hit_px: f64,
}

impl Default for NodeMetrics {
	fn default() -> Self {
		Self {
			width: 160.0,
			header_height: 30.0,
			row_height: 24.0,
			anchor_radius: 6.0,
			anchor_hit_px: 10.0,
		}
	}
}

impl NodeMetrics {
	/// Width and height of a node's box.
	pub fn node_size(&self, node: &GraphNode) -> Vec2 {
		let inputs = node.side(AnchorSide::Input).count();
		let outputs = node.side(AnchorSide::Output).count();
		let rows = inputs.max(outputs) as f64;
		Vec2::new(
			self.width,
			self.header_height + rows * self.row_height + self.row_height * 0.5,
		)
	}

	pub fn contains(&self, node: &GraphNode, world: Vec2) -> bool {
		let local = world - node.position;
		let size = self.node_size(node);
		local.x >= 0.0 && local.y >= 0.0 && local.x <= size.x && local.y <= size.y
	}

	/// World position of the anchor's connection point.
	pub fn anchor_position(&self, node: &GraphNode, anchor: &Anchor) -> Option<Vec2> {
		let row = node
			.side(anchor.side)
			.position(|a| a.id == anchor.id)?;
		let x = match anchor.side {
			AnchorSide::Input => 0.0,
			AnchorSide::Output => self.width,
		};
		let y = self.header_height + (row as f64 + 0.5) * self.row_height;
		Some(node.position + Vec2::new(x, y))
	}

	/// Anchor positions for every anchor of a node.
	pub fn anchor_positions<'a>(
		&'a self,
		node: &'a GraphNode,
	) -> impl Iterator<Item = (&'a Anchor, Vec2)> + 'a {
		node.anchors
			.iter()
			.filter_map(move |a| self.anchor_position(node, a).map(|p| (a, p)))
	}
}

/// Control points for a connection drawn as a horizontal cubic Bézier from
/// an output at `from` to an input at `to`.
pub fn connection_curve(from: Vec2, to: Vec2) -> (Vec2, Vec2) {
	let pull = (to.x - from.x).abs().max(50.0) * 0.5;
	(from + Vec2::new(pull, 0.0), to - Vec2::new(pull, 0.0))
}
