//! Graph data structures: nodes, connections and the node-type palette tree.

use serde::{Deserialize, Serialize};

use super::anchor::{self, Anchor, AnchorSide};
use super::error::{GraphError, Result};
use super::vector::Vec2;

/// A node placed on the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in connections.
	pub id: String,
	/// Key into [`GraphConfig::node_types`](super::config::GraphConfig::node_types).
	pub node_type: String,
	/// Header text.
	pub label: String,
	/// Top-left corner in world space.
	pub position: Vec2,
	pub anchors: Vec<Anchor>,
}

impl GraphNode {
	pub fn anchor(&self, id: &str) -> Option<&Anchor> {
		anchor::get_anchor(&self.anchors, id)
	}

	/// Anchors on one side, in declaration order.
	pub fn side(&self, side: AnchorSide) -> impl Iterator<Item = &Anchor> {
		self.anchors.iter().filter(move |a| a.side == side)
	}
}

/// A resolved edge from an output anchor to an input anchor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullConnection {
	pub from_node_id: String,
	pub from_anchor_id: String,
	pub to_node_id: String,
	pub to_anchor_id: String,
}

impl FullConnection {
	pub fn new(
		from_node_id: impl Into<String>,
		from_anchor_id: impl Into<String>,
		to_node_id: impl Into<String>,
		to_anchor_id: impl Into<String>,
	) -> Self {
		Self {
			from_node_id: from_node_id.into(),
			from_anchor_id: from_anchor_id.into(),
			to_node_id: to_node_id.into(),
			to_anchor_id: to_anchor_id.into(),
		}
	}

	/// Whether either end attaches to the given anchor.
	pub fn touches(&self, node_id: &str, anchor_id: &str) -> bool {
		(self.from_node_id == node_id && self.from_anchor_id == anchor_id)
			|| (self.to_node_id == node_id && self.to_anchor_id == anchor_id)
	}

	pub fn involves_node(&self, node_id: &str) -> bool {
		self.from_node_id == node_id || self.to_node_id == node_id
	}
}

/// Complete graph: nodes in draw order (last is topmost) and connections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub connections: Vec<FullConnection>,
}

impl GraphData {
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	/// Resolve a node/anchor pair.
	pub fn anchor(&self, node_id: &str, anchor_id: &str) -> Result<(&GraphNode, &Anchor)> {
		let node = self
			.node(node_id)
			.ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
		let anchor = node
			.anchor(anchor_id)
			.ok_or_else(|| GraphError::AnchorNotFound(anchor_id.to_string()))?;
		Ok((node, anchor))
	}

	/// Add a connection after checking that both endpoints exist, the source
	/// is an output and the target an input on a different node, and that the
	/// same connection is not already present.
	///
	/// An input takes at most one connection: any existing one into the same
	/// input is replaced and returned.
	pub fn connect(&mut self, connection: FullConnection) -> Result<Option<FullConnection>> {
		let (_, from) = self.anchor(&connection.from_node_id, &connection.from_anchor_id)?;
		let (_, to) = self.anchor(&connection.to_node_id, &connection.to_anchor_id)?;

		if from.side != AnchorSide::Output || to.side != AnchorSide::Input {
			return Err(GraphError::InvalidConnection(
				"connections must run from an output to an input",
			));
		}
		if connection.from_node_id == connection.to_node_id {
			return Err(GraphError::InvalidConnection(
				"cannot connect a node to itself",
			));
		}
		if self.connections.contains(&connection) {
			return Err(GraphError::DuplicateConnection {
				from_node: connection.from_node_id,
				from_anchor: connection.from_anchor_id,
				to_node: connection.to_node_id,
				to_anchor: connection.to_anchor_id,
			});
		}

		let replaced = self
			.connections
			.iter()
			.position(|c| {
				c.to_node_id == connection.to_node_id && c.to_anchor_id == connection.to_anchor_id
			})
			.map(|index| self.connections.remove(index));
		self.connections.push(connection);
		Ok(replaced)
	}

	/// Remove every connection attached to the anchor, returning how many went.
	pub fn disconnect_anchor(&mut self, node_id: &str, anchor_id: &str) -> usize {
		let before = self.connections.len();
		self.connections.retain(|c| !c.touches(node_id, anchor_id));
		before - self.connections.len()
	}

	/// Remove a node together with its connections.
	pub fn remove_node(&mut self, node_id: &str) -> Option<GraphNode> {
		let index = self.nodes.iter().position(|n| n.id == node_id)?;
		self.connections.retain(|c| !c.involves_node(node_id));
		Some(self.nodes.remove(index))
	}

	/// Move a node to the end of the draw order.
	pub fn bring_to_front(&mut self, node_id: &str) {
		if let Some(index) = self.nodes.iter().position(|n| n.id == node_id) {
			let node = self.nodes.remove(index);
			self.nodes.push(node);
		}
	}
}

/// One entry of a [`Category`]: either a nested category or a node-type name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryEntry {
	Category(Category),
	Item(String),
}

/// A named group in the node-type palette. Children are owned, so the tree
/// cannot contain cycles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
	pub name: String,
	#[serde(default)]
	pub objects: Vec<CategoryEntry>,
}

impl Category {
	pub fn new(name: impl Into<String>, objects: Vec<CategoryEntry>) -> Self {
		Self {
			name: name.into(),
			objects,
		}
	}

	/// Leaf names, depth first.
	pub fn items(&self) -> Vec<&str> {
		let mut out = Vec::new();
		self.collect_items(&mut out);
		out
	}

	fn collect_items<'a>(&'a self, out: &mut Vec<&'a str>) {
		for entry in &self.objects {
			match entry {
				CategoryEntry::Category(c) => c.collect_items(out),
				CategoryEntry::Item(name) => out.push(name),
			}
		}
	}

	pub fn contains(&self, name: &str) -> bool {
		self.items().contains(&name)
	}

	/// Rows for a palette list: every entry below this category with its
	/// nesting depth (direct children are depth 0).
	pub fn flatten(&self) -> Vec<(usize, &CategoryEntry)> {
		let mut out = Vec::new();
		self.collect_rows(0, &mut out);
		out
	}

	fn collect_rows<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a CategoryEntry)>) {
		for entry in &self.objects {
			out.push((depth, entry));
			if let CategoryEntry::Category(c) = entry {
				c.collect_rows(depth + 1, out);
			}
		}
	}
}

impl From<&str> for CategoryEntry {
	fn from(name: &str) -> Self {
		CategoryEntry::Item(name.to_string())
	}
}

impl From<Category> for CategoryEntry {
	fn from(category: Category) -> Self {
		CategoryEntry::Category(category)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, anchors: Vec<Anchor>) -> GraphNode {
		GraphNode {
			id: id.into(),
			node_type: "test".into(),
			label: id.to_uppercase(),
			position: Vec2::ZERO,
			anchors,
		}
	}

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![
				node(
					"a",
					vec![
						Anchor::new("in", "number", AnchorSide::Input),
						Anchor::new("out", "number", AnchorSide::Output),
					],
				),
				node(
					"b",
					vec![
						Anchor::new("in", "number", AnchorSide::Input),
						Anchor::new("out", "number", AnchorSide::Output),
					],
				),
			],
			connections: Vec::new(),
		}
	}

	#[test]
	fn test_connect_output_to_input() {
		let mut data = sample();
		data.connect(FullConnection::new("a", "out", "b", "in")).unwrap();
		assert_eq!(data.connections.len(), 1);
	}

	#[test]
	fn test_connect_rejects_bad_endpoints() {
		let mut data = sample();
		assert!(matches!(
			data.connect(FullConnection::new("x", "out", "b", "in")),
			Err(GraphError::NodeNotFound(_))
		));
		assert!(matches!(
			data.connect(FullConnection::new("a", "nope", "b", "in")),
			Err(GraphError::AnchorNotFound(_))
		));
		assert!(matches!(
			data.connect(FullConnection::new("a", "in", "b", "in")),
			Err(GraphError::InvalidConnection(_))
		));
		assert!(matches!(
			data.connect(FullConnection::new("a", "out", "a", "in")),
			Err(GraphError::InvalidConnection(_))
		));
		assert!(data.connections.is_empty());
	}

	#[test]
	fn test_connect_rejects_duplicates() {
		let mut data = sample();
		let connection = FullConnection::new("a", "out", "b", "in");
		data.connect(connection.clone()).unwrap();
		assert!(matches!(
			data.connect(connection),
			Err(GraphError::DuplicateConnection { .. })
		));
		assert_eq!(data.connections.len(), 1);
	}

	#[test]
	fn test_connect_replaces_existing_input() {
		let mut data = sample();
		data.nodes.push(node(
			"c",
			vec![Anchor::new("out", "number", AnchorSide::Output)],
		));
		let first = FullConnection::new("a", "out", "b", "in");
		assert_eq!(data.connect(first.clone()).unwrap(), None);

		let replaced = data.connect(FullConnection::new("c", "out", "b", "in")).unwrap();
		assert_eq!(replaced, Some(first));
		assert_eq!(data.connections, [FullConnection::new("c", "out", "b", "in")]);
		assert_eq!(data.disconnect_anchor("b", "in"), 1);
	}

	#[test]
	fn test_disconnect_and_remove_node() {
		let mut data = sample();
		data.connect(FullConnection::new("a", "out", "b", "in")).unwrap();
		data.connect(FullConnection::new("b", "out", "a", "in")).unwrap();
		assert_eq!(data.disconnect_anchor("b", "in"), 1);
		assert_eq!(data.connections.len(), 1);

		let removed = data.remove_node("a").unwrap();
		assert_eq!(removed.id, "a");
		assert!(data.connections.is_empty());
		assert!(data.remove_node("a").is_none());
	}

	#[test]
	fn test_bring_to_front() {
		let mut data = sample();
		data.bring_to_front("a");
		let order: Vec<_> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(order, ["b", "a"]);
	}

	#[test]
	fn test_connection_json_uses_camel_case() {
		let json = serde_json::to_value(FullConnection::new("n1", "o", "n2", "i")).unwrap();
		assert_eq!(json["fromNodeId"], "n1");
		assert_eq!(json["toAnchorId"], "i");
	}

	#[test]
	fn test_category_tree() {
		let palette: Category = serde_json::from_str(
			r#"{"name": "All", "objects": ["constant", {"name": "Math", "objects": ["add", "multiply"]}, "display"]}"#,
		)
		.unwrap();
		assert_eq!(palette.items(), ["constant", "add", "multiply", "display"]);
		assert!(palette.contains("multiply"));
		assert!(!palette.contains("Math"));

		let rows: Vec<usize> = palette.flatten().iter().map(|(d, _)| *d).collect();
		assert_eq!(rows, [0, 0, 1, 1, 0]);
	}
}
