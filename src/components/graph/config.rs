//! Graph configuration supplied by the embedding application.
//!
//! A [`GraphConfig`] can be built in code or parsed from JSON. Every field has
//! a default, so a JSON document only needs to name what it overrides:
//!
//! ```json
//! {
//!   "width": "800px",
//!   "style": { "accent": { "r": 255, "g": 160, "b": 0 } },
//!   "anchor_colors": { "bool": { "r": 200, "g": 40, "b": 40 } },
//!   "node_types": {
//!     "add": {
//!       "label": "Add",
//!       "anchors": [
//!         { "id": "a", "type": "number", "side": "input", "default": 0 },
//!         { "id": "sum", "type": "number", "side": "output" }
//!       ]
//!     }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::anchor::{Anchor, AnchorSide, AnchorValue};
use super::error::{GraphError, Result};
use super::theme::{Color, Style};
use super::transform::SurfaceSize;
use super::types::{Category, GraphNode};
use super::vector::Vec2;

/// Declares one anchor of a node type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnchorDef {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub side: AnchorSide,
	/// Initial value given to new instances.
	#[serde(default)]
	pub default: AnchorValue,
}

impl AnchorDef {
	pub fn new(id: impl Into<String>, kind: impl Into<String>, side: AnchorSide) -> Self {
		Self {
			id: id.into(),
			kind: kind.into(),
			side,
			default: AnchorValue::Empty,
		}
	}

	pub fn with_default(mut self, default: impl Into<AnchorValue>) -> Self {
		self.default = default.into();
		self
	}

	fn instantiate(&self) -> Anchor {
		Anchor {
			id: self.id.clone(),
			kind: self.kind.clone(),
			side: self.side,
			val: self.default.clone(),
		}
	}
}

/// Describes how nodes of one type look and which anchors they carry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeDef {
	pub label: String,
	/// Header color; falls back to the style's node color.
	#[serde(default)]
	pub color: Option<Color>,
	#[serde(default)]
	pub anchors: Vec<AnchorDef>,
}

impl NodeTypeDef {
	pub fn new(label: impl Into<String>, anchors: Vec<AnchorDef>) -> Self {
		Self {
			label: label.into(),
			color: None,
			anchors,
		}
	}
}

/// Everything the [`Graph`](super::Graph) component needs from its host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub style: Style,
	/// CSS width of the canvas, in pixels (e.g. `"1280px"`).
	pub width: String,
	/// CSS height of the canvas, in pixels.
	pub height: String,
	/// Registered node types by name.
	pub node_types: BTreeMap<String, NodeTypeDef>,
	/// Per anchor-type color overrides. Unlisted types use `style.accent`.
	pub anchor_colors: HashMap<String, Color>,
	/// Palette tree shown by the host application.
	pub categories: Vec<Category>,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			style: Style::default(),
			width: "1280px".into(),
			height: "720px".into(),
			node_types: BTreeMap::new(),
			anchor_colors: HashMap::new(),
			categories: Vec::new(),
		}
	}
}

impl GraphConfig {
	/// Parse a (partial) JSON configuration.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn with_node_type(mut self, name: impl Into<String>, def: NodeTypeDef) -> Self {
		self.node_types.insert(name.into(), def);
		self
	}

	pub fn with_anchor_color(mut self, kind: impl Into<String>, color: Color) -> Self {
		self.anchor_colors.insert(kind.into(), color);
		self
	}

	/// Color for anchors (and outgoing connections) of the given type.
	pub fn anchor_color(&self, kind: &str) -> Color {
		self.anchor_colors
			.get(kind)
			.copied()
			.unwrap_or(self.style.accent)
	}

	/// Header color for a node of the given type.
	pub fn node_header_color(&self, node_type: &str) -> Color {
		self.node_types
			.get(node_type)
			.and_then(|def| def.color)
			.unwrap_or_else(|| self.style.node_color.lighten(25))
	}

	/// Create a node of a registered type with its anchors at their defaults.
	pub fn instantiate(
		&self,
		node_type: &str,
		id: impl Into<String>,
		position: Vec2,
	) -> Result<GraphNode> {
		let def = self
			.node_types
			.get(node_type)
			.ok_or_else(|| GraphError::UnknownNodeType(node_type.to_string()))?;
		Ok(GraphNode {
			id: id.into(),
			node_type: node_type.to_string(),
			label: def.label.clone(),
			position,
			anchors: def.anchors.iter().map(AnchorDef::instantiate).collect(),
		})
	}

	/// Canvas size in pixels from `width` / `height`.
	pub fn surface_size(&self) -> Result<SurfaceSize> {
		Ok(SurfaceSize::new(
			parse_px(&self.width)?,
			parse_px(&self.height)?,
		))
	}
}

/// Parse a CSS pixel length such as `"720px"` or a bare number.
pub fn parse_px(value: &str) -> Result<f64> {
	let trimmed = value.trim();
	let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
	match number.parse::<f64>() {
		Ok(px) if px.is_finite() && px >= 0.0 => Ok(px),
		_ => Err(GraphError::InvalidLength(value.to_string())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn math_config() -> GraphConfig {
		GraphConfig::default().with_node_type(
			"add",
			NodeTypeDef::new(
				"Add",
				vec![
					AnchorDef::new("a", "number", AnchorSide::Input).with_default(0.0),
					AnchorDef::new("b", "number", AnchorSide::Input).with_default(0.0),
					AnchorDef::new("sum", "number", AnchorSide::Output),
				],
			),
		)
	}

	#[test]
	fn test_defaults() {
		let config = GraphConfig::default();
		assert_eq!(config.width, "1280px");
		assert_eq!(config.height, "720px");
		assert_eq!(config.surface_size().unwrap(), SurfaceSize::new(1280.0, 720.0));
		assert!(config.node_types.is_empty());
	}

	#[test]
	fn test_anchor_color_defaults_to_accent_for_every_type() {
		let config = GraphConfig::default();
		assert_eq!(config.anchor_color("number"), config.style.accent);
		assert_eq!(config.anchor_color("bool"), config.style.accent);
		assert_eq!(config.anchor_color("number").stringify(), "rgb(0, 0, 255)");
	}

	#[test]
	fn test_anchor_color_override() {
		let config = GraphConfig::default().with_anchor_color("bool", Color::rgb(200, 0, 0));
		assert_eq!(config.anchor_color("bool"), Color::rgb(200, 0, 0));
		assert_eq!(config.anchor_color("number"), config.style.accent);
	}

	#[test]
	fn test_instantiate_copies_anchor_defaults() {
		let node = math_config()
			.instantiate("add", "n1", Vec2::new(10.0, 20.0))
			.unwrap();
		assert_eq!(node.id, "n1");
		assert_eq!(node.label, "Add");
		assert_eq!(node.position, Vec2::new(10.0, 20.0));
		assert_eq!(node.anchors.len(), 3);
		assert_eq!(node.anchor("a").unwrap().val, AnchorValue::Number(0.0));
		assert_eq!(node.anchor("sum").unwrap().side, AnchorSide::Output);
	}

	#[test]
	fn test_instantiate_unknown_type() {
		let err = GraphConfig::default()
			.instantiate("nope", "n1", Vec2::ZERO)
			.unwrap_err();
		assert!(matches!(err, GraphError::UnknownNodeType(ref t) if t == "nope"));
	}

	#[test]
	fn test_from_json_partial() {
		let config = GraphConfig::from_json(
			r#"{
				"width": "800px",
				"style": { "accent": { "r": 255, "g": 160, "b": 0 } },
				"anchor_colors": { "bool": { "r": 200, "g": 40, "b": 40, "a": 0.5 } },
				"node_types": {
					"not": {
						"label": "Not",
						"anchors": [
							{ "id": "in", "type": "bool", "default": false },
							{ "id": "out", "type": "bool", "side": "output" }
						]
					}
				},
				"categories": [{ "name": "Logic", "objects": ["not"] }]
			}"#,
		)
		.unwrap();
		assert_eq!(config.width, "800px");
		assert_eq!(config.height, "720px");
		assert_eq!(config.style.accent, Color::rgb(255, 160, 0));
		assert_eq!(config.style.font, "Arial");
		assert_eq!(
			config.anchor_color("bool").stringify(),
			"rgba(200, 40, 40, 0.5)"
		);
		let not = &config.node_types["not"];
		assert_eq!(not.anchors[0].side, AnchorSide::Input);
		assert_eq!(not.anchors[0].default, AnchorValue::Bool(false));
		assert_eq!(not.anchors[1].side, AnchorSide::Output);
		assert!(config.categories[0].contains("not"));
	}

	#[test]
	fn test_from_json_error() {
		assert!(matches!(
			GraphConfig::from_json("{ not json"),
			Err(GraphError::Config(_))
		));
	}

	#[test]
	fn test_parse_px() {
		assert_eq!(parse_px("1280px").unwrap(), 1280.0);
		assert_eq!(parse_px(" 12.5 px ").unwrap(), 12.5);
		assert_eq!(parse_px("300").unwrap(), 300.0);
		assert!(matches!(parse_px("50%"), Err(GraphError::InvalidLength(_))));
		assert!(parse_px("-4px").is_err());
	}
}
