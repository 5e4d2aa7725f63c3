//! Anchors: typed connection points on a node, and lookups over them.
//!
//! Anchors live in a plain `Vec<Anchor>` owned by their [`GraphNode`]. The
//! helpers here take a slice and scan it linearly, returning the first anchor
//! whose id matches. Nodes carry tens of anchors at most.
//!
//! [`GraphNode`]: super::types::GraphNode

use serde::{Deserialize, Serialize};

use super::error::{GraphError, Result};
use super::vector::Vec2;

/// Which side of a node an anchor sits on. Connections run from an
/// [`AnchorSide::Output`] to an [`AnchorSide::Input`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
	#[default]
	Input,
	Output,
}

/// The value carried by an anchor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnchorValue {
	#[default]
	Empty,
	Bool(bool),
	Number(f64),
	Text(String),
	Vector(Vec2),
}

impl AnchorValue {
	/// Short text used for inline value labels.
	pub fn display(&self) -> Option<String> {
		match self {
			AnchorValue::Empty => None,
			AnchorValue::Bool(b) => Some(b.to_string()),
			AnchorValue::Number(n) => Some(n.to_string()),
			AnchorValue::Text(s) => Some(s.clone()),
			AnchorValue::Vector(v) => Some(format!("({}, {})", v.x, v.y)),
		}
	}
}

impl From<bool> for AnchorValue {
	fn from(b: bool) -> Self {
		AnchorValue::Bool(b)
	}
}

impl From<f64> for AnchorValue {
	fn from(n: f64) -> Self {
		AnchorValue::Number(n)
	}
}

impl From<&str> for AnchorValue {
	fn from(s: &str) -> Self {
		AnchorValue::Text(s.to_string())
	}
}

impl From<String> for AnchorValue {
	fn from(s: String) -> Self {
		AnchorValue::Text(s)
	}
}

impl From<Vec2> for AnchorValue {
	fn from(v: Vec2) -> Self {
		AnchorValue::Vector(v)
	}
}

/// A named, typed connection point on a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
	/// Unique within the owning node.
	pub id: String,
	/// Opaque type tag, used for colouring.
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub side: AnchorSide,
	#[serde(default)]
	pub val: AnchorValue,
}

impl Anchor {
	pub fn new(id: impl Into<String>, kind: impl Into<String>, side: AnchorSide) -> Self {
		Self {
			id: id.into(),
			kind: kind.into(),
			side,
			val: AnchorValue::Empty,
		}
	}

	pub fn with_value(mut self, val: impl Into<AnchorValue>) -> Self {
		self.val = val.into();
		self
	}
}

/// Value of the first anchor with the given id.
pub fn get<'a>(anchors: &'a [Anchor], id: &str) -> Option<&'a AnchorValue> {
	get_anchor(anchors, id).map(|a| &a.val)
}

/// Replace the value of the first anchor with the given id, returning the
/// previous value. The list is left untouched when no anchor matches.
pub fn set(anchors: &mut [Anchor], id: &str, val: impl Into<AnchorValue>) -> Result<AnchorValue> {
	let anchor =
		get_anchor_mut(anchors, id).ok_or_else(|| GraphError::AnchorNotFound(id.to_string()))?;
	Ok(std::mem::replace(&mut anchor.val, val.into()))
}

/// The first anchor with the given id.
pub fn get_anchor<'a>(anchors: &'a [Anchor], id: &str) -> Option<&'a Anchor> {
	anchors.iter().find(|a| a.id == id)
}

pub fn get_anchor_mut<'a>(anchors: &'a mut [Anchor], id: &str) -> Option<&'a mut Anchor> {
	anchors.iter_mut().find(|a| a.id == id)
}
