//! Error type shared by the graph utilities.

use thiserror::Error;

/// Errors raised by vector math, anchor lookups, graph edits and config loading.
#[derive(Debug, Error)]
pub enum GraphError {
	/// Division by zero (or NaN), e.g. converting with a zoom factor of `0`.
	#[error("division by zero-valued divisor {0}")]
	ZeroDivisor(f64),
	/// No anchor with the given id exists in the list.
	#[error("anchor `{0}` not found")]
	AnchorNotFound(String),
	/// No node with the given id exists in the graph.
	#[error("node `{0}` not found")]
	NodeNotFound(String),
	/// The node type is not registered in the configuration.
	#[error("unknown node type `{0}`")]
	UnknownNodeType(String),
	/// The connection endpoints cannot be joined.
	#[error("invalid connection: {0}")]
	InvalidConnection(&'static str),
	/// An identical connection already exists.
	#[error("connection {from_node}.{from_anchor} -> {to_node}.{to_anchor} already exists")]
	DuplicateConnection {
		from_node: String,
		from_anchor: String,
		to_node: String,
		to_anchor: String,
	},
	/// A CSS length could not be interpreted as pixels.
	#[error("invalid pixel length `{0}`")]
	InvalidLength(String),
	/// The JSON configuration could not be parsed.
	#[error("invalid graph configuration: {0}")]
	Config(#[from] serde_json::Error),
}

/// Result alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
