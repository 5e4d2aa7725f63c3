//! Node graph editor component.
//!
//! Renders nodes with typed anchors and the connections between them on an
//! HTML canvas, with:
//! - Pan and zoom through a [`Camera`] and pure world/camera/offset transforms
//! - Node dragging and drag-to-connect between output and input anchors
//! - Node types, colors and canvas size supplied through [`GraphConfig`]
//!
//! # Example
//!
//! ```ignore
//! use leptos_node_graph::{AnchorDef, AnchorSide, Graph, GraphConfig, GraphData, NodeTypeDef, Vec2};
//!
//! let config = GraphConfig::default().with_node_type(
//!     "constant",
//!     NodeTypeDef::new("Constant", vec![AnchorDef::new("value", "number", AnchorSide::Output)]),
//! );
//! let data = GraphData {
//!     nodes: vec![config.instantiate("constant", "c1", Vec2::new(0.0, 0.0))?],
//!     connections: vec![],
//! };
//!
//! view! { <Graph data=data config=config /> }
//! ```

pub mod anchor;
mod component;
pub mod config;
mod error;
pub mod layout;
mod render;
pub mod state;
pub mod theme;
pub mod transform;
mod types;
mod vector;

pub use anchor::{Anchor, AnchorSide, AnchorValue};
pub use component::Graph;
pub use config::{AnchorDef, GraphConfig, NodeTypeDef};
pub use error::{GraphError, Result};
pub use theme::{Color, Style};
pub use transform::{
	Camera, Surface, SurfaceSize, camera_to_offset, camera_to_world, offset_to_camera,
	world_to_camera,
};
pub use types::{Category, CategoryEntry, FullConnection, GraphData, GraphNode};
pub use vector::Vec2;
