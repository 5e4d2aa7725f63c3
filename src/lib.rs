//! leptos-node-graph: node-based graph editor component for Leptos.
//!
//! This crate provides a WASM graph editing component that renders nodes with
//! typed anchors and connections between them, with pan/zoom, node dragging and
//! drag-to-connect. The coordinate transforms, anchor lookups and styling
//! values it is built on are plain Rust and usable on their own.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::graph::{
	Anchor, AnchorDef, AnchorSide, AnchorValue, Camera, Category, CategoryEntry, Color,
	FullConnection, Graph, GraphConfig, GraphData, GraphError, GraphNode, NodeTypeDef, Style,
	Surface, SurfaceSize, Vec2, anchor, camera_to_offset, camera_to_world, offset_to_camera,
	world_to_camera,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("node-graph: logging initialized");
}

/// Load configuration overrides from a script element with id="graph-config".
/// Expected format: a (partial) JSON [`GraphConfig`].
fn load_graph_config() -> Option<GraphConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match GraphConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"node-graph: loaded config with {} node types",
				config.node_types.len()
			);
			Some(config)
		}
		Err(e) => {
			warn!("node-graph: {}", e);
			None
		}
	}
}

/// Node types used by the demo page.
pub fn demo_config() -> GraphConfig {
	let number = |id: &str, side| AnchorDef::new(id, "number", side);
	GraphConfig {
		categories: vec![Category::new(
			"Nodes",
			vec![
				"constant".into(),
				Category::new("Math", vec!["add".into(), "multiply".into()]).into(),
				"display".into(),
			],
		)],
		..GraphConfig::default()
	}
	.with_node_type(
		"constant",
		NodeTypeDef::new(
			"Constant",
			vec![number("value", AnchorSide::Output).with_default(1.0)],
		),
	)
	.with_node_type(
		"add",
		NodeTypeDef::new(
			"Add",
			vec![
				number("a", AnchorSide::Input).with_default(0.0),
				number("b", AnchorSide::Input).with_default(0.0),
				number("sum", AnchorSide::Output),
			],
		),
	)
	.with_node_type(
		"multiply",
		NodeTypeDef::new(
			"Multiply",
			vec![
				number("a", AnchorSide::Input).with_default(1.0),
				number("b", AnchorSide::Input).with_default(1.0),
				number("product", AnchorSide::Output),
			],
		),
	)
	.with_node_type(
		"display",
		NodeTypeDef {
			label: "Display".into(),
			color: Some(Color::rgb(40, 110, 70)),
			anchors: vec![AnchorDef::new("value", "number", AnchorSide::Input)],
		},
	)
}

/// A small graph wired from the demo node types.
pub fn demo_data(config: &GraphConfig) -> components::graph::Result<GraphData> {
	let mut data = GraphData {
		nodes: vec![
			config.instantiate("constant", "c1", Vec2::new(-420.0, -120.0))?,
			config.instantiate("constant", "c2", Vec2::new(-420.0, 40.0))?,
			config.instantiate("add", "add", Vec2::new(-160.0, -60.0))?,
			config.instantiate("display", "out", Vec2::new(120.0, -40.0))?,
		],
		connections: Vec::new(),
	};
	if let Some(node) = data.node_mut("c2") {
		anchor::set(&mut node.anchors, "value", 2.0)?;
	}
	data.connect(FullConnection::new("c1", "value", "add", "a"))?;
	data.connect(FullConnection::new("c2", "value", "add", "b"))?;
	data.connect(FullConnection::new("add", "sum", "out", "value"))?;
	Ok(data)
}

/// Main application component.
/// Loads configuration from the DOM and renders the editor with a palette.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_graph_config().unwrap_or_else(demo_config);
	let graph_data = demo_data(&config).unwrap_or_else(|e| {
		warn!("node-graph: demo graph unavailable: {}", e);
		GraphData::default()
	});
	let graph_signal = Signal::derive(move || graph_data.clone());

	let palette: Vec<(usize, String, bool)> = config
		.categories
		.iter()
		.flat_map(|c| {
			std::iter::once((0, c.name.clone(), true)).chain(c.flatten().into_iter().map(
				|(depth, entry)| match entry {
					CategoryEntry::Category(c) => (depth + 1, c.name.clone(), true),
					CategoryEntry::Item(name) => (depth + 1, name.clone(), false),
				},
			))
		})
		.collect();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Node Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<Graph data=graph_signal config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Node Graph"</h1>
				<p class="subtitle">"Drag nodes to move. Drag from an anchor to connect. Scroll to zoom. Drag background to pan."</p>
				<ul class="palette">
					{palette
						.into_iter()
						.map(|(depth, name, is_category)| {
							let class = if is_category { "category" } else { "item" };
							let indent = format!("padding-left: {}em;", depth);
							view! { <li class=class style=indent>{name}</li> }
						})
						.collect_view()}
				</ul>
			</div>
		</div>
	}
}
