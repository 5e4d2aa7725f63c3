//! Leptos component wrapping the node graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, connecting anchors, panning, and zooming. Pointer
//! positions are converted with the canvas element itself as the [`Surface`],
//! so its bounding rect is re-read on every event. An animation loop runs via
//! `requestAnimationFrame`, redrawing each frame.
//!
//! [`Surface`]: super::transform::Surface

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::error::Result;
use super::render;
use super::state::GraphState;
use super::transform::SurfaceSize;
use super::types::GraphData;
use super::vector::Vec2;

/// Bundles editing state with the configuration it is drawn with.
struct GraphContext {
	state: GraphState,
	config: GraphConfig,
}

type Shared<T> = Rc<RefCell<Option<T>>>;

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas' top-left corner.
fn pointer_offset(ev: &MouseEvent, canvas: &Element) -> Vec2 {
	let rect = canvas.get_bounding_client_rect();
	Vec2::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Run a pointer handler against the shared context, logging failures.
fn with_context(
	context: &Shared<GraphContext>,
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
	handler: impl FnOnce(&mut GraphState, Vec2, &Element) -> Result<()>,
) {
	let Some(canvas) = canvas_ref.get() else {
		return;
	};
	let canvas: HtmlCanvasElement = canvas.into();
	let element: &Element = canvas.as_ref();
	let offset = pointer_offset(ev, element);
	if let Some(ref mut c) = *context.borrow_mut() {
		if let Err(e) = handler(&mut c.state, offset, element) {
			warn!("graph: pointer event ignored: {}", e);
		}
	}
}

/// Renders an editable node graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal and node types, styling and
/// canvas size via `config`. The canvas takes `config.width` × `config.height`;
/// set `fullscreen = true` to fill the viewport and resize with the window.
#[component]
pub fn Graph(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Shared<GraphContext> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	let css_size = if fullscreen {
		"display: block; width: 100vw; height: 100vh;".to_string()
	} else {
		format!("display: block; width: {}; height: {};", config.width, config.height)
	};

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let size = match (fullscreen, config.surface_size()) {
			(true, _) => viewport_size(&window),
			(false, Ok(size)) => Some((size.width, size.height)),
			(false, Err(e)) => {
				warn!("graph: {}, using the canvas' own size", e);
				let rect = canvas.get_bounding_client_rect();
				Some((rect.width(), rect.height()))
			}
		};
		let (w, h) = size.unwrap_or((800.0, 600.0));
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("graph: 2d canvas context unavailable");
				return;
			}
		};

		let data = data.get();
		info!(
			"graph: mounted {} nodes, {} connections",
			data.nodes.len(),
			data.connections.len()
		);
		let mut state = GraphState::new(data, SurfaceSize::new(w, h));
		state.fit_to_content();
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			config: config.clone(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref c) = *context_anim.borrow() {
				render::render(&c.state, &ctx, &c.config);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		with_context(&context_md, canvas_ref, &ev, |state, offset, surface| {
			state.pointer_down(offset, surface)
		});
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		with_context(&context_mm, canvas_ref, &ev, |state, offset, surface| {
			state.pointer_move(offset, surface)
		});
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		with_context(&context_mu, canvas_ref, &ev, |state, offset, surface| {
			state.pointer_up(offset, surface).map(|_| ())
		});
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.pointer_leave();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let delta_y = ev.delta_y();
		with_context(&context_wh, canvas_ref, &ev, |state, offset, surface| {
			state.wheel(offset, delta_y, surface)
		});
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="node-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style=css_size
		/>
	}
}
