//! Coordinate transforms between world, camera and offset space.
//!
//! # Coordinate Spaces
//!
//! - **World**: graph content coordinates, independent of the view.
//! - **Camera**: world position relative to the camera, multiplied by zoom.
//!   This is what gets drawn, centred on the surface.
//! - **Offset**: pixel coordinates relative to the top-left corner of the
//!   rendering surface (e.g. `MouseEvent` client position minus the element's
//!   bounding rect origin).
//!
//! Camera and offset space differ only by half the surface size, which is
//! read from the [`Surface`] on every call so resizes are picked up without
//! any cached state.

use super::error::Result;
use super::vector::Vec2;

/// Smallest zoom factor reachable through [`Camera::zoom_at`].
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor reachable through [`Camera::zoom_at`].
pub const MAX_ZOOM: f64 = 10.0;

/// Anything that can report its current on-screen size.
pub trait Surface {
	/// Current `(width, height)` of the surface's bounding rectangle.
	fn size(&self) -> Vec2;
}

impl Surface for web_sys::Element {
	fn size(&self) -> Vec2 {
		let rect = self.get_bounding_client_rect();
		Vec2::new(rect.width(), rect.height())
	}
}

/// A fixed-size surface, for headless use and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceSize {
	pub width: f64,
	pub height: f64,
}

impl SurfaceSize {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

impl Surface for SurfaceSize {
	fn size(&self) -> Vec2 {
		Vec2::new(self.width, self.height)
	}
}

fn half_size<S: Surface + ?Sized>(surface: &S) -> Vec2 {
	surface.size().scale(0.5)
}

/// `(pos - camera_pos) * zoom`
pub fn world_to_camera(pos: Vec2, camera_pos: Vec2, zoom: f64) -> Vec2 {
	pos.subtract(camera_pos).scale(zoom)
}

/// `pos / zoom + camera_pos`, the inverse of [`world_to_camera`].
///
/// Fails when `zoom` is zero.
pub fn camera_to_world(pos: Vec2, camera_pos: Vec2, zoom: f64) -> Result<Vec2> {
	Ok(pos.checked_div(zoom)? + camera_pos)
}

/// Shift an offset-space position so the surface centre becomes the origin.
pub fn offset_to_camera<S: Surface + ?Sized>(pos: Vec2, surface: &S) -> Vec2 {
	pos - half_size(surface)
}

/// Inverse of [`offset_to_camera`].
pub fn camera_to_offset<S: Surface + ?Sized>(pos: Vec2, surface: &S) -> Vec2 {
	pos + half_size(surface)
}

/// View state: the world point shown at the surface centre, and the zoom factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pub position: Vec2,
	/// Zoom factor (1.0 = 100%).
	pub zoom: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			position: Vec2::ZERO,
			zoom: 1.0,
		}
	}
}

impl Camera {
	pub fn new(position: Vec2, zoom: f64) -> Self {
		Self { position, zoom }
	}

	/// Map a world position to surface pixels.
	pub fn world_to_offset<S: Surface + ?Sized>(&self, pos: Vec2, surface: &S) -> Vec2 {
		camera_to_offset(world_to_camera(pos, self.position, self.zoom), surface)
	}

	/// Map surface pixels (e.g. a pointer position) to a world position.
	pub fn offset_to_world<S: Surface + ?Sized>(&self, pos: Vec2, surface: &S) -> Result<Vec2> {
		camera_to_world(offset_to_camera(pos, surface), self.position, self.zoom)
	}

	/// Move the view by a drag of `delta` surface pixels.
	pub fn pan_by(&mut self, delta: Vec2) -> Result<()> {
		self.position = self.position - delta.checked_div(self.zoom)?;
		Ok(())
	}

	/// Multiply the zoom by `factor` while keeping the world point under
	/// `pointer` (offset space) fixed on screen.
	pub fn zoom_at<S: Surface + ?Sized>(
		&mut self,
		pointer: Vec2,
		factor: f64,
		surface: &S,
	) -> Result<()> {
		let anchor = self.offset_to_world(pointer, surface)?;
		let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let camera_pointer = offset_to_camera(pointer, surface);
		self.position = anchor - camera_pointer.checked_div(zoom)?;
		self.zoom = zoom;
		Ok(())
	}
}
