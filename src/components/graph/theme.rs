//! Visual theming for the graph.
//!
//! Provides the [`Color`] value type and the [`Style`] consumed by the renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// RGBA color representation. Channels saturate at the `u8` bounds, so
/// arithmetic can never produce an out-of-range CSS value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	#[serde(default = "opaque")]
	pub a: f64,
}

fn opaque() -> f64 {
	1.0
}

fn shift(channel: u8, delta: i16) -> u8 {
	(channel as i32 + delta as i32).clamp(0, 255) as u8
}

impl Color {
	pub const WHITE: Color = Color::rgb(255, 255, 255);
	pub const BLACK: Color = Color::rgb(0, 0, 0);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Overwrite all four channels in place.
	pub fn set(&mut self, r: u8, g: u8, b: u8, a: f64) {
		*self = Self::rgba(r, g, b, a);
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Add `delta` to each RGB channel. Negative values darken.
	pub fn lighten(self, delta: i16) -> Self {
		Self {
			r: shift(self.r, delta),
			g: shift(self.g, delta),
			b: shift(self.b, delta),
			a: self.a,
		}
	}

	/// Linear interpolation towards `other`, with `t` clamped to [0, 1].
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// `255 - channel` for each RGB channel; alpha is kept.
	pub fn invert(self) -> Self {
		Self {
			r: 255 - self.r,
			g: 255 - self.g,
			b: 255 - self.b,
			a: self.a,
		}
	}

	/// CSS color string: `rgb(r, g, b)` when opaque, `rgba(r, g, b, a)` otherwise.
	/// Alpha is clamped to [0, 1] first; NaN counts as opaque.
	pub fn stringify(&self) -> String {
		let rgb = format!("{}, {}, {}", self.r, self.g, self.b);
		let a = if self.a.is_nan() { 1.0 } else { self.a.clamp(0.0, 1.0) };
		if (a - 1.0).abs() < f64::EPSILON {
			format!("rgb({})", rgb)
		} else {
			format!("rgba({}, {})", rgb, a)
		}
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.stringify())
	}
}

/// Colors, corner radius and font used to draw the graph.
///
/// Every field is optional in JSON; missing ones fall back to [`Style::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
	/// Background color.
	pub primary: Color,
	/// Grid line color.
	pub grid_color: Color,
	/// Node body color.
	pub node_color: Color,
	/// Node corner radius in world units.
	pub node_radius: f64,
	/// Highlight color; also the default anchor color.
	pub accent: Color,
	pub text_color: Color,
	/// CSS font family for labels.
	pub font: String,
}

impl Default for Style {
	fn default() -> Self {
		let primary = Color::rgb(20, 20, 20);
		Self {
			primary,
			grid_color: primary.lighten(40),
			node_color: primary.lighten(10),
			node_radius: 20.0,
			accent: Color::rgb(0, 0, 255),
			text_color: Color::WHITE,
			font: "Arial".into(),
		}
	}
}

impl Style {
	/// CSS font shorthand at the given pixel size.
	pub fn font_at(&self, px: f64) -> String {
		format!("{}px {}", px, self.font)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_stringify_opaque_and_translucent() {
		assert_eq!(Color::rgb(0, 0, 255).stringify(), "rgb(0, 0, 255)");
		assert_eq!(
			Color::rgba(0, 0, 255, 0.5).stringify(),
			"rgba(0, 0, 255, 0.5)"
		);
		assert_eq!(Color::rgb(1, 2, 3).to_string(), "rgb(1, 2, 3)");
	}

	#[test]
	fn test_invert() {
		assert_eq!(
			Color::rgb(10, 10, 10).invert().stringify(),
			"rgb(245, 245, 245)"
		);
		assert_eq!(Color::rgba(0, 128, 255, 0.25).invert().a, 0.25);
	}

	#[test]
	fn test_lighten_saturates() {
		assert_eq!(Color::rgb(20, 20, 20).lighten(40), Color::rgb(60, 60, 60));
		assert_eq!(Color::rgb(250, 10, 128).lighten(10), Color::rgb(255, 20, 138));
		assert_eq!(Color::rgb(5, 200, 0).lighten(-10), Color::rgb(0, 190, 0));
		assert_eq!(Color::rgb(1, 2, 3).lighten(i16::MAX), Color::WHITE);
		assert_eq!(Color::rgb(1, 2, 3).lighten(i16::MIN), Color::BLACK);
	}

	#[test]
	fn test_set_mutates_in_place() {
		let mut color = Color::rgb(1, 1, 1);
		color.set(9, 8, 7, 0.5);
		assert_eq!(color, Color::rgba(9, 8, 7, 0.5));
	}

	#[test]
	fn test_alpha_clamped_in_css() {
		assert_eq!(Color::rgba(0, 0, 0, 3.0).stringify(), "rgb(0, 0, 0)");
		assert_eq!(Color::rgba(0, 0, 0, -1.0).stringify(), "rgba(0, 0, 0, 0)");
	}

	#[test]
	fn test_nan_alpha_is_opaque() {
		assert_eq!(Color::rgba(1, 2, 3, f64::NAN).stringify(), "rgb(1, 2, 3)");
		assert_eq!(Color::rgba(1, 2, 3, f64::INFINITY).stringify(), "rgb(1, 2, 3)");
	}

	#[test]
	fn test_lerp() {
		let from = Color::rgba(0, 100, 200, 0.0);
		let to = Color::rgba(255, 200, 0, 1.0);
		assert_eq!(from.lerp(to, 0.0), from);
		assert_eq!(from.lerp(to, 1.0), to);
		assert_eq!(from.lerp(to, 0.5), Color::rgba(128, 150, 100, 0.5));
		// t is clamped
		assert_eq!(from.lerp(to, 2.0), to);
		assert_eq!(from.lerp(to, -1.0), from);
	}

	#[test]
	fn test_default_style_derives_from_primary() {
		let style = Style::default();
		assert_eq!(style.grid_color.stringify(), "rgb(60, 60, 60)");
		assert_eq!(style.node_color.stringify(), "rgb(30, 30, 30)");
		assert_eq!(style.accent.stringify(), "rgb(0, 0, 255)");
		assert_eq!(style.text_color, Color::WHITE);
		assert_eq!(style.font_at(14.0), "14px Arial");
	}

	#[test]
	fn test_partial_style_json() {
		let style: Style =
			serde_json::from_str(r#"{"accent": {"r": 255, "g": 0, "b": 0}, "font": "Inter"}"#)
				.unwrap();
		assert_eq!(style.accent, Color::rgb(255, 0, 0));
		assert_eq!(style.font, "Inter");
		assert_eq!(style.primary, Color::rgb(20, 20, 20));
	}
}
