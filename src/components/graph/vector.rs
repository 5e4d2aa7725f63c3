//! Two-dimensional vector value type.
//!
//! [`Vec2`] is a plain `Copy` value: every operation returns a new vector and
//! never mutates its receiver. Division is the only partial operation and is
//! checked, see [`Vec2::checked_div`].

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::error::{GraphError, Result};

/// A 2D vector or point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
	pub x: f64,
	pub y: f64,
}

impl Vec2 {
	/// The zero vector.
	pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Build a vector from its polar form.
	pub fn from_polar(length: f64, angle: f64) -> Self {
		Self::new(length * angle.cos(), length * angle.sin())
	}

	/// Component-wise difference, same as `self - v`.
	pub fn subtract(self, v: Vec2) -> Self {
		Self::new(self.x - v.x, self.y - v.y)
	}

	/// Multiply both components by `a`.
	pub fn scale(self, a: f64) -> Self {
		Self::new(self.x * a, self.y * a)
	}

	/// Divide both components by `a`.
	///
	/// Fails with [`GraphError::ZeroDivisor`] when `a` is zero or NaN instead of
	/// producing non-finite components.
	pub fn checked_div(self, a: f64) -> Result<Self> {
		if a == 0.0 || a.is_nan() {
			return Err(GraphError::ZeroDivisor(a));
		}
		Ok(Self::new(self.x / a, self.y / a))
	}

	/// Euclidean norm.
	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}

	/// Polar angle in radians, `atan2(y, x)`, in `(-π, π]`.
	pub fn angle(self) -> f64 {
		self.y.atan2(self.x)
	}

	pub fn distance(self, other: Vec2) -> f64 {
		(self - other).length()
	}
}

impl Add for Vec2 {
	type Output = Vec2;

	fn add(self, v: Vec2) -> Vec2 {
		Vec2::new(self.x + v.x, self.y + v.y)
	}
}

impl Sub for Vec2 {
	type Output = Vec2;

	fn sub(self, v: Vec2) -> Vec2 {
		self.subtract(v)
	}
}

impl Mul<f64> for Vec2 {
	type Output = Vec2;

	fn mul(self, a: f64) -> Vec2 {
		self.scale(a)
	}
}

impl Neg for Vec2 {
	type Output = Vec2;

	fn neg(self) -> Vec2 {
		Vec2::new(-self.x, -self.y)
	}
}
