//! 2×2 transform helpers for the 2D pipeline.
//!
//! Matrices are column-major (`glam::Mat2`), matching WGSL `mat2x2<f32>`.

use glam::{Mat2, Vec2};

/// Counter-clockwise rotation by `radians`.
#[inline]
pub fn rotation(radians: f32) -> Mat2 {
    let (sin, cos) = radians.sin_cos();
    Mat2::from_cols(Vec2::new(cos, sin), Vec2::new(-sin, cos))
}

/// Axis-aligned scale.
#[inline]
pub fn scale(x: f32, y: f32) -> Mat2 {
    Mat2::from_diagonal(Vec2::new(x, y))
}

#[inline]
pub fn radians_from_degrees(degrees: f32) -> f32 {
    (degrees / 180.0) * std::f32::consts::PI
}
