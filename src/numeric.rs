/*

    Declare numeric types used throughout this repo.

    Everything is computed in double precision, raw
    positions read as f32 from glTF buffers are widened
    before any transform is applied.

    @date: 2 Oct, 2025
    @author: Bartu
*/

use bevy_math::{DMat4, DVec3, DVec4};
pub type Float = f64;
pub type Vector3 = DVec3;
pub type Vector4 = DVec4;
pub type Matrix4 = DMat4;

/// Homogeneous 1x4 row vector, w is always 1 for positions.
pub type Point = Vector4;

pub const EPSILON: Float = 1e-9;

pub fn approx_zero(x: Float) -> bool {
    x.abs() < EPSILON
}

pub fn approx_eq(a: Float, b: Float) -> bool {
    approx_zero(a - b)
}

pub fn approx_eq_vec3(a: &Vector3, b: &Vector3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

/// Extend a position to a homogeneous point (w = 1).
pub fn homogeneous(x: Float, y: Float, z: Float) -> Point {
    Point::new(x, y, z, 1.0)
}
