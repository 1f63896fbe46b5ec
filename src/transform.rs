/*

    4x4 transforms under the row-vector convention.

    A point is a 1x4 row vector multiplied on the left,
    p' = p * M, so a chain of local matrices ordered
    [own, parent, ..., root] maps node-local space into
    world space when composed left to right.

    Flat 16 element sequences are read row-major. Under
    this convention translation sits in elements 12..14,
    which is exactly where glTF puts it.

    Internally the matrix is stored as the column-vector
    transpose (a glam DMat4 built from the flat data as
    columns), so p * M becomes a single M^T * p product.

    @date: Nov, 2025
    @author: bartu
*/

use std::ops::Mul;

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(from = "[Float; 16]", into = "[Float; 16]")]
pub struct RowMatrix {
    transposed: Matrix4,
}

impl Default for RowMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[Float; 16]> for RowMatrix {
    fn from(data: [Float; 16]) -> Self {
        Self::from_row_major(data)
    }
}

impl From<RowMatrix> for [Float; 16] {
    fn from(m: RowMatrix) -> Self {
        m.to_row_major()
    }
}

impl RowMatrix {
    pub const IDENTITY: Self = Self { transposed: Matrix4::IDENTITY };

    pub fn from_row_major(data: [Float; 16]) -> Self {
        Self { transposed: Matrix4::from_cols_array(&data) }
    }

    pub fn to_row_major(&self) -> [Float; 16] {
        self.transposed.to_cols_array()
    }

    pub fn translation(x: Float, y: Float, z: Float) -> Self {
        Self { transposed: Matrix4::from_translation(Vector3::new(x, y, z)) }
    }

    pub fn scale(x: Float, y: Float, z: Float) -> Self {
        Self { transposed: Matrix4::from_scale(Vector3::new(x, y, z)) }
    }

    pub fn uniform_scale(s: Float) -> Self {
        Self::scale(s, s, s)
    }

    /// self * other, i.e. apply self first, then other.
    pub fn then(&self, other: &RowMatrix) -> RowMatrix {
        // (A B)^T = B^T A^T
        Self { transposed: other.transposed * self.transposed }
    }

    pub fn is_identity(&self) -> bool {
        self.transposed == Matrix4::IDENTITY
    }
}

impl Mul for RowMatrix {
    type Output = RowMatrix;

    fn mul(self, rhs: RowMatrix) -> RowMatrix {
        self.then(&rhs)
    }
}

/// Multiply an ordered sequence of matrices left to right.
/// Empty input yields the identity.
pub fn compose<'a, I>(matrices: I) -> RowMatrix
where
    I: IntoIterator<Item = &'a RowMatrix>,
{
    matrices
        .into_iter()
        .fold(RowMatrix::IDENTITY, |acc, m| acc.then(m))
}

/// Row vector times matrix. The input point is left untouched.
pub fn apply(point: &Point, m: &RowMatrix) -> Point {
    m.transposed * *point
}
