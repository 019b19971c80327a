use glam::{Vec3, Vec4};

use crate::placement::PlacementError;

/// Any of the vector shapes the AR display hands out.
#[derive(Debug, Clone, Copy)]
pub enum VectorInput<'a> {
    Vec3(Vec3),
    /// Homogeneous form; `w` is ignored.
    Vec4(Vec4),
    /// Raw buffer as returned by the device, needs at least 3 elements.
    Buffer(&'a [f32]),
}

impl From<Vec3> for VectorInput<'_> {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for VectorInput<'_> {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

impl<'a> From<&'a [f32]> for VectorInput<'a> {
    fn from(buf: &'a [f32]) -> Self {
        Self::Buffer(buf)
    }
}

impl<'a> From<&'a Vec<f32>> for VectorInput<'a> {
    fn from(buf: &'a Vec<f32>) -> Self {
        Self::Buffer(buf.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [f32; N]> for VectorInput<'a> {
    fn from(buf: &'a [f32; N]) -> Self {
        Self::Buffer(buf.as_slice())
    }
}

/// Collapses a [`VectorInput`] into a `Vec3`. `param` names the argument in the error.
pub fn to_vec3<'a>(
    input: impl Into<VectorInput<'a>>,
    param: &'static str,
) -> Result<Vec3, PlacementError> {
    match input.into() {
        VectorInput::Vec3(v) => Ok(v),
        VectorInput::Vec4(v) => Ok(v.truncate()),
        VectorInput::Buffer(&[x, y, z, ..]) => Ok(Vec3::new(x, y, z)),
        VectorInput::Buffer(_) => Err(PlacementError::InvalidArgumentType { param }),
    }
}

/// True if `v` can be normalized into a meaningful direction.
pub fn is_usable_direction(v: Vec3) -> bool {
    v.is_finite() && v.length_squared() > f32::EPSILON
}
