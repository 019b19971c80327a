use glam::{Mat3, Quat, Vec3};

use crate::math::{to_vec3, VectorInput};

use super::{object::Placeable, PlacementError};

pub const WORLD_UP: Vec3 = Vec3::Y;
pub const WORLD_FORWARD: Vec3 = Vec3::Z;

/// When `|normal . WORLD_UP|` exceeds this (normal within ~60 degrees of vertical),
/// the basis is built against `WORLD_FORWARD` instead of `WORLD_UP`.
/// Must stay at 0.5, placements depend on where the switch happens.
pub const VERTICAL_THRESHOLD: f32 = 0.5;

/// Local axis of a placed object that ends up along the surface normal.
/// Models are authored lying on their side, so this is +X rather than +Y.
pub const NORMAL_AXIS: Vec3 = Vec3::X;

/// Orthonormal frame derived from a surface normal.
/// Columns of the rotation are `[normal, tangent, bitangent]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBasis {
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

impl SurfaceBasis {
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols(self.normal, self.tangent, self.bitangent)
    }

    pub fn to_quat(&self) -> Quat {
        Quat::from_mat3(&self.to_mat3())
    }
}

pub fn reference_axis(normal: Vec3) -> Vec3 {
    if normal.dot(WORLD_UP).abs() > VERTICAL_THRESHOLD {
        WORLD_FORWARD
    } else {
        WORLD_UP
    }
}

/// `plane_normal` must be finite and non-zero; anything else yields NaNs.
pub fn surface_basis(plane_normal: Vec3) -> SurfaceBasis {
    let normal = plane_normal.normalize();
    let reference = reference_axis(normal);

    let bitangent = normal.cross(reference).normalize();
    // re-orthogonalize so the frame is exact whatever the reference was
    let tangent = bitangent.cross(normal).normalize();

    SurfaceBasis {
        normal,
        tangent,
        bitangent,
    }
}

/// Orients `object` so its [`NORMAL_AXIS`] follows `plane`.
/// Returns the basis used, its `normal` is the normalized input.
pub fn rotate_with_plane_normal<'a, P>(
    plane: impl Into<VectorInput<'a>>,
    object: &mut P,
) -> Result<SurfaceBasis, PlacementError>
where
    P: Placeable + ?Sized,
{
    let basis = surface_basis(to_vec3(plane, "plane")?);
    object.set_rotation(basis.to_quat());
    Ok(basis)
}

/// Orients `object` from two caller-chosen axes.
///
/// `normal1` becomes the normal column and `normal2` the tangent column, both
/// exactly as given. Neither is normalized, and `normal2` is not orthogonalized
/// against `normal1`. Only the bitangent is normalized. Callers must pass
/// perpendicular unit vectors if they want a pure rotation; a non-unit `normal1`
/// also scales the offset applied by [`place_between`](super::compose::place_between).
pub fn rotate_from_two_normals<'a, 'b, P>(
    normal1: impl Into<VectorInput<'a>>,
    normal2: impl Into<VectorInput<'b>>,
    object: &mut P,
) -> Result<SurfaceBasis, PlacementError>
where
    P: Placeable + ?Sized,
{
    let normal = to_vec3(normal1, "normal1")?;
    let tangent = to_vec3(normal2, "normal2")?;
    let bitangent = normal.cross(tangent).normalize();

    let basis = SurfaceBasis {
        normal,
        tangent,
        bitangent,
    };
    object.set_rotation(basis.to_quat());
    Ok(basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::object::SceneObject;

    const EPS: f32 = 1e-5;

    fn sample_normals() -> Vec<Vec3> {
        vec![
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::X,
            Vec3::NEG_Z,
            Vec3::new(0.0, 0.99, 0.1),
            Vec3::new(0.0, -0.99, 0.1),
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(0.2, 0.3, -0.9),
            Vec3::new(-5.0, 0.1, 2.0),
            Vec3::new(1.0, 1.0, 1.0) * 0.001,
        ]
    }

    fn assert_orthonormal(basis: &SurfaceBasis) {
        for axis in [basis.normal, basis.tangent, basis.bitangent] {
            assert!((axis.length() - 1.0).abs() < EPS, "{axis} not unit");
        }
        assert!(basis.normal.dot(basis.tangent).abs() < EPS);
        assert!(basis.normal.dot(basis.bitangent).abs() < EPS);
        assert!(basis.tangent.dot(basis.bitangent).abs() < EPS);
        // right handed, so the matrix is a rotation and not a reflection
        assert!((basis.to_mat3().determinant() - 1.0).abs() < EPS);
    }

    #[test]
    fn normal_axis_follows_plane() {
        for n in sample_normals() {
            let mut obj = SceneObject::new("amanita_a".into());
            rotate_with_plane_normal(n, &mut obj).unwrap();
            assert!(
                obj.up().abs_diff_eq(n.normalize(), EPS),
                "normal {n} gave up {}",
                obj.up()
            );
            assert!(obj.rotation.is_normalized());
        }
    }

    #[test]
    fn basis_is_orthonormal() {
        for n in sample_normals() {
            assert_orthonormal(&surface_basis(n));
        }
    }

    #[test]
    fn reference_switches_near_vertical() {
        assert_eq!(reference_axis(Vec3::new(0.0, 0.99, 0.1).normalize()), WORLD_FORWARD);
        assert_eq!(reference_axis(Vec3::NEG_Y), WORLD_FORWARD);
        assert_eq!(reference_axis(Vec3::X), WORLD_UP);
        // exactly on the threshold keeps world up
        assert_eq!(reference_axis(Vec3::new(0.0, 0.5, 0.0)), WORLD_UP);
        assert_eq!(reference_axis(Vec3::new(0.0, 0.51, 0.0)), WORLD_FORWARD);
    }

    #[test]
    fn wall_facing_x_is_identity() {
        let basis = surface_basis(Vec3::X);
        assert!(basis.to_quat().abs_diff_eq(Quat::IDENTITY, EPS));
    }

    #[test]
    fn floor_basis_columns() {
        let basis = surface_basis(Vec3::Y * 10.0);
        assert!(basis.normal.abs_diff_eq(Vec3::Y, EPS));
        assert!(basis.bitangent.abs_diff_eq(Vec3::X, EPS));
        assert!(basis.tangent.abs_diff_eq(Vec3::Z, EPS));
    }

    #[test]
    fn accepts_homogeneous_and_buffers() {
        let mut a = SceneObject::new("morel".into());
        let mut b = SceneObject::new("morel".into());
        rotate_with_plane_normal(glam::Vec4::new(0.0, 1.0, 0.0, -1.5), &mut a).unwrap();
        rotate_with_plane_normal(&[0.0f32, 1.0, 0.0], &mut b).unwrap();
        assert!(a.rotation.abs_diff_eq(b.rotation, EPS));
    }

    #[test]
    fn rejects_short_buffer() {
        let mut obj = SceneObject::new("morel".into());
        let before = obj.rotation;
        let err = rotate_with_plane_normal(&[0.0f32, 1.0], &mut obj).unwrap_err();
        assert_eq!(err, PlacementError::InvalidArgumentType { param: "plane" });
        assert_eq!(obj.rotation, before);
    }

    #[test]
    fn two_normals_column_layout() {
        let mut obj = SceneObject::new("russula".into());
        let basis = rotate_from_two_normals(Vec3::Y, Vec3::Z, &mut obj).unwrap();

        assert!(basis.normal.abs_diff_eq(Vec3::Y, EPS));
        assert!(basis.bitangent.abs_diff_eq(Vec3::X, EPS));
        assert!((obj.rotation * Vec3::X).abs_diff_eq(Vec3::Y, EPS));
        assert!((obj.rotation * Vec3::Y).abs_diff_eq(Vec3::Z, EPS));
        assert!((obj.rotation * Vec3::Z).abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn two_normals_keeps_first_axis_as_given() {
        let mut obj = SceneObject::new("russula".into());
        let long = Vec3::new(0.0, 3.0, 0.0);
        let basis = rotate_from_two_normals(long, Vec3::Z, &mut obj).unwrap();
        assert_eq!(basis.normal, long);
        assert_eq!(basis.to_mat3().x_axis, long);
        assert!(basis.bitangent.abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn two_normals_keeps_second_axis_as_given() {
        let mut obj = SceneObject::new("russula".into());
        let skewed = Vec3::new(0.0, 0.5, 2.0);
        let basis = rotate_from_two_normals(Vec3::Y, skewed, &mut obj).unwrap();
        assert_eq!(basis.tangent, skewed);
        assert!(basis.bitangent.is_normalized());
    }

    #[test]
    fn two_normals_names_bad_parameter() {
        let mut obj = SceneObject::new("russula".into());
        let err = rotate_from_two_normals(Vec3::Y, &[1.0f32], &mut obj).unwrap_err();
        assert_eq!(err, PlacementError::InvalidArgumentType { param: "normal2" });

        let err = rotate_from_two_normals(&[1.0f32], Vec3::Y, &mut obj).unwrap_err();
        assert_eq!(err, PlacementError::InvalidArgumentType { param: "normal1" });
    }
}
