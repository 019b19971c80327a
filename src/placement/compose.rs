use crate::{
    display::PickedPointAndPlane,
    math::{to_vec3, VectorInput},
};

use super::{
    object::Placeable,
    orientation::{rotate_from_two_normals, rotate_with_plane_normal},
    PlacementError,
};

pub fn position_with_point<'a, P>(
    point: impl Into<VectorInput<'a>>,
    object: &mut P,
) -> Result<(), PlacementError>
where
    P: Placeable + ?Sized,
{
    object.set_position(to_vec3(point, "point")?);
    Ok(())
}

/// Stands `object` on the picked surface.
///
/// The object ends at `point + offset_scale * normalize(plane)`, oriented so its
/// normal axis matches the plane. The displacement reuses the normal from the
/// orientation step rather than the raw input, so it always runs along the axis
/// the object is facing. A negative `offset_scale` sinks the object slightly
/// into the surface to hide a model's base.
pub fn place_and_orient<P>(
    picked: &PickedPointAndPlane,
    object: &mut P,
    offset_scale: f32,
) -> Result<(), PlacementError>
where
    P: Placeable + ?Sized,
{
    let basis = rotate_with_plane_normal(picked.plane, object)?;
    position_with_point(picked.point, object)?;
    object.set_position(object.position() + basis.normal * offset_scale);
    Ok(())
}

/// Two-axis counterpart of [`place_and_orient`], for objects spanning two anchors.
///
/// Unlike the single plane path, the offset runs along `normal1` as given, so a
/// non-unit `normal1` scales the displacement.
pub fn place_between<'a, 'b, 'c, P>(
    position: impl Into<VectorInput<'a>>,
    normal1: impl Into<VectorInput<'b>>,
    normal2: impl Into<VectorInput<'c>>,
    object: &mut P,
    offset_scale: f32,
) -> Result<(), PlacementError>
where
    P: Placeable + ?Sized,
{
    let position = to_vec3(position, "position")?;
    let basis = rotate_from_two_normals(normal1, normal2, object)?;
    object.set_position(position + basis.normal * offset_scale);
    Ok(())
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;
    use crate::placement::object::SceneObject;

    const EPS: f32 = 1e-5;

    fn picked(point: Vec3, normal: Vec3) -> PickedPointAndPlane {
        PickedPointAndPlane {
            point,
            plane: normal.extend(0.0),
        }
    }

    #[test]
    fn floor_placement_sinks_slightly() {
        let mut obj = SceneObject::new("chanterelles".into());
        let pp = picked(Vec3::new(1.0, 2.0, 3.0), Vec3::Y);

        place_and_orient(&pp, &mut obj, -0.01).unwrap();

        assert!(obj.position.abs_diff_eq(Vec3::new(1.0, 1.99, 3.0), EPS));
        assert!(obj.up().abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn offset_uses_normalized_normal() {
        let mut obj = SceneObject::new("chanterelles".into());
        let pp = picked(Vec3::ZERO, Vec3::new(0.0, 0.0, -40.0));

        place_and_orient(&pp, &mut obj, 0.5).unwrap();

        assert!(obj.position.abs_diff_eq(Vec3::new(0.0, 0.0, -0.5), EPS));
        assert!(obj.up().abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn placement_is_deterministic() {
        let pp = PickedPointAndPlane {
            point: Vec3::new(-0.3, 0.7, 2.2),
            plane: Vec4::new(0.3, 0.8, -0.1, 1.2),
        };

        let mut a = SceneObject::new("morel".into());
        place_and_orient(&pp, &mut a, -0.01).unwrap();
        let first = (a.position, a.rotation);

        place_and_orient(&pp, &mut a, -0.01).unwrap();
        assert_eq!((a.position, a.rotation), first);

        let mut b = SceneObject::new("morel".into());
        b.position = Vec3::splat(100.0);
        place_and_orient(&pp, &mut b, -0.01).unwrap();
        assert_eq!((b.position, b.rotation), first);
    }

    #[test]
    fn short_point_buffer_is_rejected() {
        let mut obj = SceneObject::new("boletus".into());
        let err = position_with_point(&[1.0f32, 2.0], &mut obj).unwrap_err();
        assert_eq!(err, PlacementError::InvalidArgumentType { param: "point" });
        assert_eq!(obj.position, Vec3::ZERO);
    }

    #[test]
    fn place_between_offsets_along_first_normal() {
        let mut obj = SceneObject::new("big_ambrela".into());
        place_between(&[1.0f32, 0.0, 0.0], Vec3::Y, Vec3::Z, &mut obj, 0.25).unwrap();

        assert!(obj.position.abs_diff_eq(Vec3::new(1.0, 0.25, 0.0), EPS));
        assert!(obj.up().abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn place_between_offset_follows_unnormalized_first_normal() {
        let mut obj = SceneObject::new("big_ambrela".into());
        place_between(
            &[1.0f32, 0.0, 0.0],
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::Z,
            &mut obj,
            0.25,
        )
        .unwrap();

        assert!(obj.position.abs_diff_eq(Vec3::new(1.0, 0.75, 0.0), EPS));
    }

    #[test]
    fn place_between_rejects_bad_position() {
        let mut obj = SceneObject::new("big_ambrela".into());
        let err = place_between(&[1.0f32], Vec3::Y, Vec3::Z, &mut obj, 0.0).unwrap_err();
        assert_eq!(err, PlacementError::InvalidArgumentType { param: "position" });
    }
}
