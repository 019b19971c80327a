use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use glam::{Affine3A, Quat, Vec3};

use super::orientation::NORMAL_AXIS;

static OBJECT_AUTO_INCREMENT: AtomicUsize = AtomicUsize::new(0);

/// Anything whose transform the placement code may overwrite.
pub trait Placeable {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectID(pub usize);

/// A model instance living in the AR scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectID,
    pub model: Arc<str>,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl SceneObject {
    pub fn new(model: Arc<str>) -> Self {
        Self {
            id: ObjectID(OBJECT_AUTO_INCREMENT.fetch_add(1, Ordering::Relaxed)),
            model,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn transform(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// The direction the surface-aligned axis currently points to.
    pub fn up(&self) -> Vec3 {
        self.rotation * NORMAL_AXIS
    }
}

impl Placeable for SceneObject {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = SceneObject::new("morel".into());
        let b = SceneObject::new("morel".into());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn transform_composes_scale_rotation_translation() {
        let mut obj = SceneObject::new("boletus".into());
        obj.position = Vec3::new(1.0, 2.0, 3.0);
        obj.rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        obj.scale = Vec3::splat(0.5);

        let p = obj.transform().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 2.5, 3.0), 1e-5));
        assert!(obj.up().abs_diff_eq(Vec3::Y, 1e-5));
    }
}
