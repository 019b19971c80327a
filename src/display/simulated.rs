use anyhow::ensure;
use glam::{Affine3A, Quat, Vec3};
use serde::Deserialize;

use crate::math::is_usable_direction;

use super::{
    camera::SeeThroughCamera, rotation::DisplayRotation, ArDisplay, PickedPointAndPlane,
};

fn def_name() -> String {
    "Simulated Tango".into()
}

fn def_zero() -> f32 {
    0.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenePose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Flat disc of sensed geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenePlane {
    pub name: String,
    pub center: Vec3,
    pub normal: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "def_name")]
    pub name: String,
    pub camera: SeeThroughCamera,
    pub pose: ScenePose,
    /// Yaw applied to the pose every frame, in radians.
    #[serde(default = "def_zero")]
    pub yaw_per_frame: f32,
    pub planes: Vec<ScenePlane>,
}

/// Headless stand-in for a Tango display, picking against a handful of planes.
pub struct SimulatedDisplay {
    name: String,
    camera: SeeThroughCamera,
    pose: Affine3A,
    yaw_per_frame: f32,
    planes: Vec<ScenePlane>,
    screen_rotation: DisplayRotation,
}

impl SimulatedDisplay {
    pub fn from_scene(scene: SceneConfig) -> anyhow::Result<Self> {
        let cam = &scene.camera;
        ensure!(
            cam.width > 0.0 && cam.height > 0.0,
            "Camera size must be positive"
        );
        ensure!(
            cam.texture_width >= cam.width && cam.texture_height >= cam.height,
            "Camera texture must be at least as large as the image"
        );
        ensure!(
            cam.focal_length_x > 0.0 && cam.focal_length_y > 0.0,
            "Camera focal lengths must be positive"
        );
        ensure!(
            scene.pose.rotation.is_finite() && scene.pose.position.is_finite(),
            "Scene pose must be finite"
        );

        for plane in &scene.planes {
            ensure!(
                is_usable_direction(plane.normal),
                "Plane {} has an unusable normal",
                plane.name
            );
            ensure!(
                plane.radius > 0.0,
                "Plane {} needs a positive radius",
                plane.name
            );
        }

        log::info!(
            "Simulated display '{}' with {} planes",
            scene.name,
            scene.planes.len()
        );

        Ok(Self {
            name: scene.name,
            camera: scene.camera,
            pose: Affine3A::from_rotation_translation(
                scene.pose.rotation.normalize(),
                scene.pose.position,
            ),
            yaw_per_frame: scene.yaw_per_frame,
            planes: scene.planes,
            screen_rotation: DisplayRotation::Deg0,
        })
    }

    pub fn set_screen_rotation(&mut self, rotation: DisplayRotation) {
        self.screen_rotation = rotation;
    }

    pub fn rotate_screen(&mut self) {
        self.screen_rotation = self.screen_rotation.rotated_cw();
        log::info!("Screen rotated to {}", self.screen_rotation.degrees());
    }

    pub fn set_sensor_rotation(&mut self, rotation: DisplayRotation) {
        self.camera.orientation = rotation.degrees();
    }

    /// Ray through a normalized image position, in world space.
    fn ray(&self, screen_x: f32, screen_y: f32) -> (Vec3, Vec3) {
        let px = screen_x * self.camera.width;
        let py = screen_y * self.camera.height;

        // camera looks down -Z, image Y points down
        let local = Vec3::new(
            (px - self.camera.point_x) / self.camera.focal_length_x,
            -(py - self.camera.point_y) / self.camera.focal_length_y,
            -1.0,
        );

        (
            Vec3::from(self.pose.translation),
            self.pose.transform_vector3(local).normalize(),
        )
    }
}

impl ArDisplay for SimulatedDisplay {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn update_pose(&mut self) {
        if self.yaw_per_frame != 0.0 {
            let translation = self.pose.translation;
            self.pose = Affine3A::from_rotation_y(self.yaw_per_frame) * self.pose;
            self.pose.translation = translation;
        }
    }

    fn pose(&self) -> Affine3A {
        self.pose
    }

    fn picking_point_and_plane(
        &self,
        screen_x: f32,
        screen_y: f32,
    ) -> Option<PickedPointAndPlane> {
        let (origin, dir) = self.ray(screen_x, screen_y);

        let mut nearest: Option<(f32, &ScenePlane)> = None;
        for plane in &self.planes {
            let normal = plane.normal.normalize();
            let denom = dir.dot(normal);
            if denom.abs() < f32::EPSILON {
                continue;
            }

            let dist = (plane.center - origin).dot(normal) / denom;
            if dist <= 0.0 {
                // behind the camera
                continue;
            }

            let hit = origin + dir * dist;
            if hit.distance(plane.center) > plane.radius {
                continue;
            }

            if nearest.map_or(true, |(d, _)| dist < d) {
                nearest = Some((dist, plane));
            }
        }

        let (dist, plane) = nearest?;
        let normal = plane.normal.normalize();
        log::trace!("Picked {} at distance {dist}", plane.name);

        Some(PickedPointAndPlane {
            point: origin + dir * dist,
            plane: normal.extend(-normal.dot(plane.center)),
        })
    }

    fn screen_rotation(&self) -> i32 {
        self.screen_rotation.degrees()
    }

    fn see_through_camera(&self) -> &SeeThroughCamera {
        &self.camera
    }
}
