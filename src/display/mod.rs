pub mod camera;
pub mod rotation;
pub mod simulated;
pub mod video;

use glam::{Affine3A, Vec3, Vec4};

use self::camera::SeeThroughCamera;

/// Surface hit reported by the display's point cloud picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickedPointAndPlane {
    /// World space position on the surface.
    pub point: Vec3,
    /// Plane normal in xyz (either side of the surface), signed distance in w.
    pub plane: Vec4,
}

/// A point cloud capable AR display with a passthrough camera.
pub trait ArDisplay {
    fn display_name(&self) -> &str;

    /// Advances tracking to the current frame.
    fn update_pose(&mut self);
    fn pose(&self) -> Affine3A;

    /// Picks the sensed surface under normalized screen coordinates.
    /// `None` means no surface was found there.
    fn picking_point_and_plane(&self, screen_x: f32, screen_y: f32)
        -> Option<PickedPointAndPlane>;

    /// Current screen rotation in degrees.
    fn screen_rotation(&self) -> i32;

    fn see_through_camera(&self) -> &SeeThroughCamera;

    /// Current camera sensor rotation in degrees.
    fn sensor_rotation(&self) -> i32 {
        self.see_through_camera().orientation
    }
}
