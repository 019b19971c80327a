use glam::{Vec2, Vec3};

use super::{
    camera::SeeThroughCamera,
    rotation::{reconcile, OrientationIndex},
};

/// Full screen quad in clip space, drawn as two triangles.
pub const QUAD_POSITIONS: [Vec3; 4] = [
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
];
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

pub type QuadUvs = [Vec2; 4];

/// Texture coordinates for each [`OrientationIndex`], given the image extent in the texture.
pub fn uv_table(u: f32, v: f32) -> [QuadUvs; 4] {
    [
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, v),
            Vec2::new(u, 0.0),
            Vec2::new(u, v),
        ],
        [
            Vec2::new(u, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(u, v),
            Vec2::new(0.0, v),
        ],
        [
            Vec2::new(u, v),
            Vec2::new(u, 0.0),
            Vec2::new(0.0, v),
            Vec2::new(0.0, 0.0),
        ],
        [
            Vec2::new(0.0, v),
            Vec2::new(u, v),
            Vec2::new(0.0, 0.0),
            Vec2::new(u, 0.0),
        ],
    ]
}

/// Background quad showing the passthrough camera upright.
///
/// The orientation is re-derived every frame, but `uvs` is only rewritten (and
/// counted as an upload) when it actually changes.
pub struct VideoQuad {
    table: [QuadUvs; 4],
    orientation: OrientationIndex,
    pub uvs: QuadUvs,
    pub uploads: usize,
}

impl VideoQuad {
    pub fn new(camera: &SeeThroughCamera, screen_degrees: i32) -> Self {
        let (u, v) = camera.uv_extent();
        let table = uv_table(u, v);
        let orientation = reconcile(screen_degrees, camera.orientation);

        log::debug!(
            "Video quad starts at orientation {} (uv extent {u}x{v})",
            orientation.get()
        );

        Self {
            table,
            orientation,
            uvs: table[orientation.as_usize()],
            uploads: 1,
        }
    }

    pub const fn orientation(&self) -> OrientationIndex {
        self.orientation
    }

    /// Returns true if the texture coordinates were replaced.
    pub fn update(&mut self, screen_degrees: i32, sensor_degrees: i32) -> bool {
        let orientation = reconcile(screen_degrees, sensor_degrees);
        if orientation == self.orientation {
            return false;
        }

        log::debug!(
            "Video orientation {} -> {} (screen {screen_degrees}, sensor {sensor_degrees})",
            self.orientation.get(),
            orientation.get()
        );

        self.orientation = orientation;
        self.uvs.copy_from_slice(&self.table[orientation.as_usize()]);
        self.uploads += 1;
        true
    }
}
