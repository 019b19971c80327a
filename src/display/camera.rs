use glam::{Mat4, Vec4};
use serde::{Deserialize, Serialize};

/// Intrinsics of the passthrough color camera.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeeThroughCamera {
    pub width: f32,
    pub height: f32,
    pub texture_width: f32,
    pub texture_height: f32,
    pub focal_length_x: f32,
    pub focal_length_y: f32,
    /// Principal point, in pixels.
    pub point_x: f32,
    pub point_y: f32,
    /// Sensor mounting rotation in degrees.
    #[serde(default)]
    pub orientation: i32,
}

impl SeeThroughCamera {
    /// Share of the video texture actually covered by the image.
    pub fn uv_extent(&self) -> (f32, f32) {
        (
            self.width / self.texture_width,
            self.height / self.texture_height,
        )
    }

    /// Builds a projection whose frustum matches the camera image on the given viewport.
    pub fn projection(
        &self,
        viewport_width: f32,
        viewport_height: f32,
        near: f32,
        far: f32,
    ) -> CameraProjection {
        let window_landscape = viewport_width > viewport_height;
        let camera_landscape = self.width > self.height;
        let swap = !(window_landscape && camera_landscape);

        let (width, height) = if swap {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };
        let (fx, fy) = if swap {
            (self.focal_length_y, self.focal_length_x)
        } else {
            (self.focal_length_x, self.focal_length_y)
        };
        let (cx, cy) = if swap {
            (self.point_y, self.point_x)
        } else {
            (self.point_x, self.point_y)
        };

        let xscale = near / fx;
        let yscale = near / fy;

        let xoffset = (cx - width / 2.0) * xscale;
        // image Y points down
        let yoffset = -(cy - height / 2.0) * yscale;

        let left = xscale * -width / 2.0 - xoffset;
        let right = xscale * width / 2.0 - xoffset;
        let bottom = yscale * -height / 2.0 - yoffset;
        let top = yscale * height / 2.0 - yoffset;

        CameraProjection {
            matrix: frustum(left, right, bottom, top, near, far),
            fov_deg: (top / near).atan().to_degrees() * 2.0,
            aspect: viewport_width / viewport_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProjection {
    pub matrix: Mat4,
    pub fov_deg: f32,
    pub aspect: f32,
}

/// OpenGL-style off-centre perspective frustum.
fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let x = 2.0 * near / (right - left);
    let y = 2.0 * near / (top - bottom);

    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let c = -(far + near) / (far - near);
    let d = -2.0 * far * near / (far - near);

    Mat4::from_cols(
        Vec4::new(x, 0.0, 0.0, 0.0),
        Vec4::new(0.0, y, 0.0, 0.0),
        Vec4::new(a, b, c, -1.0),
        Vec4::new(0.0, 0.0, d, 0.0),
    )
}
