use std::path::PathBuf;

use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::GeneralConfig,
    config_io,
    display::{camera::CameraProjection, video::VideoQuad, ArDisplay},
    math::is_usable_direction,
    placement::{
        compose::place_and_orient,
        object::{ObjectID, SceneObject},
    },
};

pub struct AppSession {
    pub config_root_path: PathBuf,
    pub config: GeneralConfig,
}

impl AppSession {
    pub fn load() -> anyhow::Result<Self> {
        let config_root_path = config_io::ensure_config_root();
        log::info!("Config root path: {}", config_root_path.to_string_lossy());
        let config = GeneralConfig::load_from_disk()?;

        Ok(AppSession {
            config_root_path,
            config,
        })
    }
}

pub struct AppState<D>
where
    D: ArDisplay,
{
    pub session: AppSession,
    pub display: D,
    pub video: VideoQuad,
    pub projection: CameraProjection,
    pub objects: Vec<SceneObject>,
    rng: StdRng,
}

impl<D> AppState<D>
where
    D: ArDisplay,
{
    pub fn new(session: AppSession, display: D) -> Self {
        let rng = match session.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let camera = display.see_through_camera();
        let video = VideoQuad::new(camera, display.screen_rotation());
        let projection = camera.projection(
            session.config.window_width as f32,
            session.config.window_height as f32,
            session.config.near,
            session.config.far,
        );

        log::info!(
            "Using AR display '{}', vertical fov {:.1} degrees",
            display.display_name(),
            projection.fov_deg
        );

        AppState {
            session,
            display,
            video,
            projection,
            objects: Vec::new(),
            rng,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let config = &self.session.config;
        self.projection = self.display.see_through_camera().projection(
            width as f32,
            height as f32,
            config.near,
            config.far,
        );

        if !self.projection.matrix.is_finite() {
            log::warn!("Projection for {width}x{height} is degenerate");
        }
        log::debug!(
            "Viewport {width}x{height}, fov {:.1}, projection {:?}",
            self.projection.fov_deg,
            self.projection.matrix
        );
    }

    /// Places a random model where the user tapped.
    ///
    /// Returns `Ok(None)` when the display found no usable surface there.
    pub fn on_tap(&mut self, screen_x: f32, screen_y: f32) -> anyhow::Result<Option<ObjectID>> {
        let config = &self.session.config;
        let model = config.models[self.rng.gen_range(0..config.models.len())].clone();
        let scale = self
            .rng
            .gen_range(config.spawn_scale_min..=config.spawn_scale_max);

        let Some(picked) = self.display.picking_point_and_plane(screen_x, screen_y) else {
            log::debug!("No surface at ({screen_x:.3}, {screen_y:.3})");
            return Ok(None);
        };

        if !picked.point.is_finite() || !is_usable_direction(picked.plane.truncate()) {
            log::warn!("Display returned a degenerate pick: {picked:?}");
            return Ok(None);
        }

        let mut object = SceneObject::new(model);
        place_and_orient(&picked, &mut object, config.surface_offset)?;
        object.scale = Vec3::splat(scale);

        log::info!(
            "Placed {} #{} at {:.3} facing {:.3} (scale {scale:.2})",
            object.model,
            object.id.0,
            object.position,
            object.up()
        );

        let id = object.id;
        self.objects.push(object);
        Ok(Some(id))
    }

    /// Per-frame update. Returns true if the video texture coordinates changed.
    pub fn frame(&mut self) -> bool {
        self.display.update_pose();
        self.video.update(
            self.display.screen_rotation(),
            self.display.sensor_rotation(),
        )
    }
}
