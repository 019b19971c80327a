use std::sync::Arc;

use crate::config_io;
use crate::config_io::get_conf_d_path;
use crate::config_io::CONFIG_ROOT_PATH;
use anyhow::{bail, Context};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File};
use log::error;
use serde::Deserialize;
use serde::Serialize;

fn def_surface_offset() -> f32 {
    -0.01
}

fn def_half() -> f32 {
    0.5
}

fn def_one() -> f32 {
    1.0
}

fn def_models() -> Vec<Arc<str>> {
    [
        "amanita_a",
        "amanita_b",
        "big_ambrela",
        "boletus",
        "chanterelles",
        "morel",
        "mystical_truffel",
        "russula",
    ]
    .into_iter()
    .map(Arc::from)
    .collect()
}

fn def_near() -> f32 {
    0.1
}

fn def_far() -> f32 {
    1000.0
}

fn def_target_fps() -> u32 {
    60
}

fn def_window_width() -> u32 {
    1920
}

fn def_window_height() -> u32 {
    1080
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Distance along the surface normal applied after placement.
    #[serde(default = "def_surface_offset")]
    pub surface_offset: f32,

    #[serde(default = "def_half")]
    pub spawn_scale_min: f32,

    #[serde(default = "def_one")]
    pub spawn_scale_max: f32,

    #[serde(default = "def_models")]
    pub models: Vec<Arc<str>>,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "def_near")]
    pub near: f32,

    #[serde(default = "def_far")]
    pub far: f32,

    #[serde(default = "def_target_fps")]
    pub target_fps: u32,

    #[serde(default = "def_window_width")]
    pub window_width: u32,

    #[serde(default = "def_window_height")]
    pub window_height: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            surface_offset: def_surface_offset(),
            spawn_scale_min: def_half(),
            spawn_scale_max: def_one(),
            models: def_models(),
            seed: None,
            near: def_near(),
            far: def_far(),
            target_fps: def_target_fps(),
            window_width: def_window_width(),
            window_height: def_window_height(),
        }
    }
}

impl GeneralConfig {
    fn sanitize_range(name: &str, val: f32, from: f32, to: f32) -> anyhow::Result<()> {
        if !val.is_normal() || val < from || val > to {
            bail!(
                "GeneralConfig: {} needs to be between {} and {}",
                name,
                from,
                to
            );
        }
        Ok(())
    }

    pub fn load_from_disk() -> anyhow::Result<GeneralConfig> {
        let config = load_general()?;
        config.post_load()?;
        Ok(config)
    }

    fn post_load(&self) -> anyhow::Result<()> {
        GeneralConfig::sanitize_range("spawn_scale_min", self.spawn_scale_min, 0.001, 10.0)?;
        GeneralConfig::sanitize_range(
            "spawn_scale_max",
            self.spawn_scale_max,
            self.spawn_scale_min,
            10.0,
        )?;
        if !self.far.is_finite() || self.far <= self.near {
            bail!("GeneralConfig: far must be finite and greater than near");
        }
        GeneralConfig::sanitize_range("near", self.near, 0.0001, self.far)?;
        if !self.surface_offset.is_finite() {
            bail!("GeneralConfig: surface_offset must be finite");
        }
        if self.models.is_empty() {
            bail!("GeneralConfig: models must not be empty");
        }
        if self.target_fps == 0 || self.window_width == 0 || self.window_height == 0 {
            bail!("GeneralConfig: target_fps and window size must be non-zero");
        }
        Ok(())
    }
}

const FALLBACKS: [&str; 1] = [include_str!("res/scene.yaml")];

const FILES: [&str; 1] = ["scene.yaml"];

#[derive(Clone, Copy)]
#[repr(usize)]
pub enum ConfigType {
    Scene,
}

pub fn load_known_yaml<T>(config_type: ConfigType) -> T
where
    T: for<'de> Deserialize<'de>,
{
    let fallback = FALLBACKS[config_type as usize];
    let file_name = FILES[config_type as usize];
    let maybe_override = config_io::load(file_name);

    for yaml in [maybe_override.as_deref(), Some(fallback)].iter().flatten() {
        match serde_yaml::from_str::<T>(yaml) {
            Ok(d) => return d,
            Err(e) => {
                error!("Failed to parse {}, falling back to defaults.", file_name);
                error!("{}", e);
            }
        }
    }
    // can only get here if internal fallback is broken
    panic!("No usable config found.");
}

pub fn load_general() -> anyhow::Result<GeneralConfig> {
    let mut settings_builder = Config::builder();

    // Add files from conf.d directory
    let path_conf_d = get_conf_d_path();

    for mut base_conf in [CONFIG_ROOT_PATH.clone(), path_conf_d.clone()] {
        base_conf.push("config.yaml");
        if base_conf.exists() {
            log::info!("Loading config file: {}", base_conf.to_string_lossy());
            settings_builder = settings_builder.add_source(File::from(base_conf));
        }
    }

    if let Ok(paths_unsorted) = std::fs::read_dir(path_conf_d) {
        let mut paths: Vec<_> = paths_unsorted
            .filter_map(|r| match r {
                Ok(entry) => Some(entry),
                Err(e) => {
                    error!("Failed to read conf.d directory: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_name() != "config.yaml")
            .collect();
        // Sort paths alphabetically
        paths.sort_by_key(|dir| dir.path());
        for path in paths {
            log::info!("Loading config file: {}", path.path().to_string_lossy());
            settings_builder = settings_builder.add_source(File::from(path.path()));
        }
    }

    build_general(settings_builder)
}

fn build_general(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<GeneralConfig> {
    builder
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<GeneralConfig>()
        .context("Failed to deserialize settings")
}
