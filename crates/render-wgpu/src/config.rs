use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxelwall_common::Color;
use voxelwall_render::TerrainDimensions;

/// Errors from reading a scene configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scene config: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the voxel wallpaper scene shows and how it moves. Every field has a
/// default, so a config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub clear_color: Color,
    /// Resolution of the offscreen pass relative to the screen.
    pub render_scale: f32,
    /// Spin of the cube and the model, in radians per second.
    pub rotation_speed: f32,
    pub camera: CameraConfig,
    pub cube: Option<CubeConfig>,
    pub coordinate_system: Option<CoordinateSystemConfig>,
    pub model: Option<ModelConfig>,
    pub terrain: Option<TerrainConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::new(0.1, 0.1, 0.15, 1.0),
            render_scale: 1.0,
            rotation_speed: std::f32::consts::PI,
            camera: CameraConfig::default(),
            cube: Some(CubeConfig::default()),
            coordinate_system: Some(CoordinateSystemConfig::default()),
            model: None,
            terrain: Some(TerrainConfig::default()),
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        tracing::info!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
    /// Radians per second around the target. Zero keeps the camera fixed.
    pub orbit_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 4.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 90.0,
            orbit_speed: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    pub color: Color,
    pub scale: f32,
    pub translation: Vec3,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            color: Color::new(0.09, 0.59, 0.13, 1.0),
            scale: 2.0,
            translation: Vec3::new(-0.5, 0.0, -0.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateSystemConfig {
    pub scale: f32,
}

impl Default for CoordinateSystemConfig {
    fn default() -> Self {
        Self { scale: 2.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// MagicaVoxel `.vox` file.
    pub path: PathBuf,
    #[serde(default)]
    pub frame: usize,
    #[serde(default = "default_model_scale")]
    pub scale: f32,
}

fn default_model_scale() -> f32 {
    0.25
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub dimensions: TerrainDimensions,
    pub voxel_scale: f32,
    pub frequency: f32,
    pub amplitude: f32,
    /// Extra scale on top of the voxel size.
    pub scale: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            dimensions: TerrainDimensions::new(3.0, 3.0),
            voxel_scale: 50.0,
            frequency: 1.0,
            amplitude: 0.5,
            scale: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = SceneConfig::from_json(
            r#"{
                "render_scale": 0.5,
                "camera": { "orbit_speed": 0.25 },
                "cube": null,
                "model": { "path": "fox.vox" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.render_scale, 0.5);
        assert_eq!(config.camera.orbit_speed, 0.25);
        assert_eq!(config.camera.fov_degrees, 90.0);
        assert!(config.cube.is_none());
        let model = config.model.unwrap();
        assert_eq!(model.path, PathBuf::from("fox.vox"));
        assert_eq!(model.scale, 0.25);
        assert_eq!(model.frame, 0);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            SceneConfig::from_json("{ render_scale: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let mut config = SceneConfig::default();
        config.terrain = None;
        std::fs::write(&path, config.to_json().unwrap()).unwrap();
        assert_eq!(SceneConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SceneConfig::load(dir.path().join("absent.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
