//! wgpu render backend for the voxel wallpaper.
//!
//! Provides the graphics context handed to surface renderers, render targets,
//! pipelines and the [`VoxelScene`] application.
//!
//! # Invariants
//! - All GPU state is owned by [`GpuContext`] or by the scene's resources and
//!   is rebuilt on every surface creation.
//! - Animation and camera state live in the scene, outside the GPU resources,
//!   so they survive context loss.

mod capability;
mod config;
mod context;
mod gpu;
mod scene;
mod shaders;
mod target;

pub use capability::{adapter_capability, gles_version_for, limits_for};
pub use config::{
    CameraConfig, ConfigError, CoordinateSystemConfig, CubeConfig, ModelConfig, SceneConfig,
    TerrainConfig,
};
pub use context::{GpuContext, GpuError};
pub use gpu::{FullscreenQuad, GpuMesh, MeshPipelines};
pub use scene::{SceneObject, VoxelScene, VoxelSceneFactory, build_objects};
pub use target::{RenderTarget, ScreenTarget, TextureTarget, begin_pass};

pub fn crate_info() -> &'static str {
    "voxelwall-render-wgpu v0.1.0"
}
