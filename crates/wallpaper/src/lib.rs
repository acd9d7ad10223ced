//! Live-wallpaper adapter: gates renderer installation on the host's graphics
//! capability and hands the surface to a variant-supplied renderer.
//!
//! # Invariants
//! - A renderer is installed at most once per surface-creation event.
//! - A renderer is installed only when the host reports at least
//!   [`MIN_GLES_VERSION`]. Otherwise the surface is left untouched.
//! - The engine owns no loop; the host drives it with [`SurfaceEvent`]s.

mod app;
mod capability;
mod engine;
mod host;
mod recording;
mod renderer;

pub use app::{Application, ApplicationRenderer, FrameClock};
pub use capability::{
    CONTEXT_CLIENT_VERSION, GlesVersion, MIN_GLES_VERSION, ParseGlesVersionError,
};
pub use engine::{SurfaceState, WallpaperEngine};
pub use host::{SurfaceEvent, WallpaperHost};
pub use recording::{HostCall, RecordingHost};
pub use renderer::{RendererFactory, SurfaceRenderer};

pub fn crate_info() -> &'static str {
    "voxelwall-wallpaper v0.1.0"
}
