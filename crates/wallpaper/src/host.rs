use voxelwall_common::ScreenDimensions;

use crate::capability::GlesVersion;
use crate::renderer::SurfaceRenderer;

/// Capabilities the wallpaper host service provides to the engine.
///
/// The host owns the surface, its graphics context and the thread the
/// lifecycle callbacks run on. The engine only calls into it.
pub trait WallpaperHost {
    /// Graphics context passed to the installed renderer's callbacks.
    type Gpu;

    /// Graphics API level supported by the device.
    fn query_capability(&self) -> GlesVersion;

    /// Request a specific client API major version for the context.
    fn set_context_client_version(&mut self, major: u32);

    /// Keep the graphics context alive across pause/resume instead of
    /// recreating it.
    fn set_preserve_context_on_pause(&mut self, enabled: bool);

    /// Bind `renderer` to the surface for all subsequent frame callbacks.
    fn set_renderer(&mut self, renderer: Box<dyn SurfaceRenderer<Self::Gpu>>);
}

/// Lifecycle notifications the host delivers to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Created,
    Changed(ScreenDimensions),
    Paused,
    Resumed,
    Destroyed,
}
