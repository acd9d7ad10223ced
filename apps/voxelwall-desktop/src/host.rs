use std::sync::Arc;

use voxelwall_common::ScreenDimensions;
use voxelwall_render_wgpu::{GpuContext, adapter_capability};
use voxelwall_wallpaper::{GlesVersion, SurfaceRenderer, WallpaperHost};
use winit::window::Window;

/// Capability the host reports: an explicit override wins, then the adapter.
/// Without an adapter there is no usable context at all.
pub fn reported_capability(
    override_version: Option<GlesVersion>,
    adapter: Option<GlesVersion>,
) -> GlesVersion {
    override_version
        .or(adapter)
        .unwrap_or(GlesVersion::ES_2_0)
}

/// Whether a pause drops the GPU context. It is kept only when the engine
/// requested preservation and the host allows it.
pub fn releases_context(preserve_requested: bool, allow_preserve: bool) -> bool {
    !(preserve_requested && allow_preserve)
}

/// A wallpaper host backed by a winit window and a wgpu adapter.
///
/// Owns the GPU context and the installed renderer and forwards surface
/// lifecycle callbacks to it.
pub struct DesktopHost {
    instance: wgpu::Instance,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    adapter: Option<wgpu::Adapter>,
    capability_override: Option<GlesVersion>,
    allow_preserve: bool,
    context_version: u32,
    preserve_on_pause: bool,
    renderer: Option<Box<dyn SurfaceRenderer<GpuContext>>>,
    gpu: Option<GpuContext>,
}

impl DesktopHost {
    pub fn new(capability_override: Option<GlesVersion>, allow_preserve: bool) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        Self {
            instance,
            window: None,
            surface: None,
            adapter: None,
            capability_override,
            allow_preserve,
            context_version: 0,
            preserve_on_pause: false,
            renderer: None,
            gpu: None,
        }
    }

    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    /// Adopt the window and pick an adapter that can present to it.
    pub fn attach_window(&mut self, window: Arc<Window>) {
        let surface = match GpuContext::create_surface(&self.instance, window.clone()) {
            Ok(surface) => surface,
            Err(e) => {
                tracing::error!("failed to create surface: {e}");
                self.window = Some(window);
                return;
            }
        };
        self.adapter = pollster::block_on(self.instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            },
        ));
        match &self.adapter {
            Some(adapter) => tracing::info!(
                adapter = %adapter.get_info().name,
                backend = adapter.get_info().backend.to_str(),
                "adapter selected"
            ),
            None => tracing::warn!("no graphics adapter can present to the window"),
        }
        self.surface = Some(surface);
        self.window = Some(window);
    }

    fn dimensions(&self) -> ScreenDimensions {
        self.window
            .as_ref()
            .map(|w| {
                let size = w.inner_size();
                ScreenDimensions::new(size.width, size.height)
            })
            .unwrap_or_default()
    }

    /// Make sure a GPU context exists and tell the renderer about it. Without
    /// an installed renderer nothing happens and the window stays blank.
    pub fn surface_created(&mut self) {
        if self.renderer.is_none() || self.gpu.is_some() {
            return;
        }
        let (Some(window), Some(adapter)) = (&self.window, &self.adapter) else {
            return;
        };

        // The surface the adapter was chosen for is used first. After a
        // released context a new one is made for the same window.
        let surface = match self.surface.take() {
            Some(surface) => surface,
            None => match GpuContext::create_surface(&self.instance, window.clone()) {
                Ok(surface) => surface,
                Err(e) => {
                    tracing::error!("failed to create surface: {e}");
                    return;
                }
            },
        };

        let dimensions = self.dimensions();
        let context = pollster::block_on(GpuContext::new(
            adapter,
            surface,
            dimensions,
            self.context_version,
        ));
        let mut gpu = match context {
            Ok(gpu) => gpu,
            Err(e) => {
                tracing::error!("failed to create GPU context: {e}");
                return;
            }
        };

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.on_surface_created(&mut gpu);
            renderer.on_surface_changed(&mut gpu, dimensions);
        }
        self.gpu = Some(gpu);
    }

    pub fn surface_changed(&mut self, dimensions: ScreenDimensions) {
        if let (Some(renderer), Some(gpu)) = (self.renderer.as_mut(), self.gpu.as_mut()) {
            gpu.resize(dimensions);
            renderer.on_surface_changed(gpu, dimensions);
        }
    }

    pub fn draw_frame(&mut self) {
        if let (Some(renderer), Some(gpu)) = (self.renderer.as_mut(), self.gpu.as_mut()) {
            renderer.on_draw_frame(gpu);
        }
    }

    /// Drop the GPU context unless the engine asked to preserve it and this
    /// host allows it.
    pub fn pause(&mut self) {
        if self.gpu.is_some() && releases_context(self.preserve_on_pause, self.allow_preserve) {
            tracing::info!("releasing GPU context while paused");
            self.gpu = None;
        }
    }

    pub fn destroy(&mut self) {
        self.gpu = None;
        self.surface = None;
        self.renderer = None;
    }
}

impl WallpaperHost for DesktopHost {
    type Gpu = GpuContext;

    fn query_capability(&self) -> GlesVersion {
        let adapter = self.adapter.as_ref().map(adapter_capability);
        reported_capability(self.capability_override, adapter)
    }

    fn set_context_client_version(&mut self, major: u32) {
        self.context_version = major;
    }

    fn set_preserve_context_on_pause(&mut self, enabled: bool) {
        self.preserve_on_pause = enabled;
    }

    fn set_renderer(&mut self, renderer: Box<dyn SurfaceRenderer<GpuContext>>) {
        // A new renderer owns fresh GPU state.
        self.gpu = None;
        self.renderer = Some(renderer);
    }
}
