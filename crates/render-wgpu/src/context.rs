use voxelwall_common::ScreenDimensions;

use crate::capability::limits_for;

/// Errors from creating or using a GPU context.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("adapter cannot present to this surface")]
    UnsupportedSurface,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// The graphics context renderers draw with: device, queue and a configured
/// window surface.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    context_version: u32,
}

impl GpuContext {
    /// Create a window surface. Request the adapter against it so the
    /// adapter is known to be able to present.
    pub fn create_surface(
        instance: &wgpu::Instance,
        target: impl Into<wgpu::SurfaceTarget<'static>>,
    ) -> Result<wgpu::Surface<'static>, GpuError> {
        Ok(instance.create_surface(target)?)
    }

    /// Create a context presenting to `surface`, honouring the requested
    /// client API major version.
    pub async fn new(
        adapter: &wgpu::Adapter,
        surface: wgpu::Surface<'static>,
        dimensions: ScreenDimensions,
        context_version: u32,
    ) -> Result<Self, GpuError> {
        if !adapter.is_surface_supported(&surface) {
            return Err(GpuError::UnsupportedSurface);
        }

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("voxelwall_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: limits_for(context_version).using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: dimensions.width.max(1),
            height: dimensions.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            context_version,
            ?format,
            "GPU context created"
        );

        Ok(Self {
            device,
            queue,
            surface,
            config,
            context_version,
        })
    }

    pub fn context_version(&self) -> u32 {
        self.context_version
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn dimensions(&self) -> ScreenDimensions {
        ScreenDimensions::new(self.config.width, self.config.height)
    }

    /// Reconfigure the surface. Zero-sized dimensions are clamped to one pixel.
    pub fn resize(&mut self, dimensions: ScreenDimensions) {
        self.config.width = dimensions.width.max(1);
        self.config.height = dimensions.height.max(1);
        self.surface.configure(&self.device, &self.config);
        tracing::debug!(width = self.config.width, height = self.config.height, "surface resized");
    }

    /// Next surface texture to draw into. A lost or outdated surface is
    /// reconfigured and yields `None`; the frame should be skipped.
    pub fn acquire_frame(&mut self) -> Result<Option<wgpu::SurfaceTexture>, GpuError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
