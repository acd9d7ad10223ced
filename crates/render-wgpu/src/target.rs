use voxelwall_common::ScreenDimensions;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Color format of offscreen targets.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Something a render pass draws into.
pub trait RenderTarget {
    fn dimensions(&self) -> ScreenDimensions;

    fn color_format(&self) -> wgpu::TextureFormat;

    /// Recreate size-dependent attachments.
    fn update_dimensions(&mut self, device: &wgpu::Device, dimensions: ScreenDimensions);

    fn depth_view(&self) -> &wgpu::TextureView;
}

/// The window surface. Color comes from the acquired frame; the target only
/// owns the depth buffer.
pub struct ScreenTarget {
    dimensions: ScreenDimensions,
    format: wgpu::TextureFormat,
    depth: wgpu::TextureView,
}

impl ScreenTarget {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        dimensions: ScreenDimensions,
    ) -> Self {
        Self {
            dimensions,
            format,
            depth: create_depth_texture(device, dimensions, "screen_depth"),
        }
    }
}

impl RenderTarget for ScreenTarget {
    fn dimensions(&self) -> ScreenDimensions {
        self.dimensions
    }

    fn color_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn update_dimensions(&mut self, device: &wgpu::Device, dimensions: ScreenDimensions) {
        if dimensions != self.dimensions {
            self.dimensions = dimensions;
            self.depth = create_depth_texture(device, dimensions, "screen_depth");
        }
    }

    fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth
    }
}

/// Offscreen color and depth textures. The color texture can be sampled by a
/// later pass.
pub struct TextureTarget {
    dimensions: ScreenDimensions,
    color: wgpu::TextureView,
    depth: wgpu::TextureView,
}

impl TextureTarget {
    pub fn new(device: &wgpu::Device, dimensions: ScreenDimensions) -> Self {
        Self {
            dimensions,
            color: create_color_texture(device, dimensions),
            depth: create_depth_texture(device, dimensions, "offscreen_depth"),
        }
    }

    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color
    }
}

impl RenderTarget for TextureTarget {
    fn dimensions(&self) -> ScreenDimensions {
        self.dimensions
    }

    fn color_format(&self) -> wgpu::TextureFormat {
        OFFSCREEN_FORMAT
    }

    fn update_dimensions(&mut self, device: &wgpu::Device, dimensions: ScreenDimensions) {
        if dimensions != self.dimensions {
            self.dimensions = dimensions;
            self.color = create_color_texture(device, dimensions);
            self.depth = create_depth_texture(device, dimensions, "offscreen_depth");
        }
    }

    fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth
    }
}

/// Begin a pass clearing `color` to `clear` and `depth` to the far plane.
pub fn begin_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    color: &wgpu::TextureView,
    depth: &wgpu::TextureView,
    clear: wgpu::Color,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        ..Default::default()
    })
}

fn extent(dimensions: ScreenDimensions) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: dimensions.width.max(1),
        height: dimensions.height.max(1),
        depth_or_array_layers: 1,
    }
}

fn create_color_texture(device: &wgpu::Device, dimensions: ScreenDimensions) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen_color"),
        size: extent(dimensions),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OFFSCREEN_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

fn create_depth_texture(
    device: &wgpu::Device,
    dimensions: ScreenDimensions,
    label: &str,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent(dimensions),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}
