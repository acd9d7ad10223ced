use voxelwall_common::ScreenDimensions;

/// A renderer bound to a host surface.
///
/// `G` is the host's graphics context, handed to every callback the same way
/// the host hands the current context to its frame callbacks. Once installed,
/// the renderer is owned by the host for the lifetime of the surface.
pub trait SurfaceRenderer<G> {
    /// The graphics context was created, or recreated after being lost.
    /// All GPU resources must be (re)built here.
    fn on_surface_created(&mut self, gpu: &mut G);

    /// The surface size changed.
    fn on_surface_changed(&mut self, gpu: &mut G, dimensions: ScreenDimensions);

    /// Draw one frame.
    fn on_draw_frame(&mut self, gpu: &mut G);
}

/// The extension point every wallpaper variant implements.
///
/// Called exactly once per successful capability check per surface-creation
/// event.
pub trait RendererFactory<G> {
    fn create_renderer(&mut self) -> Box<dyn SurfaceRenderer<G>>;
}
