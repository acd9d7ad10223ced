use crate::capability::{CONTEXT_CLIENT_VERSION, MIN_GLES_VERSION};
use crate::host::{SurfaceEvent, WallpaperHost};
use crate::renderer::RendererFactory;

/// Whether the current surface got a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    /// No renderer installed. Terminal for a surface whose capability check
    /// failed.
    #[default]
    Uninitialized,
    RendererInstalled,
}

/// Capability-gated surface initializer for one wallpaper variant.
///
/// Holds only the variant's [`RendererFactory`]; the host is borrowed per
/// callback.
pub struct WallpaperEngine<F> {
    factory: F,
    state: SurfaceState,
}

impl<F> WallpaperEngine<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            state: SurfaceState::Uninitialized,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// React to a host lifecycle notification.
    ///
    /// Only creation and destruction concern the engine. Size changes and
    /// pause/resume are dispatched to the installed renderer by the host.
    pub fn handle_event<H>(&mut self, host: &mut H, event: SurfaceEvent)
    where
        H: WallpaperHost,
        F: RendererFactory<H::Gpu>,
    {
        match event {
            SurfaceEvent::Created => self.on_create(host),
            SurfaceEvent::Destroyed => {
                tracing::debug!("surface destroyed");
                self.state = SurfaceState::Uninitialized;
            }
            other => tracing::trace!(?other, "lifecycle event left to the host"),
        }
    }

    /// Surface creation: query the capability and, if it is sufficient,
    /// configure the context and install a fresh renderer.
    ///
    /// An insufficient capability leaves the surface without a renderer and
    /// makes no further host calls.
    pub fn on_create<H>(&mut self, host: &mut H)
    where
        H: WallpaperHost,
        F: RendererFactory<H::Gpu>,
    {
        self.state = SurfaceState::Uninitialized;

        let capability = host.query_capability();
        if !capability.meets(MIN_GLES_VERSION) {
            tracing::debug!(
                %capability,
                required = %MIN_GLES_VERSION,
                "capability below minimum, surface left without renderer"
            );
            return;
        }

        host.set_context_client_version(CONTEXT_CLIENT_VERSION);
        host.set_preserve_context_on_pause(true);
        host.set_renderer(self.factory.create_renderer());
        self.state = SurfaceState::RendererInstalled;

        tracing::info!(%capability, "renderer installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::GlesVersion;
    use crate::recording::{HostCall, RecordingHost};
    use crate::renderer::SurfaceRenderer;
    use voxelwall_common::ScreenDimensions;

    struct NullRenderer;

    impl SurfaceRenderer<()> for NullRenderer {
        fn on_surface_created(&mut self, _gpu: &mut ()) {}
        fn on_surface_changed(&mut self, _gpu: &mut (), _dimensions: ScreenDimensions) {}
        fn on_draw_frame(&mut self, _gpu: &mut ()) {}
    }

    #[derive(Default)]
    struct CountingFactory {
        created: usize,
    }

    impl RendererFactory<()> for CountingFactory {
        fn create_renderer(&mut self) -> Box<dyn SurfaceRenderer<()>> {
            self.created += 1;
            Box::new(NullRenderer)
        }
    }

    fn run(raw: u32) -> (WallpaperEngine<CountingFactory>, RecordingHost) {
        let mut host = RecordingHost::new(GlesVersion::from_raw(raw));
        let mut engine = WallpaperEngine::new(CountingFactory::default());
        engine.on_create(&mut host);
        (engine, host)
    }

    #[test]
    fn exact_threshold_installs_renderer() {
        let (engine, host) = run(0x30000);
        assert_eq!(
            host.calls(),
            &[
                HostCall::QueryCapability,
                HostCall::SetContextClientVersion(3),
                HostCall::SetPreserveContextOnPause(true),
                HostCall::SetRenderer,
            ]
        );
        assert!(host.has_renderer());
        assert_eq!(engine.factory().created, 1);
        assert_eq!(engine.state(), SurfaceState::RendererInstalled);
    }

    #[test]
    fn below_threshold_is_silent_no_op() {
        let (engine, host) = run(0x20000);
        assert_eq!(host.calls(), &[HostCall::QueryCapability]);
        assert!(!host.has_renderer());
        assert_eq!(engine.factory().created, 0);
        assert_eq!(engine.state(), SurfaceState::Uninitialized);
    }

    #[test]
    fn above_threshold_behaves_like_threshold() {
        let (engine, host) = run(0x40000);
        assert_eq!(host.context_client_version(), Some(3));
        assert_eq!(host.preserve_context_on_pause(), Some(true));
        assert!(host.has_renderer());
        assert_eq!(engine.factory().created, 1);
    }

    #[test]
    fn destroyed_resets_state() {
        let mut host: RecordingHost = RecordingHost::new(GlesVersion::ES_3_1);
        let mut engine = WallpaperEngine::new(CountingFactory::default());
        engine.handle_event(&mut host, SurfaceEvent::Created);
        assert_eq!(engine.state(), SurfaceState::RendererInstalled);
        engine.handle_event(&mut host, SurfaceEvent::Destroyed);
        assert_eq!(engine.state(), SurfaceState::Uninitialized);
    }

    #[test]
    fn non_creation_events_make_no_host_calls() {
        let mut host: RecordingHost = RecordingHost::new(GlesVersion::ES_3_0);
        let mut engine = WallpaperEngine::new(CountingFactory::default());
        engine.handle_event(&mut host, SurfaceEvent::Paused);
        engine.handle_event(&mut host, SurfaceEvent::Resumed);
        engine.handle_event(
            &mut host,
            SurfaceEvent::Changed(ScreenDimensions::new(10, 10)),
        );
        assert!(host.calls().is_empty());
        assert_eq!(engine.factory().created, 0);
    }
}
