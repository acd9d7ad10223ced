use std::cell::RefCell;
use std::rc::Rc;

use voxelwall_common::ScreenDimensions;
use voxelwall_wallpaper::{
    Application, ApplicationRenderer, GlesVersion, HostCall, RecordingHost, RendererFactory,
    SurfaceEvent, SurfaceRenderer, SurfaceState, WallpaperEngine,
};

/// Shared log the test inspects after the renderer moved into the host.
type Log = Rc<RefCell<Vec<String>>>;

struct LoggingApp {
    log: Log,
}

impl Application<u32> for LoggingApp {
    fn on_screen_created(&mut self, gpu: &mut u32) {
        *gpu += 1;
        self.log.borrow_mut().push(format!("created ctx={gpu}"));
    }

    fn on_screen_changed(&mut self, _gpu: &mut u32, dimensions: ScreenDimensions) {
        self.log
            .borrow_mut()
            .push(format!("changed {}x{}", dimensions.width, dimensions.height));
    }

    fn on_frame(&mut self, _gpu: &mut u32, _elapsed_seconds: f64) {
        self.log.borrow_mut().push("frame".into());
    }
}

struct LoggingFactory {
    log: Log,
    created: usize,
}

impl RendererFactory<u32> for LoggingFactory {
    fn create_renderer(&mut self) -> Box<dyn SurfaceRenderer<u32>> {
        self.created += 1;
        Box::new(ApplicationRenderer::new(LoggingApp {
            log: self.log.clone(),
        }))
    }
}

fn engine() -> (WallpaperEngine<LoggingFactory>, Log) {
    let log = Log::default();
    let factory = LoggingFactory {
        log: log.clone(),
        created: 0,
    };
    (WallpaperEngine::new(factory), log)
}

#[test]
fn installed_renderer_drives_application() {
    let (mut engine, log) = engine();
    let mut host: RecordingHost<u32> = RecordingHost::new(GlesVersion::ES_3_1);

    engine.handle_event(&mut host, SurfaceEvent::Created);
    assert_eq!(engine.state(), SurfaceState::RendererInstalled);

    let mut renderer = host.take_renderer().expect("renderer installed");
    let mut gpu = 0u32;
    renderer.on_surface_created(&mut gpu);
    renderer.on_surface_changed(&mut gpu, ScreenDimensions::new(1080, 1920));
    renderer.on_draw_frame(&mut gpu);

    // Context lost and recreated: the same renderer rebuilds its state.
    renderer.on_surface_created(&mut gpu);

    assert_eq!(
        *log.borrow(),
        vec![
            "created ctx=1".to_string(),
            "changed 1080x1920".to_string(),
            "frame".to_string(),
            "created ctx=2".to_string(),
        ]
    );
}

#[test]
fn factory_called_once_per_creation_event() {
    let (mut engine, _log) = engine();
    let mut host: RecordingHost<u32> = RecordingHost::new(GlesVersion::ES_3_0);

    engine.handle_event(&mut host, SurfaceEvent::Created);
    engine.handle_event(&mut host, SurfaceEvent::Paused);
    engine.handle_event(&mut host, SurfaceEvent::Resumed);
    assert_eq!(engine.factory().created, 1);

    engine.handle_event(&mut host, SurfaceEvent::Destroyed);
    engine.handle_event(&mut host, SurfaceEvent::Created);
    assert_eq!(engine.factory().created, 2);

    let installs = host
        .calls()
        .into_iter()
        .filter(|c| *c == HostCall::SetRenderer)
        .count();
    assert_eq!(installs, 2);
}

#[test]
fn insufficient_capability_never_builds_a_renderer() {
    for raw in [0x0, 0x10000, 0x20000, 0x2ffff] {
        let (mut engine, log) = engine();
        let mut host: RecordingHost<u32> = RecordingHost::new(GlesVersion::from_raw(raw));

        engine.handle_event(&mut host, SurfaceEvent::Created);

        assert_eq!(host.calls(), vec![HostCall::QueryCapability]);
        assert!(!host.has_renderer());
        assert_eq!(engine.factory().created, 0);
        assert_eq!(engine.state(), SurfaceState::Uninitialized);
        assert!(log.borrow().is_empty());
    }
}
