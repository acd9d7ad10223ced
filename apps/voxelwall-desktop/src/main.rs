mod host;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use voxelwall_common::ScreenDimensions;
use voxelwall_render_wgpu::{SceneConfig, VoxelSceneFactory};
use voxelwall_wallpaper::{GlesVersion, SurfaceEvent, WallpaperEngine};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use host::DesktopHost;

#[derive(Parser)]
#[command(name = "voxelwall-desktop", about = "Voxel live wallpaper in a desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report this capability instead of the adapter's, e.g. "2.0" or "0x30000"
    #[arg(long)]
    gles_version: Option<GlesVersion>,

    /// Release the GPU context on suspend even if preservation is requested
    #[arg(long)]
    no_preserve_context: bool,
}

struct WallpaperApp {
    engine: WallpaperEngine<VoxelSceneFactory>,
    host: DesktopHost,
}

impl WallpaperApp {
    fn new(config: SceneConfig, cli: &Cli) -> Self {
        Self {
            engine: WallpaperEngine::new(VoxelSceneFactory::new(config)),
            host: DesktopHost::new(cli.gles_version, !cli.no_preserve_context),
        }
    }
}

impl ApplicationHandler for WallpaperApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.has_window() {
            self.engine
                .handle_event(&mut self.host, SurfaceEvent::Resumed);
            self.host.surface_created();
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Voxel Wallpaper")
            .with_inner_size(PhysicalSize::new(720u32, 1280));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        self.host.attach_window(window);
        self.engine
            .handle_event(&mut self.host, SurfaceEvent::Created);
        self.host.surface_created();
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.engine
            .handle_event(&mut self.host, SurfaceEvent::Paused);
        self.host.pause();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.engine
                    .handle_event(&mut self.host, SurfaceEvent::Destroyed);
                self.host.destroy();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let dimensions = ScreenDimensions::new(size.width, size.height);
                self.engine
                    .handle_event(&mut self.host, SurfaceEvent::Changed(dimensions));
                self.host.surface_changed(dimensions);
            }
            WindowEvent::RedrawRequested => {
                self.host.draw_frame();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.host.window() {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("voxelwall-desktop starting");

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = WallpaperApp::new(config, &cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}
