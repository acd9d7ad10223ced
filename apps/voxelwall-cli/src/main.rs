use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use voxelwall_common::ScreenDimensions;
use voxelwall_render::{TerrainDimensions, VoxelTerrain};
use voxelwall_render_wgpu::{SceneConfig, build_objects};
use voxelwall_wallpaper::{
    Application, ApplicationRenderer, GlesVersion, MIN_GLES_VERSION, RecordingHost,
    RendererFactory, SurfaceEvent, SurfaceRenderer, WallpaperEngine,
};

#[derive(Parser)]
#[command(name = "voxelwall-cli", about = "CLI tool for voxelwall operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print frames, dimensions and palette usage of a MagicaVoxel model
    Inspect {
        /// Path to a .vox file
        file: PathBuf,
    },
    /// Run the surface initializer against a headless host
    Gate {
        /// Reported capability: "3", "3.1" or a raw value such as "0x30000"
        version: GlesVersion,
    },
    /// Generate voxel terrain and report its size
    Terrain {
        /// Width in meters
        #[arg(long, default_value = "3.0")]
        width: f32,
        /// Depth in meters
        #[arg(long, default_value = "3.0")]
        depth: f32,
        /// Voxels per meter
        #[arg(long, default_value = "50.0")]
        voxel_scale: f32,
        /// Noise sampling frequency
        #[arg(long, default_value = "1.0")]
        frequency: f32,
        /// Highest terrain height in meters
        #[arg(long, default_value = "0.5")]
        amplitude: f32,
    },
    /// List the meshes a scene config produces
    Scene {
        /// Scene config (JSON); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Stand-in content for dry runs. Logs what the host asks of it.
struct ProbeScene;

impl Application<()> for ProbeScene {
    fn on_screen_created(&mut self, _gpu: &mut ()) {
        tracing::debug!("probe screen created");
    }

    fn on_screen_changed(&mut self, _gpu: &mut (), dimensions: ScreenDimensions) {
        tracing::debug!(?dimensions, "probe screen changed");
    }

    fn on_frame(&mut self, _gpu: &mut (), elapsed_seconds: f64) {
        tracing::debug!(elapsed_seconds, "probe frame");
    }
}

struct ProbeFactory;

impl RendererFactory<()> for ProbeFactory {
    fn create_renderer(&mut self) -> Box<dyn SurfaceRenderer<()>> {
        Box::new(ApplicationRenderer::new(ProbeScene))
    }
}

fn inspect(file: PathBuf) -> anyhow::Result<()> {
    let model = voxelwall_assets::load_file(&file)?;
    println!("{}: {} frame(s)", file.display(), model.frames.len());

    let mut used = BTreeSet::new();
    for (i, frame) in model.frames.iter().enumerate() {
        let d = frame.dimensions();
        println!(
            "  frame {i}: {}x{}x{} (w x h x d), {} voxels",
            d.width,
            d.height,
            d.depth,
            frame.voxel_count()
        );
        used.extend(frame.voxels().map(|(_, _, _, index)| index));
    }

    println!("palette: {} color index(es) in use", used.len());
    for index in used.iter().take(8) {
        if let Some(c) = model.palette.color_at(*index) {
            println!(
                "  {index:>3}: rgba({:.2}, {:.2}, {:.2}, {:.2})",
                c.r, c.g, c.b, c.a
            );
        }
    }
    if used.len() > 8 {
        println!("  ...");
    }
    Ok(())
}

fn gate(version: GlesVersion) {
    println!("reported capability: {version}");
    println!("required:            {MIN_GLES_VERSION}");

    let mut host: RecordingHost = RecordingHost::new(version);
    let mut engine = WallpaperEngine::new(ProbeFactory);
    engine.handle_event(&mut host, SurfaceEvent::Created);

    println!("host calls:");
    for call in host.calls() {
        println!("  {call:?}");
    }
    println!("surface state: {:?}", engine.state());

    match host.take_renderer() {
        Some(mut renderer) => {
            renderer.on_surface_created(&mut ());
            renderer.on_surface_changed(&mut (), ScreenDimensions::new(1080, 1920));
            for _ in 0..3 {
                renderer.on_draw_frame(&mut ());
            }
            println!("renderer installed and drew 3 frames");
        }
        None => println!("no renderer installed; the surface stays blank"),
    }
}

fn terrain(dimensions: TerrainDimensions, voxel_scale: f32, frequency: f32, amplitude: f32) {
    let terrain = VoxelTerrain::generate(dimensions, voxel_scale, frequency, amplitude);
    let (columns_x, columns_z) = terrain.columns();
    let vertices = terrain.mesh.vertices.vertices();
    let (min, max) = vertices.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
        (lo.min(v.position[1]), hi.max(v.position[1]))
    });

    println!(
        "terrain {}m x {}m at {voxel_scale} voxels/m",
        dimensions.width, dimensions.depth
    );
    println!("  columns:  {columns_x} x {columns_z}");
    println!("  vertices: {}", vertices.len());
    if !vertices.is_empty() {
        println!("  height:   {min:.2} .. {max:.2} voxels");
    }
    println!("  mesh scale: {}", terrain.mesh.transform.scale);
}

fn scene(config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    for object in build_objects(&config) {
        println!(
            "{:<18} {:>8} vertices  {:?}{}",
            object.name,
            object.mesh.vertex_count(),
            object.mesh.primitive(),
            if object.spins { "  (spins)" } else { "" }
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("voxelwall-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("wallpaper: {}", voxelwall_wallpaper::crate_info());
            println!("assets: {}", voxelwall_assets::crate_info());
            println!("render: {}", voxelwall_render::crate_info());
            println!("render-wgpu: {}", voxelwall_render_wgpu::crate_info());
            println!("minimum capability: {MIN_GLES_VERSION}");
        }
        Commands::Inspect { file } => inspect(file)?,
        Commands::Gate { version } => gate(version),
        Commands::Terrain {
            width,
            depth,
            voxel_scale,
            frequency,
            amplitude,
        } => terrain(
            TerrainDimensions::new(width, depth),
            voxel_scale,
            frequency,
            amplitude,
        ),
        Commands::Scene { config } => scene(config)?,
    }

    Ok(())
}
