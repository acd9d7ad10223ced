use voxelwall_common::{Color, ScreenDimensions};
use voxelwall_render::{
    Camera, CameraPose, FixedNavigation, Mesh, Navigation, OrbitNavigation, VoxelTerrain,
};
use voxelwall_wallpaper::{Application, ApplicationRenderer, RendererFactory, SurfaceRenderer};

use crate::config::{ModelConfig, SceneConfig};
use crate::context::GpuContext;
use crate::gpu::{FullscreenQuad, GpuMesh, MeshPipelines};
use crate::target::{RenderTarget, ScreenTarget, TextureTarget, begin_pass};

/// A mesh in the scene and whether it spins around the y axis.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: &'static str,
    pub mesh: Mesh,
    pub spins: bool,
}

/// GPU state of a scene. Lost together with the context and rebuilt on the
/// next surface creation.
struct SceneResources {
    pipelines: MeshPipelines,
    quad: FullscreenQuad,
    offscreen: TextureTarget,
    screen: ScreenTarget,
    quad_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
}

/// The voxel wallpaper: scene meshes rendered into an offscreen texture, then
/// drawn to the screen with a fullscreen quad.
pub struct VoxelScene {
    config: SceneConfig,
    objects: Vec<SceneObject>,
    camera: Camera,
    resources: Option<SceneResources>,
}

impl VoxelScene {
    pub fn new(config: SceneConfig) -> Self {
        let objects = build_objects(&config);
        let camera = camera_for(&config);
        Self {
            config,
            objects,
            camera,
            resources: None,
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Whether GPU resources exist for the current context.
    pub fn is_ready(&self) -> bool {
        self.resources.is_some()
    }

    /// Advance animation and camera by `elapsed_seconds`.
    pub fn advance(&mut self, elapsed_seconds: f64) {
        let step = self.config.rotation_speed * elapsed_seconds as f32;
        for object in self.objects.iter_mut().filter(|o| o.spins) {
            object.mesh.transform.rotation_y =
                (object.mesh.transform.rotation_y + step) % std::f32::consts::TAU;
        }
        self.camera.update(elapsed_seconds);
    }

    fn create_resources(&self, gpu: &GpuContext) -> SceneResources {
        let dimensions = gpu.dimensions();
        let offscreen = TextureTarget::new(
            &gpu.device,
            dimensions.scale_down(self.config.render_scale),
        );
        let screen = ScreenTarget::new(&gpu.device, gpu.surface_format(), dimensions);
        let pipelines = MeshPipelines::new(&gpu.device, offscreen.color_format());
        let quad = FullscreenQuad::new(&gpu.device, screen.color_format());
        let quad_bind_group = quad.bind(&gpu.device, offscreen.color_view());
        let meshes = self
            .objects
            .iter()
            .map(|o| GpuMesh::upload(&gpu.device, &pipelines, &o.mesh))
            .collect();

        SceneResources {
            pipelines,
            quad,
            offscreen,
            screen,
            quad_bind_group,
            meshes,
        }
    }

    fn render(&self, gpu: &mut GpuContext) {
        let Some(res) = &self.resources else {
            return;
        };
        let frame = match gpu.acquire_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("skipping frame: {e}");
                return;
            }
        };

        let base = self.camera.to_render_params();
        for (object, mesh) in self.objects.iter().zip(&res.meshes) {
            let mut params = base.clone();
            params.apply(&object.mesh.transform);
            mesh.prepare(&gpu.queue, &params);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });

        // Pass 1: scene into the offscreen texture.
        {
            let mut pass = begin_pass(
                &mut encoder,
                "scene_pass",
                res.offscreen.color_view(),
                res.offscreen.depth_view(),
                wgpu_color(self.config.clear_color),
            );
            for mesh in &res.meshes {
                mesh.draw(&mut pass, &res.pipelines);
            }
        }

        // Pass 2: the texture onto the screen.
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        {
            let mut pass = begin_pass(
                &mut encoder,
                "screen_pass",
                &view,
                res.screen.depth_view(),
                wgpu::Color::BLACK,
            );
            res.quad.draw(&mut pass, &res.quad_bind_group);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

impl Application<GpuContext> for VoxelScene {
    fn on_screen_created(&mut self, gpu: &mut GpuContext) {
        self.resources = Some(self.create_resources(gpu));
        self.camera.refresh_projection(gpu.dimensions());
        tracing::info!(
            meshes = self.objects.len(),
            context_version = gpu.context_version(),
            "scene resources created"
        );
    }

    fn on_screen_changed(&mut self, gpu: &mut GpuContext, dimensions: ScreenDimensions) {
        if let Some(res) = &mut self.resources {
            res.offscreen.update_dimensions(
                &gpu.device,
                dimensions.scale_down(self.config.render_scale),
            );
            res.screen.update_dimensions(&gpu.device, dimensions);
            res.quad_bind_group = res.quad.bind(&gpu.device, res.offscreen.color_view());
        }
        self.camera.refresh_projection(dimensions);
    }

    fn on_frame(&mut self, gpu: &mut GpuContext, elapsed_seconds: f64) {
        // Frames can be requested before the surface exists.
        if !self.is_ready() {
            return;
        }
        self.advance(elapsed_seconds);
        self.render(gpu);
    }
}

/// Builds a fresh [`VoxelScene`] renderer for every surface creation.
#[derive(Debug, Clone, Default)]
pub struct VoxelSceneFactory {
    config: SceneConfig,
}

impl VoxelSceneFactory {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}

impl RendererFactory<GpuContext> for VoxelSceneFactory {
    fn create_renderer(&mut self) -> Box<dyn SurfaceRenderer<GpuContext>> {
        Box::new(ApplicationRenderer::new(VoxelScene::new(self.config.clone())))
    }
}

fn wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}

fn camera_for(config: &SceneConfig) -> Camera {
    let c = &config.camera;
    let navigation: Box<dyn Navigation> = if c.orbit_speed != 0.0 {
        Box::new(OrbitNavigation::new(c.orbit_speed))
    } else {
        Box::new(FixedNavigation)
    };
    Camera::new(
        CameraPose::new(c.position, c.target, c.up),
        c.fov_degrees,
        ScreenDimensions::empty(),
        navigation,
    )
}

/// CPU meshes for everything the config enables. A model that fails to load
/// is left out.
pub fn build_objects(config: &SceneConfig) -> Vec<SceneObject> {
    let mut objects = Vec::new();

    if let Some(terrain) = &config.terrain {
        let mut mesh = VoxelTerrain::generate(
            terrain.dimensions,
            terrain.voxel_scale,
            terrain.frequency,
            terrain.amplitude,
        )
        .mesh;
        mesh.transform.scale *= terrain.scale;
        objects.push(SceneObject {
            name: "terrain",
            mesh,
            spins: false,
        });
    }

    if let Some(axes) = &config.coordinate_system {
        let mut mesh = Mesh::coordinate_system();
        mesh.transform.scale = axes.scale;
        objects.push(SceneObject {
            name: "coordinate_system",
            mesh,
            spins: false,
        });
    }

    if let Some(cube) = &config.cube {
        let mut mesh = Mesh::cube(cube.color);
        mesh.transform.scale = cube.scale;
        mesh.transform.translation = cube.translation;
        objects.push(SceneObject {
            name: "cube",
            mesh,
            spins: true,
        });
    }

    if let Some(model) = &config.model {
        if let Some(mesh) = load_model_mesh(model) {
            objects.push(SceneObject {
                name: "model",
                mesh,
                spins: true,
            });
        }
    }

    objects
}

fn load_model_mesh(config: &ModelConfig) -> Option<Mesh> {
    let model = match voxelwall_assets::load_file(&config.path) {
        Ok(model) => model,
        Err(e) => {
            tracing::warn!(path = %config.path.display(), "failed to load voxel model: {e}");
            return None;
        }
    };
    let Some(frame) = model.frames.get(config.frame) else {
        tracing::warn!(
            frame = config.frame,
            frames = model.frames.len(),
            "voxel model has no such frame"
        );
        return None;
    };
    let mut mesh = Mesh::voxel_model(frame, &model.palette);
    mesh.transform.scale = config.scale;
    Some(mesh)
}
