use std::fmt;

use glam::{Mat4, Vec3};
use voxelwall_common::ScreenDimensions;

use crate::params::RenderParams;

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Where the camera is and what it looks at, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
        }
    }

    /// View matrix of this pose. An `up` parallel to the viewing direction is
    /// replaced by a perpendicular axis. `None` when the eye sits on the target.
    pub fn view_matrix(&self) -> Option<Mat4> {
        let forward = (self.target - self.position).try_normalize()?;
        let up = match self.up.try_normalize() {
            Some(up) if forward.cross(up).length_squared() > 1e-8 => up,
            _ => forward.any_orthonormal_vector(),
        };
        Some(Mat4::look_at_rh(self.position, self.target, up))
    }
}

/// Controls how the camera moves over time.
pub trait Navigation: fmt::Debug {
    /// First-time setup for the pose the camera starts with.
    fn initialize(&mut self, pose: &mut CameraPose);

    /// Advance by `delta` seconds.
    fn update(&mut self, pose: &mut CameraPose, delta: f64);
}

/// Leaves the camera where it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedNavigation;

impl Navigation for FixedNavigation {
    fn initialize(&mut self, _pose: &mut CameraPose) {}

    fn update(&mut self, _pose: &mut CameraPose, _delta: f64) {}
}

/// Circles the eye around the target on the horizontal plane, keeping its
/// height and distance.
#[derive(Debug, Clone, Copy)]
pub struct OrbitNavigation {
    /// Radians per second.
    pub angular_speed: f32,
    radius: f32,
    height: f32,
    angle: f32,
}

impl OrbitNavigation {
    pub fn new(angular_speed: f32) -> Self {
        Self {
            angular_speed,
            radius: 0.0,
            height: 0.0,
            angle: 0.0,
        }
    }

    fn place(&self, pose: &mut CameraPose) {
        pose.position = pose.target
            + Vec3::new(
                self.radius * self.angle.cos(),
                self.height,
                self.radius * self.angle.sin(),
            );
    }
}

impl Navigation for OrbitNavigation {
    fn initialize(&mut self, pose: &mut CameraPose) {
        let offset = pose.position - pose.target;
        self.radius = Vec3::new(offset.x, 0.0, offset.z).length();
        self.height = offset.y;
        self.angle = offset.z.atan2(offset.x);
    }

    fn update(&mut self, pose: &mut CameraPose, delta: f64) {
        self.angle = (self.angle + self.angular_speed * delta as f32) % std::f32::consts::TAU;
        self.place(pose);
    }
}

/// The main camera of a scene.
///
/// `view` and `projection` are cached; call [`Camera::refresh_view`] after
/// changing the pose and [`Camera::refresh_projection`] when the screen
/// changes.
#[derive(Debug)]
pub struct Camera {
    pub pose: CameraPose,
    pub fov_degrees: f32,
    view: Mat4,
    projection: Mat4,
    navigation: Box<dyn Navigation>,
}

impl Camera {
    pub fn new(
        pose: CameraPose,
        fov_degrees: f32,
        screen: ScreenDimensions,
        navigation: Box<dyn Navigation>,
    ) -> Self {
        let mut camera = Self {
            pose,
            fov_degrees,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            navigation,
        };
        camera.refresh_projection(screen);
        camera.navigation.initialize(&mut camera.pose);
        camera.refresh_view();
        camera
    }

    /// A camera that never moves.
    pub fn fixed(pose: CameraPose, fov_degrees: f32, screen: ScreenDimensions) -> Self {
        Self::new(pose, fov_degrees, screen, Box::new(FixedNavigation))
    }

    /// A degenerate pose keeps the previous view.
    pub fn refresh_view(&mut self) {
        match self.pose.view_matrix() {
            Some(view) => self.view = view,
            None => tracing::warn!(position = ?self.pose.position, "camera sits on its target"),
        }
    }

    /// An empty screen falls back to a square aspect ratio.
    pub fn refresh_projection(&mut self, screen: ScreenDimensions) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            screen.aspect_ratio(),
            NEAR,
            FAR,
        );
    }

    /// Let the navigation move the camera by `delta` seconds, then refresh the view.
    pub fn update(&mut self, delta: f64) {
        self.navigation.update(&mut self.pose, delta);
        self.refresh_view();
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn to_render_params(&self) -> RenderParams {
        RenderParams::new(self.view, self.projection)
    }
}
