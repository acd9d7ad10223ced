use std::time::{Duration, Instant};

use voxelwall_common::ScreenDimensions;

use crate::renderer::SurfaceRenderer;

/// Longest simulation step handed to an application in one frame. Keeps
/// animations from jumping after the host stalled or paused drawing.
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

/// High-level interface for wallpaper content.
///
/// Unlike [`SurfaceRenderer`], applications receive the elapsed time since the
/// previous frame instead of having to measure it themselves.
pub trait Application<G> {
    /// The graphics context is (again) available. Build all GPU state here.
    fn on_screen_created(&mut self, gpu: &mut G);

    fn on_screen_changed(&mut self, gpu: &mut G, dimensions: ScreenDimensions);

    /// Advance by `elapsed_seconds` and draw one frame. May be called before
    /// [`Application::on_screen_created`]; implementations must then do nothing.
    fn on_frame(&mut self, gpu: &mut G, elapsed_seconds: f64);
}

/// Measures wall time between consecutive frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_step: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: None,
            max_step: MAX_FRAME_STEP,
        }
    }

    /// Forget the previous frame. The next tick reports zero elapsed time.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Seconds since the previous tick, clamped to the maximum step.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let elapsed = match self.last {
            Some(last) => now.saturating_duration_since(last).min(self.max_step),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        elapsed.as_secs_f64()
    }
}

/// Adapts an [`Application`] to the host's [`SurfaceRenderer`] callbacks.
pub struct ApplicationRenderer<A> {
    app: A,
    clock: FrameClock,
}

impl<A> ApplicationRenderer<A> {
    pub fn new(app: A) -> Self {
        Self {
            app,
            clock: FrameClock::new(),
        }
    }

    pub fn app(&self) -> &A {
        &self.app
    }
}

impl<G, A> SurfaceRenderer<G> for ApplicationRenderer<A>
where
    A: Application<G>,
{
    fn on_surface_created(&mut self, gpu: &mut G) {
        self.clock.reset();
        self.app.on_screen_created(gpu);
    }

    fn on_surface_changed(&mut self, gpu: &mut G, dimensions: ScreenDimensions) {
        self.app.on_screen_changed(gpu, dimensions);
    }

    fn on_draw_frame(&mut self, gpu: &mut G) {
        let elapsed = self.clock.tick();
        self.app.on_frame(gpu, elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        created: usize,
        dimensions: Option<ScreenDimensions>,
        frames: Vec<f64>,
    }

    impl Application<()> for Probe {
        fn on_screen_created(&mut self, _gpu: &mut ()) {
            self.created += 1;
        }

        fn on_screen_changed(&mut self, _gpu: &mut (), dimensions: ScreenDimensions) {
            self.dimensions = Some(dimensions);
        }

        fn on_frame(&mut self, _gpu: &mut (), elapsed_seconds: f64) {
            self.frames.push(elapsed_seconds);
        }
    }

    #[test]
    fn clock_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(Instant::now()), 0.0);
    }

    #[test]
    fn clock_measures_and_clamps() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-9);
        let dt = clock.tick_at(start + Duration::from_secs(5));
        assert!((dt - 0.1).abs() < 1e-9);
    }

    #[test]
    fn clock_reset_restarts() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        clock.reset();
        assert_eq!(clock.tick_at(start + Duration::from_millis(50)), 0.0);
    }

    #[test]
    fn renderer_forwards_callbacks() {
        let mut renderer = ApplicationRenderer::new(Probe::default());
        let mut gpu = ();
        renderer.on_surface_created(&mut gpu);
        renderer.on_surface_changed(&mut gpu, ScreenDimensions::new(800, 600));
        renderer.on_draw_frame(&mut gpu);
        renderer.on_draw_frame(&mut gpu);

        let app = renderer.app();
        assert_eq!(app.created, 1);
        assert_eq!(app.dimensions, Some(ScreenDimensions::new(800, 600)));
        assert_eq!(app.frames.len(), 2);
        assert_eq!(app.frames[0], 0.0);
        assert!(app.frames[1] >= 0.0 && app.frames[1] <= 0.1);
    }
}
