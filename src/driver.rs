//! The frame driver: one tick per display refresh.
//!
//! The driver is the only stateful loop. Each tick it advances the clock from
//! the host timestamp, and once the clock is non-negative it moves the
//! particles, eases the camera and hands a [`RenderFrame`] to the surface.

use crate::camera::CameraSchedule;
use crate::config::AnimationOptions;
use crate::kinematics::Kinematics;
use crate::particles::{Light, ParticleStore};
use crate::time::AnimationClock;

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// The clock is still negative; nothing moved and nothing should be drawn.
    Waiting {
        /// Seconds until the animation starts.
        remaining: f64,
    },
    /// Particles and camera were updated for `time`.
    Advanced {
        /// Animation time of this frame.
        time: f64,
    },
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame<'a> {
    /// Flat `[x, y, z, ...]` particle positions.
    pub positions: Vec<f32>,
    /// Flat `[r, g, b, ...]` particle colors.
    pub colors: &'a [f32],
    /// Lights carried by particles.
    pub lights: Vec<Light>,
    /// Camera Z from the schedule.
    pub camera_z: f32,
    /// Animation time.
    pub time: f64,
}

/// Consumer of render frames.
pub trait RenderSurface {
    /// Presentation failure.
    type Error;

    /// Draw one frame.
    fn present(&mut self, frame: &RenderFrame<'_>) -> Result<(), Self::Error>;
}

/// Owns the clock and the particle store and advances them per tick.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    clock: AnimationClock,
    kinematics: Kinematics,
    camera: CameraSchedule,
    store: ParticleStore,
    options: AnimationOptions,
    camera_z: f32,
}

impl FrameDriver {
    /// Create a driver. The camera starts at the schedule's start position.
    pub fn new(
        clock: AnimationClock,
        kinematics: Kinematics,
        camera: CameraSchedule,
        store: ParticleStore,
        options: AnimationOptions,
    ) -> Self {
        Self {
            clock,
            kinematics,
            camera_z: camera.start_z,
            camera,
            store,
            options,
        }
    }

    /// Advance to `timestamp` (seconds, any epoch, monotonically increasing).
    pub fn tick(&mut self, timestamp: f64) -> Tick {
        let time = self.clock.advance(timestamp);
        if time < 0.0 {
            return Tick::Waiting { remaining: -time };
        }

        if self.options.animate_particles {
            self.kinematics.apply(&mut self.store, time);
        }
        if self.options.animate_camera && !self.options.debug {
            self.camera_z = self.camera.z_at(time);
        }
        log::trace!(
            "Tick {} at t={:.3}s, camera z {:.4}",
            self.clock.frame(),
            time,
            self.camera_z
        );
        Tick::Advanced { time }
    }

    /// Replace the clock, keeping particles and camera where they are.
    ///
    /// Used to re-seed from the wall clock once setup has finished, so time
    /// spent sampling and creating the window is not lost.
    pub fn reset_clock(&mut self, clock: AnimationClock) {
        log::debug!(
            "Clock reset from t={:.3}s to t={:.3}s",
            self.clock.time(),
            clock.time()
        );
        self.clock = clock;
    }

    /// Tick, then present to `surface` if the animation has started.
    pub fn step<S: RenderSurface>(
        &mut self,
        timestamp: f64,
        surface: &mut S,
    ) -> Result<Tick, S::Error> {
        let tick = self.tick(timestamp);
        if let Tick::Advanced { .. } = tick {
            surface.present(&self.frame())?;
        }
        Ok(tick)
    }

    /// Snapshot of the current state for rendering.
    pub fn frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            positions: self.store.position_buffer(),
            colors: self.store.color_buffer(),
            lights: self.store.lights().copied().collect(),
            camera_z: self.camera_z,
            time: self.clock.time(),
        }
    }

    /// The animation clock.
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// The particle store.
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    /// Kinematic constants.
    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    /// Camera schedule.
    pub fn camera_schedule(&self) -> &CameraSchedule {
        &self.camera
    }

    /// Current scheduled camera Z.
    pub fn camera_z(&self) -> f32 {
        self.camera_z
    }

    /// Feature switches.
    pub fn options(&self) -> AnimationOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::Particle;
    use glam::Vec3;

    fn driver(start: f64, options: AnimationOptions) -> FrameDriver {
        let particles = (0..10)
            .map(|i| Particle::new(Vec3::new(0.1, 0.05 * i as f32, 0.0), Vec3::ONE))
            .collect();
        FrameDriver::new(
            AnimationClock::starting_at(start),
            Kinematics::new(10, 100.0, 4000.0, 0.0, 5.0).unwrap(),
            CameraSchedule::new(0.8, 4.7, 100.0),
            ParticleStore::from_particles(particles),
            options,
        )
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(f64, f32)>,
    }

    impl RenderSurface for Recorder {
        type Error = ();

        fn present(&mut self, frame: &RenderFrame<'_>) -> Result<(), ()> {
            self.frames.push((frame.time, frame.camera_z));
            Ok(())
        }
    }

    #[test]
    fn test_negative_time_waits() {
        let mut d = driver(-10.0, AnimationOptions::default());
        let before = d.store().position_buffer();
        assert_eq!(d.tick(0.0), Tick::Waiting { remaining: 10.0 });
        assert_eq!(d.tick(4.0), Tick::Waiting { remaining: 6.0 });
        assert_eq!(d.store().position_buffer(), before);
        assert_eq!(d.camera_z(), 0.8);
    }

    #[test]
    fn test_advances_particles_and_camera() {
        let mut d = driver(0.0, AnimationOptions::default());
        d.tick(0.0);
        assert_eq!(d.tick(50.0), Tick::Advanced { time: 50.0 });
        assert!((d.camera_z() - (0.8 + 3.9 * 0.25)).abs() < 1e-5);
        let moved = d
            .store()
            .particles()
            .iter()
            .any(|p| p.position != p.original_position());
        assert!(moved);
    }

    #[test]
    fn test_frozen_particles() {
        let options = AnimationOptions {
            animate_particles: false,
            ..AnimationOptions::default()
        };
        let mut d = driver(0.0, options);
        let before = d.store().position_buffer();
        d.tick(0.0);
        d.tick(80.0);
        assert_eq!(d.store().position_buffer(), before);
        assert!(d.camera_z() > 0.8);
    }

    #[test]
    fn test_debug_disables_schedule() {
        let options = AnimationOptions {
            debug: true,
            ..AnimationOptions::default()
        };
        let mut d = driver(0.0, options);
        d.tick(0.0);
        d.tick(100.0);
        assert_eq!(d.camera_z(), 0.8);
    }

    #[test]
    fn test_step_presents_only_when_running() {
        let mut d = driver(-1.0, AnimationOptions::default());
        let mut surface = Recorder::default();
        d.step(0.0, &mut surface).unwrap();
        d.step(0.5, &mut surface).unwrap();
        assert!(surface.frames.is_empty());
        d.step(2.0, &mut surface).unwrap();
        assert_eq!(surface.frames.len(), 1);
        assert_eq!(surface.frames[0].0, 1.0);
    }

    #[test]
    fn test_reset_clock_before_first_tick() {
        let mut d = driver(0.0, AnimationOptions::default());
        d.reset_clock(AnimationClock::starting_at(20.0));
        assert_eq!(d.tick(100.0), Tick::Advanced { time: 20.0 });
        assert_eq!(d.tick(101.0), Tick::Advanced { time: 21.0 });
        assert_eq!(d.clock().frame(), 2);
    }

    #[test]
    fn test_frame_buffers() {
        let d = driver(0.0, AnimationOptions::default());
        let frame = d.frame();
        assert_eq!(frame.positions.len(), 30);
        assert_eq!(frame.colors.len(), 30);
        assert!(frame.lights.is_empty());
    }
}
