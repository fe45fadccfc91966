//! # yearfall
//!
//! A year-transition animation: this year's number, extruded into a solid,
//! dissolves into thousands of colored particles that fly outward while the
//! camera drifts toward next year's number.
//!
//! ## Quick Start
//!
//! ```ignore
//! use yearfall::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     let config = AnimationConfig::default()
//!         .with_duration(120.0)
//!         .with_start_offset(0.0);
//!     yearfall::run(config)
//! }
//! ```
//!
//! ## Pipeline
//!
//! Everything that can fail runs once, up front, in [`Scene::build`]:
//!
//! 1. [`AnimationConfig::validate`] rejects unusable settings.
//! 2. An [`OutlineProvider`] (the built-in block font) extrudes the old year
//!    into a closed [`TriMesh`].
//! 3. [`ShapeSampler`] draws points inside it by rejection sampling with a
//!    ray-parity inside test, under an attempt cap.
//! 4. [`ParticleStore`] colors the points from a random [`Palette`], orders
//!    them by distance from a source point, and binds a few [`Light`]s.
//!
//! After that, [`FrameDriver::tick`] is total: given a timestamp it advances
//! the [`AnimationClock`], places every particle with [`Kinematics`] as a pure
//! function of time, and eases the camera with [`CameraSchedule`].
//!
//! ## Headless use
//!
//! The window and GPU are only one [`RenderSurface`]. Tests and tools can
//! drive the animation without a display:
//!
//! ```ignore
//! let font = FontResource::builtin()?;
//! let mut rng = SmallRng::seed_from_u64(1);
//! let mut scene = Scene::build(&config, &font, AnimationClock::starting_at(0.0), &mut rng)?;
//! scene.driver_mut().tick(0.0);
//! scene.driver_mut().tick(60.0);
//! let frame = scene.driver().frame();
//! ```

pub mod camera;
pub mod config;
pub mod driver;
pub mod error;
pub mod font;
mod gpu;
pub mod kinematics;
pub mod mesh;
pub mod particles;
pub mod sampler;
pub mod scene;
pub mod text;
pub mod time;
mod window;

pub use camera::{CameraSchedule, CameraView, OrbitCamera};
pub use config::{AnimationConfig, AnimationOptions};
pub use driver::{FrameDriver, RenderFrame, RenderSurface, Tick};
pub use error::{AnimationError, ConfigError, GpuError, ResourceError, RunError, SamplingError};
pub use font::{FontResource, FontSource};
pub use glam::Vec3;
pub use kinematics::Kinematics;
pub use mesh::{Aabb, Ray, TriMesh};
pub use particles::{Light, LightSelection, Palette, Particle, ParticleStore};
pub use sampler::ShapeSampler;
pub use scene::Scene;
pub use text::{OutlineProvider, TextStyle};
pub use time::AnimationClock;
pub use window::run;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use yearfall::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::CameraSchedule;
    pub use crate::config::{AnimationConfig, AnimationOptions};
    pub use crate::driver::{FrameDriver, RenderFrame, RenderSurface, Tick};
    pub use crate::error::{AnimationError, RunError};
    pub use crate::font::{FontResource, FontSource};
    pub use crate::particles::LightSelection;
    pub use crate::scene::Scene;
    pub use crate::text::{OutlineProvider, TextStyle};
    pub use crate::time::AnimationClock;
    pub use crate::Vec3;
}
