//! Animation configuration.
//!
//! [`AnimationConfig::default`] reproduces the reference show: 5000 particles
//! leaving this year's text over six hours, starting at 18:00 local time so
//! the camera reaches next year's text at midnight.
//!
//! ```ignore
//! let config = AnimationConfig::default()
//!     .with_particle_count(2000)
//!     .with_duration(60.0)
//!     .with_start_offset(0.0);
//! config.validate()?;
//! ```

use glam::Vec3;

use crate::camera::CameraSchedule;
use crate::error::ConfigError;
use crate::font::FontSource;
use crate::particles::LightSelection;
use crate::sampler::{ShapeSampler, DEFAULT_MAX_ATTEMPTS};
use crate::text::TextStyle;
use crate::time::local_year;

/// Feature switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationOptions {
    /// Move particles. When off, particles stay frozen where they were sampled.
    pub animate_particles: bool,
    /// Ease the camera. When off, it stays at its start position.
    pub animate_camera: bool,
    /// Finer tessellation of generated text. Cosmetic only.
    pub smooth: bool,
    /// Replace the scheduled camera with a mouse-driven orbit camera.
    pub debug: bool,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            animate_particles: true,
            animate_camera: true,
            smooth: true,
            debug: false,
        }
    }
}

/// Everything needed to set up an animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Number of particles sampled from the old-year text.
    pub particle_count: usize,
    /// Seconds from the first departure to the last.
    pub duration: f64,
    /// `K` in `acceleration = K / duration²`.
    pub acceleration_constant: f64,
    /// Speed every particle starts with on departure.
    pub initial_speed: f64,
    /// Number of light draws.
    pub light_count: usize,
    /// Whether light draws may repeat a particle.
    pub light_selection: LightSelection,
    /// Number of palette colors.
    pub palette_size: usize,
    /// Departure order source. `None` keeps sampling order.
    pub source: Option<Vec3>,
    /// The year being left. `None` uses the current local year.
    pub year: Option<i32>,
    /// Height of the old-year glyphs.
    pub text_size: f32,
    /// Extrusion depth of all text.
    pub text_depth: f32,
    /// Height of the new-year glyphs.
    pub new_text_size: f32,
    /// Z plane of the new-year text.
    pub new_text_z: f32,
    /// Particles starting beyond `new_text_z + z_clamp_offset` are clamped.
    pub z_clamp_offset: f32,
    /// Camera Z at time 0.
    pub camera_start: f32,
    /// Camera ends at `new_text_z + camera_end_offset`.
    pub camera_end_offset: f32,
    /// Seconds after local midnight at which animation time is 0.
    pub start_offset: f64,
    /// Cap on sampling candidates.
    pub max_sampling_attempts: usize,
    /// Font used for both texts.
    pub font: FontSource,
    /// Feature switches.
    pub options: AnimationOptions,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            particle_count: 5000,
            duration: 6.0 * 3600.0,
            acceleration_constant: 4000.0,
            initial_speed: 0.0,
            light_count: 12,
            light_selection: LightSelection::WithReplacement,
            palette_size: 4,
            source: Some(Vec3::splat(-1.0)),
            year: None,
            text_size: 0.5,
            text_depth: 0.05,
            new_text_size: 2.0,
            new_text_z: 2.5,
            z_clamp_offset: 2.5,
            camera_start: 0.8,
            camera_end_offset: 2.2,
            start_offset: 18.0 * 3600.0,
            max_sampling_attempts: DEFAULT_MAX_ATTEMPTS,
            font: FontSource::Builtin,
            options: AnimationOptions::default(),
        }
    }
}

impl AnimationConfig {
    /// Reference configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the total duration in seconds.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Set the acceleration constant `K`.
    pub fn with_acceleration_constant(mut self, k: f64) -> Self {
        self.acceleration_constant = k;
        self
    }

    /// Set the departure speed.
    pub fn with_initial_speed(mut self, speed: f64) -> Self {
        self.initial_speed = speed;
        self
    }

    /// Set the number of lights and how they are drawn.
    pub fn with_lights(mut self, count: usize, selection: LightSelection) -> Self {
        self.light_count = count;
        self.light_selection = selection;
        self
    }

    /// Set the palette size.
    pub fn with_palette_size(mut self, size: usize) -> Self {
        self.palette_size = size;
        self
    }

    /// Set the departure order source, or `None` to skip sorting.
    pub fn with_source(mut self, source: Option<Vec3>) -> Self {
        self.source = source;
        self
    }

    /// Fix the year instead of reading the clock.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the old-year glyph height.
    pub fn with_text_size(mut self, size: f32) -> Self {
        self.text_size = size;
        self
    }

    /// Set where animation time 0 falls, in seconds after local midnight.
    pub fn with_start_offset(mut self, offset: f64) -> Self {
        self.start_offset = offset;
        self
    }

    /// Set the sampling candidate cap.
    pub fn with_max_sampling_attempts(mut self, attempts: usize) -> Self {
        self.max_sampling_attempts = attempts;
        self
    }

    /// Set the font.
    pub fn with_font(mut self, font: FontSource) -> Self {
        self.font = font;
        self
    }

    /// Set the feature switches.
    pub fn with_options(mut self, options: AnimationOptions) -> Self {
        self.options = options;
        self
    }

    /// Turn debug mode on or off.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.options.debug = debug;
        self
    }

    /// Reject configurations the animation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite64 = [
            ("duration", self.duration),
            ("acceleration_constant", self.acceleration_constant),
            ("initial_speed", self.initial_speed),
            ("start_offset", self.start_offset),
        ];
        let finite32 = [
            ("text_size", self.text_size),
            ("text_depth", self.text_depth),
            ("new_text_size", self.new_text_size),
            ("new_text_z", self.new_text_z),
            ("z_clamp_offset", self.z_clamp_offset),
            ("camera_start", self.camera_start),
            ("camera_end_offset", self.camera_end_offset),
        ];
        if let Some((name, _)) = finite64.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite(*name));
        }
        if let Some((name, _)) = finite32.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite(*name));
        }
        if self.source.is_some_and(|s| !s.is_finite()) {
            return Err(ConfigError::NonFinite("source"));
        }

        if self.duration <= 0.0 {
            return Err(ConfigError::NonPositiveDuration(self.duration));
        }
        if self.particle_count == 0 {
            return Err(ConfigError::ZeroParticles);
        }
        if self.light_count > self.particle_count {
            return Err(ConfigError::TooManyLights {
                lights: self.light_count,
                particles: self.particle_count,
            });
        }
        if self.palette_size == 0 {
            return Err(ConfigError::EmptyPalette);
        }
        for size in [self.text_size, self.text_depth, self.new_text_size] {
            if size <= 0.0 {
                return Err(ConfigError::InvalidTextSize(size));
            }
        }
        Ok(())
    }

    /// The year being left behind.
    pub fn resolved_year(&self) -> i32 {
        self.year.unwrap_or_else(local_year)
    }

    /// Text that dissolves into particles.
    pub fn old_text(&self) -> String {
        self.resolved_year().to_string()
    }

    /// Text waiting at `new_text_z`.
    pub fn new_text(&self) -> String {
        (self.resolved_year() + 1).to_string()
    }

    /// Largest starting Z a particle may have.
    pub fn z_limit(&self) -> f32 {
        self.new_text_z + self.z_clamp_offset
    }

    /// Camera Z once the animation ends.
    pub fn camera_end(&self) -> f32 {
        self.new_text_z + self.camera_end_offset
    }

    /// Camera easing for this configuration.
    pub fn camera_schedule(&self) -> CameraSchedule {
        CameraSchedule::new(self.camera_start, self.camera_end(), self.duration)
    }

    /// Style of the old-year text. Never smoothed: it is only sampled.
    pub fn old_text_style(&self) -> TextStyle {
        TextStyle::new(self.text_size, self.text_depth)
    }

    /// Style of the new-year text.
    pub fn new_text_style(&self) -> TextStyle {
        TextStyle::new(self.new_text_size, self.text_depth).with_smooth(self.options.smooth)
    }

    /// Sampler with this configuration's attempt cap.
    pub fn sampler(&self) -> ShapeSampler {
        ShapeSampler::new().with_max_attempts(self.max_sampling_attempts)
    }
}
