//! Staggered outward flight of particles.
//!
//! Every particle's position is a pure function of its original position,
//! its index and the animation time. Nothing is integrated frame to frame,
//! so evaluating the same time twice gives bit-identical results regardless
//! of frame rate.
//!
//! Particle `i` departs at `start_time(i) = sqrt(i / disintegration_rate)`.
//! With `disintegration_rate = N / duration²` the last particle leaves at
//! `duration`, and departures are front-loaded. After departure, with
//! `τ = t - start_time(i)`:
//!
//! ```text
//! v     = initial_speed + acceleration * start_time(i)
//! scale = v * τ + acceleration * τ²
//! x'    = x * (1 + scale)
//! y'    = y * (1 + scale)
//! z'    = z + (1 + z) * scale
//! ```

use glam::Vec3;

use crate::config::AnimationConfig;
use crate::error::ConfigError;
use crate::particles::ParticleStore;

/// Light intensity per squared unit of distance from the origin.
pub const LIGHT_INTENSITY_SCALE: f32 = 4.0;

/// Per-animation motion constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    disintegration_rate: f64,
    acceleration: f64,
    initial_speed: f64,
    z_limit: f32,
}

impl Kinematics {
    /// Derive the constants for `particle_count` particles over `duration`
    /// seconds. `acceleration_constant` is `K` in `K / duration²`; particles
    /// starting beyond `z_limit` are clamped to it before moving.
    pub fn new(
        particle_count: usize,
        duration: f64,
        acceleration_constant: f64,
        initial_speed: f64,
        z_limit: f32,
    ) -> Result<Self, ConfigError> {
        if !duration.is_finite() {
            return Err(ConfigError::NonFinite("duration"));
        }
        if duration <= 0.0 {
            return Err(ConfigError::NonPositiveDuration(duration));
        }
        if particle_count == 0 {
            return Err(ConfigError::ZeroParticles);
        }
        if !acceleration_constant.is_finite() {
            return Err(ConfigError::NonFinite("acceleration_constant"));
        }
        if !initial_speed.is_finite() {
            return Err(ConfigError::NonFinite("initial_speed"));
        }

        let duration_sq = duration * duration;
        Ok(Self {
            disintegration_rate: particle_count as f64 / duration_sq,
            acceleration: acceleration_constant / duration_sq,
            initial_speed,
            z_limit,
        })
    }

    /// Constants for a validated configuration.
    pub fn from_config(config: &AnimationConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.particle_count,
            config.duration,
            config.acceleration_constant,
            config.initial_speed,
            config.z_limit(),
        )
    }

    /// Particles per squared second.
    pub fn disintegration_rate(&self) -> f64 {
        self.disintegration_rate
    }

    /// Outward acceleration.
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Departure time of particle `index`.
    #[inline]
    pub fn start_time(&self, index: usize) -> f64 {
        (index as f64 / self.disintegration_rate).sqrt()
    }

    /// Outward displacement factor at `time`, `None` while still dormant.
    #[inline]
    pub fn displacement_scale(&self, index: usize, time: f64) -> Option<f64> {
        let start = self.start_time(index);
        if time < start {
            return None;
        }
        let tau = time - start;
        let v = self.initial_speed + self.acceleration * start;
        Some(v * tau + self.acceleration * tau * tau)
    }

    /// Clamp an original position to the z limit.
    #[inline]
    pub fn clamp(&self, original: Vec3) -> Vec3 {
        Vec3::new(original.x, original.y, original.z.min(self.z_limit))
    }

    /// Position of particle `index` at `time`.
    ///
    /// The clamped z is both the base and the `(1 + z)` factor, so a clamped
    /// particle moves exactly as one that started at the limit. Scaling by the
    /// unclamped z instead would push it further than its neighbours.
    pub fn position_at(&self, original: Vec3, index: usize, time: f64) -> Vec3 {
        let base = self.clamp(original);
        match self.displacement_scale(index, time) {
            None => base,
            Some(scale) => {
                let (x, y, z) = (base.x as f64, base.y as f64, base.z as f64);
                Vec3::new(
                    (x * (1.0 + scale)) as f32,
                    (y * (1.0 + scale)) as f32,
                    (z + (1.0 + z) * scale) as f32,
                )
            }
        }
    }

    /// Move every particle (and its light) to where it is at `time`.
    pub fn apply(&self, store: &mut ParticleStore, time: f64) {
        for (index, particle) in store.particles_mut().iter_mut().enumerate() {
            let position = self.position_at(particle.original_position(), index, time);
            particle.position = position;
            if let Some(light) = &mut particle.light {
                light.position = position;
                light.intensity = light_intensity(position);
            }
        }
    }
}

/// Brightness of a light at `position`: grows with distance from the origin.
#[inline]
pub fn light_intensity(position: Vec3) -> f32 {
    LIGHT_INTENSITY_SCALE * position.length_squared()
}
