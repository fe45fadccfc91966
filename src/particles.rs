//! Particles, their palette colors, and the point lights they carry.
//!
//! [`ParticleStore`] owns every particle. A particle may own one [`Light`];
//! the kinematic engine moves the light with its particle every tick.

use glam::Vec3;
use rand::Rng;

/// Largest 24-bit RGB value plus one.
const MAX_COLOR: u32 = 1 << 24;

/// Point light bound to a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// World position, mirrored from the owning particle.
    pub position: Vec3,
    /// RGB color (0-1), the owning particle's color.
    pub color: Vec3,
    /// Brightness, never negative.
    pub intensity: f32,
}

impl Light {
    /// Create an unlit light at `position`.
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            color,
            intensity: 0.0,
        }
    }
}

/// A single particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current position.
    pub position: Vec3,
    original_position: Vec3,
    /// RGB color (0-1).
    pub color: Vec3,
    /// Light carried by this particle, if any.
    pub light: Option<Light>,
}

impl Particle {
    /// Create a particle resting at `position`.
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            original_position: position,
            color,
            light: None,
        }
    }

    /// Position at creation. Never changes.
    pub fn original_position(&self) -> Vec3 {
        self.original_position
    }
}

/// How light-carrying particles are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightSelection {
    /// Draw indices independently. Repeated draws land on the same particle,
    /// so fewer lights than requested may exist.
    #[default]
    WithReplacement,
    /// Draw distinct indices, so exactly the requested count is lit.
    WithoutReplacement,
}

/// Small fixed set of colors, chosen once.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Vec3>,
}

impl Palette {
    /// Palette from explicit colors.
    pub fn new(colors: Vec<Vec3>) -> Self {
        Self { colors }
    }

    /// `size` uniformly random 24-bit colors.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let colors = (0..size).map(|_| hex_to_rgb(rng.gen_range(0..MAX_COLOR))).collect();
        Self { colors }
    }

    /// Palette colors.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Uniformly pick one color. Returns white for an empty palette.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        if self.colors.is_empty() {
            return Vec3::ONE;
        }
        self.colors[rng.gen_range(0..self.colors.len())]
    }
}

/// Convert a packed `0xRRGGBB` value to RGB in 0-1.
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Owner of all particles and their lights.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    colors: Vec<f32>,
}

impl ParticleStore {
    /// Build a store from sampled points, coloring each from `palette`.
    pub fn new<R: Rng + ?Sized>(points: Vec<Vec3>, palette: &Palette, rng: &mut R) -> Self {
        let particles = points
            .into_iter()
            .map(|p| Particle::new(p, palette.pick(rng)))
            .collect();
        Self::from_particles(particles)
    }

    /// Build a store from ready-made particles.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let colors = flatten(particles.iter().map(|p| p.color));
        Self { particles, colors }
    }

    /// Order particles by squared distance to `source`, nearest first.
    ///
    /// After this, a particle's index doubles as its departure order.
    pub fn sort_by_distance(&mut self, source: Vec3) {
        self.particles.sort_by(|a, b| {
            let da = a.original_position.distance_squared(source);
            let db = b.original_position.distance_squared(source);
            da.total_cmp(&db)
        });
        self.colors = flatten(self.particles.iter().map(|p| p.color));
    }

    /// Attach `count` lights to randomly chosen particles.
    ///
    /// Returns how many distinct particles ended up lit. A particle already
    /// carrying a light keeps a single (replaced) light.
    pub fn assign_lights<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        selection: LightSelection,
        rng: &mut R,
    ) -> usize {
        let len = self.particles.len();
        if len == 0 {
            return 0;
        }

        let indices: Vec<usize> = match selection {
            LightSelection::WithReplacement => (0..count).map(|_| rng.gen_range(0..len)).collect(),
            LightSelection::WithoutReplacement => {
                rand::seq::index::sample(rng, len, count.min(len)).into_vec()
            }
        };

        for idx in indices {
            let particle = &mut self.particles[idx];
            particle.light = Some(Light::new(particle.position, particle.color));
        }

        let lit = self.lit_count();
        if lit < count {
            log::warn!(
                "Requested {} lights but only {} distinct particles were chosen",
                count,
                lit
            );
        }
        lit
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Read access to all particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for the kinematic engine.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of particles carrying a light.
    pub fn lit_count(&self) -> usize {
        self.particles.iter().filter(|p| p.light.is_some()).count()
    }

    /// Lights in particle order.
    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.particles.iter().filter_map(|p| p.light.as_ref())
    }

    /// Flat `[x, y, z, x, y, z, ...]` buffer of current positions.
    pub fn position_buffer(&self) -> Vec<f32> {
        flatten(self.particles.iter().map(|p| p.position))
    }

    /// Flat `[r, g, b, r, g, b, ...]` buffer of colors.
    pub fn color_buffer(&self) -> &[f32] {
        &self.colors
    }
}

fn flatten(values: impl Iterator<Item = Vec3>) -> Vec<f32> {
    values.flat_map(|v| v.to_array()).collect()
}
