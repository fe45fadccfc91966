//! Rejection sampling of points inside a closed mesh.
//!
//! Candidates are drawn uniformly from the mesh's bounding box and kept only
//! when the parity test says they are inside the solid. The loop is bounded
//! by an attempt budget so a degenerate mesh (flat, open, or inverted)
//! produces a [`SamplingError`] instead of hanging.
//!
//! ```ignore
//! let mut rng = SmallRng::seed_from_u64(7);
//! let points = ShapeSampler::new().sample(&mesh, 5000, &mut rng)?;
//! ```

use glam::Vec3;
use rand::Rng;

use crate::error::SamplingError;
use crate::mesh::{Aabb, TriMesh};

/// Default cap on candidate draws.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000_000;

/// Default ray direction for the parity test.
pub const DEFAULT_DIRECTION: Vec3 = Vec3::Z;

/// Draws points that lie inside a solid mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSampler {
    max_attempts: usize,
    direction: Vec3,
}

impl Default for ShapeSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeSampler {
    /// Sampler casting along +Z with the default attempt budget.
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            direction: DEFAULT_DIRECTION,
        }
    }

    /// Set the maximum number of candidates drawn before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the parity ray direction.
    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction;
        self
    }

    /// Ray direction used by the inside test.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Attempt budget.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Sample exactly `count` points inside `mesh`.
    ///
    /// Either every requested point is returned or an error is; a partially
    /// filled set never escapes.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        mesh: &TriMesh,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec3>, SamplingError> {
        let bounds = mesh.bounding_box().ok_or(SamplingError::EmptyMesh)?;
        let mut points = Vec::with_capacity(count);
        let mut attempts = 0;

        while points.len() < count {
            if attempts >= self.max_attempts {
                log::warn!(
                    "Sampling exhausted {} attempts with {}/{} points accepted",
                    attempts,
                    points.len(),
                    count
                );
                return Err(SamplingError::AttemptsExhausted {
                    requested: count,
                    accepted: points.len(),
                    attempts,
                });
            }
            attempts += 1;

            let candidate = random_in_box(&bounds, rng);
            if mesh.contains(candidate, self.direction) {
                points.push(candidate);
            }
        }

        log::info!(
            "Sampled {} points in {} attempts (acceptance {:.1}%, {} triangles)",
            count,
            attempts,
            if attempts == 0 {
                100.0
            } else {
                100.0 * count as f64 / attempts as f64
            },
            mesh.triangle_count()
        );
        Ok(points)
    }
}

/// Uniform random point inside `bounds`.
///
/// Works for flat boxes too (a zero-width axis yields the min coordinate).
pub fn random_in_box<R: Rng + ?Sized>(bounds: &Aabb, rng: &mut R) -> Vec3 {
    let size = bounds.size();
    bounds.min
        + Vec3::new(
            size.x * rng.gen::<f32>(),
            size.y * rng.gen::<f32>(),
            size.z * rng.gen::<f32>(),
        )
}
