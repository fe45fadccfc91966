//! One-shot scene setup.
//!
//! Every fallible step happens here, before the first tick: validating the
//! configuration, extruding both texts, sampling particles, and building the
//! store. A [`Scene`] that exists is ready to animate.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::AnimationConfig;
use crate::driver::FrameDriver;
use crate::error::AnimationError;
use crate::kinematics::Kinematics;
use crate::mesh::TriMesh;
use crate::particles::{Palette, ParticleStore};
use crate::text::OutlineProvider;
use crate::time::AnimationClock;

/// A fully initialized animation.
#[derive(Debug, Clone)]
pub struct Scene {
    driver: FrameDriver,
    new_text: TriMesh,
    config: AnimationConfig,
}

impl Scene {
    /// Build a scene with an explicit provider, clock and random source.
    pub fn build<P, R>(
        config: &AnimationConfig,
        provider: &P,
        clock: AnimationClock,
        rng: &mut R,
    ) -> Result<Self, AnimationError>
    where
        P: OutlineProvider + ?Sized,
        R: Rng + ?Sized,
    {
        config.validate()?;
        // Both texts derive from one year, resolved once.
        let config = config.clone().with_year(config.resolved_year());

        let old_text = config.old_text();
        let old_mesh = provider.solid_text(&old_text, &config.old_text_style())?;
        let mut new_text = provider.solid_text(&config.new_text(), &config.new_text_style())?;
        new_text.translate(Vec3::new(0.0, 0.0, config.new_text_z));
        log::debug!(
            "New text {:?}: {} triangles at z={}",
            config.new_text(),
            new_text.triangle_count(),
            config.new_text_z
        );

        let points = config
            .sampler()
            .sample(&old_mesh, config.particle_count, rng)?;

        let palette = Palette::random(config.palette_size, rng);
        let mut store = ParticleStore::new(points, &palette, rng);
        if let Some(source) = config.source {
            store.sort_by_distance(source);
        }
        let lit = store.assign_lights(config.light_count, config.light_selection, rng);
        log::info!(
            "Built {} particles from {:?} with {} palette colors and {} lights",
            store.len(),
            old_text,
            palette.len(),
            lit
        );

        let kinematics = Kinematics::from_config(&config)?;
        let driver = FrameDriver::new(
            clock,
            kinematics,
            config.camera_schedule(),
            store,
            config.options,
        );

        Ok(Self {
            driver,
            new_text,
            config,
        })
    }

    /// Build a scene the way the binary does: font from the configured
    /// source, clock seeded from local time, entropy-seeded randomness.
    pub fn from_config(config: &AnimationConfig) -> Result<Self, AnimationError> {
        config.validate()?;
        let font = config.font.load()?;
        let clock = AnimationClock::from_local_time(config.start_offset);
        let mut rng = SmallRng::from_entropy();
        Self::build(config, &font, clock, &mut rng)
    }

    /// Re-seed the clock from local time, if it has not ticked yet.
    ///
    /// Returns whether the clock was replaced.
    pub fn resync_to_local_time(&mut self) -> bool {
        if self.driver.clock().frame() > 0 {
            return false;
        }
        let clock = AnimationClock::from_local_time(self.config.start_offset);
        self.driver.reset_clock(clock);
        true
    }

    /// The frame driver.
    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    /// Mutable frame driver, for ticking.
    pub fn driver_mut(&mut self) -> &mut FrameDriver {
        &mut self.driver
    }

    /// The new-year text solid, already placed at its Z plane.
    pub fn new_text(&self) -> &TriMesh {
        &self.new_text
    }

    /// Configuration the scene was built from, with the year resolved.
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, ResourceError, SamplingError};
    use crate::font::FontResource;

    fn small_config() -> AnimationConfig {
        AnimationConfig::default()
            .with_year(2025)
            .with_particle_count(300)
            .with_duration(60.0)
    }

    #[test]
    fn test_build_small_scene() {
        let font = FontResource::builtin().unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        let scene = Scene::build(
            &small_config(),
            &font,
            AnimationClock::starting_at(0.0),
            &mut rng,
        )
        .unwrap();
        let store = scene.driver().store();
        assert_eq!(store.len(), 300);
        assert!(store.lit_count() >= 1 && store.lit_count() <= 12);

        let bounds = scene.new_text().bounding_box().unwrap();
        assert!((bounds.center().z - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_particles_sorted_from_source() {
        let font = FontResource::builtin().unwrap();
        let mut rng = SmallRng::seed_from_u64(12);
        let scene = Scene::build(
            &small_config(),
            &font,
            AnimationClock::starting_at(0.0),
            &mut rng,
        )
        .unwrap();
        let source = Vec3::splat(-1.0);
        let d: Vec<f32> = scene
            .driver()
            .store()
            .particles()
            .iter()
            .map(|p| p.original_position().distance_squared(source))
            .collect();
        assert!(d.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_invalid_config_fails_before_sampling() {
        let font = FontResource::builtin().unwrap();
        let mut rng = SmallRng::seed_from_u64(13);
        let config = small_config().with_duration(-5.0);
        let err = Scene::build(&config, &font, AnimationClock::default(), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            AnimationError::Config(ConfigError::NonPositiveDuration(_))
        ));
    }

    #[test]
    fn test_attempt_cap_surfaces() {
        let font = FontResource::builtin().unwrap();
        let mut rng = SmallRng::seed_from_u64(14);
        let config = small_config().with_max_sampling_attempts(10);
        let err = Scene::build(&config, &font, AnimationClock::default(), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            AnimationError::Sampling(SamplingError::AttemptsExhausted { .. })
        ));
    }

    #[test]
    fn test_missing_new_year_glyph_fails_before_sampling() {
        // Enough glyphs for 2025 but not for 2026.
        let json = r###"{"familyName":"Partial","cellWidth":1,"cellHeight":1,
            "glyphs":{"2":["#"],"0":["#"],"5":["#"]}}"###;
        let font = FontResource::from_json(json).unwrap();
        let mut rng = SmallRng::seed_from_u64(15);
        let config = small_config()
            .with_particle_count(50)
            .with_max_sampling_attempts(10);
        let err = Scene::build(&config, &font, AnimationClock::default(), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            AnimationError::Resource(ResourceError::MissingGlyph('6'))
        ));
    }

    #[test]
    fn test_year_is_resolved_once() {
        let font = FontResource::builtin().unwrap();
        let mut rng = SmallRng::seed_from_u64(16);
        let config = AnimationConfig::default()
            .with_particle_count(50)
            .with_duration(60.0);
        assert_eq!(config.year, None);

        let scene = Scene::build(&config, &font, AnimationClock::default(), &mut rng).unwrap();
        let year = scene.config().year.unwrap();
        assert_eq!(scene.config().old_text(), year.to_string());
        assert_eq!(scene.config().new_text(), (year + 1).to_string());
    }

    #[test]
    fn test_resync_only_before_first_tick() {
        let font = FontResource::builtin().unwrap();
        let mut rng = SmallRng::seed_from_u64(17);
        let mut scene = Scene::build(
            &small_config().with_particle_count(50),
            &font,
            AnimationClock::starting_at(0.0),
            &mut rng,
        )
        .unwrap();

        assert!(scene.resync_to_local_time());
        let seeded = scene.driver().clock().time();
        assert!(seeded > -crate::time::SECONDS_PER_DAY && seeded < crate::time::SECONDS_PER_DAY);

        scene.driver_mut().tick(0.0);
        assert!(!scene.resync_to_local_time());
        assert_eq!(scene.driver().clock().time(), seeded);
    }
}
