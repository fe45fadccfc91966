//! End-to-end tests for the animation pipeline.
//!
//! These build real scenes from the built-in font and drive them headlessly,
//! checking the behavioural guarantees of sampling, kinematics, camera and the
//! frame driver together.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use yearfall::mesh::Ray;
use yearfall::{
    AnimationClock, AnimationConfig, AnimationError, ConfigError, FontResource, Kinematics,
    LightSelection, OutlineProvider, RenderFrame, RenderSurface, ResourceError, SamplingError,
    Scene, ShapeSampler, TextStyle, Tick, TriMesh,
};

fn font() -> FontResource {
    FontResource::builtin().unwrap()
}

fn config(particles: usize, duration: f64) -> AnimationConfig {
    AnimationConfig::default()
        .with_year(2025)
        .with_particle_count(particles)
        .with_duration(duration)
}

fn build(config: &AnimationConfig, seed: u64, start: f64) -> Scene {
    let mut rng = SmallRng::seed_from_u64(seed);
    Scene::build(config, &font(), AnimationClock::starting_at(start), &mut rng).unwrap()
}

// ============================================================================
// Shape Sampler
// ============================================================================

#[test]
fn test_sampled_text_particles_are_inside() {
    let mesh = font()
        .solid_text("2025", &TextStyle::new(0.5, 0.05))
        .unwrap();
    let sampler = ShapeSampler::new();
    let mut rng = SmallRng::seed_from_u64(1);
    let points = sampler.sample(&mesh, 400, &mut rng).unwrap();

    assert_eq!(points.len(), 400);
    for p in points {
        let crossings = mesh.count_crossings(&Ray::new(p, sampler.direction()));
        assert_eq!(crossings % 2, 1, "point {:?} is outside", p);
    }
}

#[test]
fn test_convex_solid_count_guarantee() {
    let mesh = TriMesh::cuboid(Vec3::new(-0.4, -0.2, -0.1), Vec3::new(0.4, 0.2, 0.1));
    let mut rng = SmallRng::seed_from_u64(2);
    let points = ShapeSampler::new().sample(&mesh, 500, &mut rng).unwrap();
    let bounds = mesh.bounding_box().unwrap();

    assert_eq!(points.len(), 500);
    assert!(points.iter().all(|p| bounds.contains(*p)));
}

#[test]
fn test_flat_sheet_reports_failure() {
    let sheet = TriMesh::new(
        vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
    .unwrap();
    let mut rng = SmallRng::seed_from_u64(3);
    let result = ShapeSampler::new()
        .with_max_attempts(5_000)
        .sample(&sheet, 100, &mut rng);

    assert!(matches!(
        result,
        Err(SamplingError::AttemptsExhausted {
            requested: 100,
            attempts: 5_000,
            ..
        })
    ));
}

// ============================================================================
// Kinematic Engine
// ============================================================================

#[test]
fn test_reference_scenario() {
    let k = Kinematics::new(100, 3600.0, 4000.0, 0.0, 5.0).unwrap();
    let original = Vec3::new(0.21, -0.08, 0.015);
    assert_eq!(k.start_time(0), 0.0);

    assert_eq!(k.displacement_scale(0, 0.0), Some(0.0));
    assert_eq!(k.position_at(original, 0, 0.0), original);

    let a = 4000.0 / (3600.0_f64 * 3600.0);
    let scale = a * 60.0 * 60.0;
    let expected = Vec3::new(
        (original.x as f64 * (1.0 + scale)) as f32,
        (original.y as f64 * (1.0 + scale)) as f32,
        (original.z as f64 + (1.0 + original.z as f64) * scale) as f32,
    );
    let actual = k.position_at(original, 0, 60.0);
    assert!((actual - expected).abs().max_element() < 1e-6);
}

#[test]
fn test_dormant_particles_hold_clamped_position() {
    let k = Kinematics::new(50, 100.0, 4000.0, 0.0, 1.0).unwrap();
    let original = Vec3::new(0.3, 0.2, 3.0);
    for i in 1..50 {
        let before = k.start_time(i) * 0.999;
        assert_eq!(k.position_at(original, i, before), Vec3::new(0.3, 0.2, 1.0));
    }
}

#[test]
fn test_positions_replay_exactly() {
    let cfg = config(200, 120.0);
    let mut a = build(&cfg, 5, 0.0);
    let mut b = build(&cfg, 5, 0.0);

    // Different tick cadence, same final time.
    for ts in [0.0, 10.0, 40.0, 90.0] {
        a.driver_mut().tick(ts);
    }
    for ts in [0.0, 90.0] {
        b.driver_mut().tick(ts);
    }
    assert_eq!(a.driver().frame().positions, b.driver().frame().positions);
}

#[test]
fn test_departure_order_follows_distance() {
    let scene = build(&config(300, 60.0), 6, 0.0);
    let k = scene.driver().kinematics();
    let source = Vec3::splat(-1.0);
    let particles = scene.driver().store().particles();

    for i in 1..particles.len() {
        let prev = particles[i - 1].original_position().distance_squared(source);
        let next = particles[i].original_position().distance_squared(source);
        assert!(prev <= next);
        assert!(k.start_time(i - 1) <= k.start_time(i));
    }
}

#[test]
fn test_light_intensity_never_negative() {
    let cfg = config(300, 60.0).with_lights(12, LightSelection::WithoutReplacement);
    let mut scene = build(&cfg, 7, 0.0);
    assert_eq!(scene.driver().store().lit_count(), 12);

    for step in 0..=20 {
        scene.driver_mut().tick(step as f64 * 5.0);
        for light in scene.driver().frame().lights {
            assert!(light.intensity >= 0.0);
            assert_eq!(light.intensity, 4.0 * light.position.length_squared());
        }
    }
}

// ============================================================================
// Camera and Frame Driver
// ============================================================================

#[test]
fn test_camera_reaches_new_text() {
    let cfg = config(100, 30.0);
    let mut scene = build(&cfg, 8, 0.0);
    assert_eq!(scene.driver().camera_z(), cfg.camera_start);

    scene.driver_mut().tick(0.0);
    let mut last = scene.driver().camera_z();
    for ts in 1..=40 {
        scene.driver_mut().tick(ts as f64);
        let z = scene.driver().camera_z();
        assert!(z >= last);
        last = z;
    }
    assert_eq!(last, cfg.camera_end());
}

#[derive(Default)]
struct CountingSurface {
    presented: usize,
    particles: usize,
}

impl RenderSurface for CountingSurface {
    type Error = std::convert::Infallible;

    fn present(&mut self, frame: &RenderFrame<'_>) -> Result<(), Self::Error> {
        self.presented += 1;
        self.particles = frame.positions.len() / 3;
        assert_eq!(frame.positions.len(), frame.colors.len());
        Ok(())
    }
}

#[test]
fn test_waiting_clock_skips_updates() {
    let mut scene = build(&config(100, 30.0), 9, -5.0);
    let mut surface = CountingSurface::default();
    let before = scene.driver().frame().positions;

    assert!(matches!(
        scene.driver_mut().step(0.0, &mut surface),
        Ok(Tick::Waiting { .. })
    ));
    assert!(matches!(
        scene.driver_mut().step(4.0, &mut surface),
        Ok(Tick::Waiting { .. })
    ));
    assert_eq!(surface.presented, 0);
    assert_eq!(scene.driver().frame().positions, before);

    assert!(matches!(
        scene.driver_mut().step(6.0, &mut surface),
        Ok(Tick::Advanced { .. })
    ));
    assert_eq!(surface.presented, 1);
    assert_eq!(surface.particles, 100);
}

// ============================================================================
// Initialization failures
// ============================================================================

#[test]
fn test_configuration_errors_stop_startup() {
    let mut rng = SmallRng::seed_from_u64(10);
    let font = font();

    let cases = [
        (config(100, 0.0), "duration"),
        (config(0, 10.0).with_lights(0, LightSelection::WithReplacement), "particles"),
        (config(5, 10.0), "lights"),
    ];
    for (cfg, label) in cases {
        let err = Scene::build(&cfg, &font, AnimationClock::default(), &mut rng).unwrap_err();
        assert!(matches!(err, AnimationError::Config(_)), "{}: {:?}", label, err);
    }

    let err = Scene::build(&config(5, 10.0), &font, AnimationClock::default(), &mut rng)
        .unwrap_err();
    assert!(matches!(
        err,
        AnimationError::Config(ConfigError::TooManyLights {
            lights: 12,
            particles: 5
        })
    ));
}

#[test]
fn test_missing_glyph_is_resource_failure() {
    let json = r###"{"familyName":"Tiny","cellWidth":1,"cellHeight":1,"glyphs":{"2":["#"]}}"###;
    let font = FontResource::from_json(json).unwrap();
    let mut rng = SmallRng::seed_from_u64(11);
    let err = Scene::build(
        &config(10, 10.0).with_lights(1, LightSelection::WithReplacement),
        &font,
        AnimationClock::default(),
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AnimationError::Resource(ResourceError::MissingGlyph('0'))
    ));
}
