//! Cameras: the scheduled dolly and the debug orbit camera.
//!
//! In normal mode the camera sits on the Z axis and looks down −Z while
//! [`CameraSchedule`] eases it from the old text toward the new one. In debug
//! mode an [`OrbitCamera`] driven by the mouse replaces the schedule.

use glam::{Mat4, Vec3};

/// Vertical field of view in degrees.
pub const FOV_DEGREES: f32 = 75.0;
/// Near clip plane.
pub const NEAR: f32 = 0.1;
/// Far clip plane.
pub const FAR: f32 = 1000.0;

/// Quadratic ease-in of the camera's Z coordinate over the animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSchedule {
    /// Z at time 0.
    pub start_z: f32,
    /// Z from `duration` onward.
    pub end_z: f32,
    /// Seconds to travel from `start_z` to `end_z`.
    pub duration: f64,
}

impl CameraSchedule {
    /// Create a schedule. `duration` must be positive.
    pub fn new(start_z: f32, end_z: f32, duration: f64) -> Self {
        Self {
            start_z,
            end_z,
            duration,
        }
    }

    /// Eased progress in `[0, 1]` at `time`.
    #[inline]
    pub fn progress(&self, time: f64) -> f64 {
        let t = (time / self.duration).clamp(0.0, 1.0);
        t * t
    }

    /// Camera Z at `time`. Holds at `end_z` once `time >= duration`.
    pub fn z_at(&self, time: f64) -> f32 {
        if time >= self.duration {
            return self.end_z;
        }
        let start = self.start_z as f64;
        let end = self.end_z as f64;
        (start + (end - start) * self.progress(time)) as f32
    }
}

/// Orbit camera for inspecting the scene in debug mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl OrbitCamera {
    const PITCH_LIMIT: f32 = 1.5;
    const MIN_DISTANCE: f32 = 0.2;
    const MAX_DISTANCE: f32 = 200.0;

    /// Camera `distance` units in front of `target`, facing it head on.
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance,
            target,
        }
    }

    /// World position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Rotate by a mouse drag, in radians.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw -= delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Move toward (positive) or away from (negative) the target.
    pub fn zoom(&mut self, amount: f32) {
        self.distance =
            (self.distance * (1.0 - amount)).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    /// View for rendering.
    pub fn view(&self, aspect: f32) -> CameraView {
        let position = self.position();
        CameraView {
            position,
            view: Mat4::look_at_rh(position, self.target, Vec3::Y),
            projection: perspective(aspect),
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 3.0)
    }
}

/// Matrices and eye position for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// Eye position in world space.
    pub position: Vec3,
    /// World to view.
    pub view: Mat4,
    /// View to clip.
    pub projection: Mat4,
}

impl CameraView {
    /// Camera at `(0, 0, z)` looking down −Z.
    pub fn dolly(z: f32, aspect: f32) -> Self {
        let position = Vec3::new(0.0, 0.0, z);
        Self {
            position,
            view: Mat4::look_to_rh(position, Vec3::NEG_Z, Vec3::Y),
            projection: perspective(aspect),
        }
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}

fn perspective(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FOV_DEGREES.to_radians(), aspect.max(f32::EPSILON), NEAR, FAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> CameraSchedule {
        CameraSchedule::new(0.8, 4.7, 21_600.0)
    }

    #[test]
    fn test_endpoints() {
        let s = schedule();
        assert_eq!(s.z_at(0.0), 0.8);
        assert_eq!(s.z_at(21_600.0), 4.7);
        assert_eq!(s.z_at(1e9), 4.7);
    }

    #[test]
    fn test_monotonic_when_moving_forward() {
        let s = schedule();
        let mut last = s.z_at(0.0);
        for step in 1..=100 {
            let z = s.z_at(step as f64 * 216.0);
            assert!(z >= last);
            last = z;
        }
    }

    #[test]
    fn test_quadratic_ease_in() {
        let s = CameraSchedule::new(0.0, 1.0, 10.0);
        assert!((s.z_at(5.0) - 0.25).abs() < 1e-6);
        assert!((s.progress(2.0) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_dolly_looks_down_negative_z() {
        let view = CameraView::dolly(2.0, 1.5);
        let in_front = view.view.transform_point3(Vec3::new(0.0, 0.0, 0.0));
        assert!((in_front.z + 2.0).abs() < 1e-6);
        assert_eq!(view.position, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_orbit_default_faces_target() {
        let cam = OrbitCamera::default();
        assert!((cam.position() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_orbit_limits() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, 10.0);
        assert_eq!(cam.pitch, 1.5);
        for _ in 0..100 {
            cam.zoom(0.5);
        }
        assert_eq!(cam.distance, 0.2);
    }
}
