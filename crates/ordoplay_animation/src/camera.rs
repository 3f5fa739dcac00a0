// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera keyframe values and the camera the controller drives.

use crate::keyframe::{weighted_sum, Blend};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::ops::{Add, AddAssign, Mul, MulAssign};
use std::rc::Rc;

/// Camera pose stored in keyframes.
///
/// The three vectors are animated independently. Interpolated `up` and `forward`
/// are not re-normalized here; the consumer of the frame is expected to do that.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraFrame {
    /// Camera position
    #[serde(rename = "pos")]
    pub position: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Forward (look) vector
    pub forward: Vec3,
}

impl CameraFrame {
    /// Create a new camera frame
    pub fn new(position: Vec3, up: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            up,
            forward,
        }
    }

    /// Capture the current pose of a camera
    pub fn capture(camera: &dyn CameraSink) -> Self {
        Self::new(camera.position(), camera.up(), camera.forward())
    }
}

impl AddAssign for CameraFrame {
    fn add_assign(&mut self, other: Self) {
        self.position += other.position;
        self.up += other.up;
        self.forward += other.forward;
    }
}

impl Add for CameraFrame {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl MulAssign<f32> for CameraFrame {
    fn mul_assign(&mut self, factor: f32) {
        self.position *= factor;
        self.up *= factor;
        self.forward *= factor;
    }
}

impl Mul<f32> for CameraFrame {
    type Output = Self;

    fn mul(mut self, factor: f32) -> Self {
        self *= factor;
        self
    }
}

impl Mul<CameraFrame> for f32 {
    type Output = CameraFrame;

    fn mul(self, frame: CameraFrame) -> CameraFrame {
        frame * self
    }
}

impl Blend for CameraFrame {
    fn blend<const N: usize>(terms: [(f32, &Self); N]) -> Self {
        weighted_sum(terms)
    }
}

/// Camera that receives animated poses and provides poses to capture.
pub trait CameraSink {
    /// Current position
    fn position(&self) -> Vec3;
    /// Current forward vector
    fn forward(&self) -> Vec3;
    /// Current up vector
    fn up(&self) -> Vec3;
    /// Move the camera
    fn set_position(&mut self, position: Vec3);
    /// Orient the camera
    fn set_look_direction(&mut self, forward: Vec3, up: Vec3);
}

impl<C: CameraSink> CameraSink for Rc<RefCell<C>> {
    fn position(&self) -> Vec3 {
        self.borrow().position()
    }

    fn forward(&self) -> Vec3 {
        self.borrow().forward()
    }

    fn up(&self) -> Vec3 {
        self.borrow().up()
    }

    fn set_position(&mut self, position: Vec3) {
        self.borrow_mut().set_position(position);
    }

    fn set_look_direction(&mut self, forward: Vec3, up: Vec3) {
        self.borrow_mut().set_look_direction(forward, up);
    }
}

/// Simple free-look camera.
///
/// `set_look_direction` re-orthonormalizes the basis, so blended frames coming
/// out of a track end up as a valid orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeCamera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
}

impl FreeCamera {
    /// Create a camera at `position` looking along `forward`
    pub fn new(position: Vec3, forward: Vec3, up: Vec3) -> Self {
        let mut camera = Self::default();
        camera.set_position(position);
        camera.set_look_direction(forward, up);
        camera
    }
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

impl CameraSink for FreeCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn up(&self) -> Vec3 {
        self.up
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_look_direction(&mut self, forward: Vec3, up: Vec3) {
        // Degenerate input keeps the previous orientation
        let Some(forward) = forward.try_normalize() else {
            return;
        };
        let Some(right) = forward.cross(up).try_normalize() else {
            return;
        };
        self.forward = forward;
        self.up = right.cross(forward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_frame_arithmetic() {
        let a = CameraFrame::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, Vec3::Z);
        let b = CameraFrame::new(Vec3::new(3.0, 2.0, 1.0), Vec3::Y, Vec3::X);

        let sum = a + b;
        assert_eq!(sum.position, Vec3::splat(4.0));
        assert_eq!(sum.up, Vec3::new(0.0, 2.0, 0.0));

        let scaled = 0.5 * sum;
        assert_eq!(scaled.position, Vec3::splat(2.0));
        assert_eq!(scaled.forward, Vec3::new(0.5, 0.0, 0.5));
        assert_eq!(sum * 0.5, scaled);
    }

    #[test]
    fn test_frame_json_layout() {
        let frame = CameraFrame::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, Vec3::NEG_Z);
        let json = serde_json::to_value(frame).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "pos": [1.0, 2.0, 3.0],
                "up": [0.0, 1.0, 0.0],
                "forward": [0.0, 0.0, -1.0],
            })
        );

        let loaded: CameraFrame = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, frame);
    }

    #[test]
    fn test_frame_json_rejects_bad_input() {
        // Missing field
        let missing = r#"{ "pos": [0, 0, 0], "up": [0, 1, 0] }"#;
        assert!(serde_json::from_str::<CameraFrame>(missing).is_err());

        // Unknown field
        let unknown = r#"{ "pos": [0, 0, 0], "up": [0, 1, 0], "forward": [0, 0, 1], "fov": 60 }"#;
        assert!(serde_json::from_str::<CameraFrame>(unknown).is_err());

        // Wrong vector size
        let short = r#"{ "pos": [0, 0], "up": [0, 1, 0], "forward": [0, 0, 1] }"#;
        assert!(serde_json::from_str::<CameraFrame>(short).is_err());
    }

    #[test]
    fn test_free_camera_orthonormalizes() {
        let mut camera = FreeCamera::default();
        camera.set_look_direction(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.9, 0.3));

        assert!((camera.forward() - Vec3::Z).length() < EPSILON);
        assert!((camera.up() - Vec3::Y).length() < EPSILON);
        assert!(camera.forward().dot(camera.up()).abs() < EPSILON);
    }

    #[test]
    fn test_free_camera_ignores_degenerate_direction() {
        let mut camera = FreeCamera::default();
        camera.set_look_direction(Vec3::ZERO, Vec3::Y);
        assert_eq!(camera.forward(), Vec3::NEG_Z);

        camera.set_look_direction(Vec3::Y, Vec3::Y);
        assert_eq!(camera.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn test_shared_camera_sink() {
        let camera = Rc::new(RefCell::new(FreeCamera::default()));
        let mut sink = Rc::clone(&camera);
        sink.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.borrow().position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
