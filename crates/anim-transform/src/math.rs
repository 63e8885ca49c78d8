//! Math primitives consumed by the transform caches
//!
//! Thin wrappers over `glam` so the caching code names exactly the four
//! operations it depends on. Matrices are column-major, like OpenGL/WebGL.
//!
//! Yaw rotates about Y, pitch about X and roll about Z. A quaternion built
//! from yaw/pitch/roll is `Ry(yaw) * Rx(pitch) * Rz(roll)`.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Degrees in one radian (`180 / PI`)
pub const DEGREES_PER_RADIAN: f32 = 180.0 / std::f32::consts::PI;

/// Rotation order used for yaw/pitch/roll conversions
const YAW_PITCH_ROLL: EulerRot = EulerRot::YXZ;

/// Build an affine matrix `translate(position) * rotate(rotation) * scale(scale)`
pub fn compose_affine(position: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, rotation, position)
}

/// Multiply two matrices (`a * b`)
pub fn multiply_matrix(a: &Mat4, b: &Mat4) -> Mat4 {
    a.mul_mat4(b)
}

/// Create a quaternion from yaw, pitch and roll in radians
pub fn quaternion_from_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Quat {
    Quat::from_euler(YAW_PITCH_ROLL, yaw, pitch, roll)
}

/// Decompose a quaternion into `(yaw, pitch, roll)` in radians
pub fn quaternion_to_yaw_pitch_roll(rotation: Quat) -> (f32, f32, f32) {
    rotation.to_euler(YAW_PITCH_ROLL)
}
