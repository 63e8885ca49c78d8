//! Dual rotation representation for a node's local rotation
//!
//! A rotation is held either as a quaternion or as an Euler triple in
//! degrees. The most recently set form is authoritative; the other form is
//! derived on first read and cached until the next write.
//!
//! The Euler triple is laid out as `(pitch, yaw, roll)` when converting to a
//! quaternion but filled as `(yaw, pitch, roll)` when converting back. The
//! swap is part of the stored data format and must not be normalised away.

use glam::{Quat, Vec3};

use crate::math::{
    DEGREES_PER_RADIAN, quaternion_from_yaw_pitch_roll, quaternion_to_yaw_pitch_roll,
};

/// Which representation was set last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    Quaternion,
    Euler,
}

/// Lazily converted rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationCache {
    /// Quaternion is authoritative; `euler` is `None` while stale
    Quaternion { value: Quat, euler: Option<Vec3> },
    /// Euler degrees are authoritative; `quaternion` is `None` while stale
    Euler { value: Vec3, quaternion: Option<Quat> },
}

impl RotationCache {
    /// Start from an authoritative quaternion
    pub fn from_quaternion(value: Quat) -> Self {
        Self::Quaternion { value, euler: None }
    }

    /// Start from an authoritative Euler triple (degrees)
    pub fn from_euler(value: Vec3) -> Self {
        Self::Euler {
            value,
            quaternion: None,
        }
    }

    pub fn authority(&self) -> Authority {
        match self {
            Self::Quaternion { .. } => Authority::Quaternion,
            Self::Euler { .. } => Authority::Euler,
        }
    }

    /// True when the quaternion view must be recomputed before use
    pub fn is_quaternion_stale(&self) -> bool {
        matches!(self, Self::Euler { quaternion: None, .. })
    }

    /// True when the Euler view must be recomputed before use
    pub fn is_euler_stale(&self) -> bool {
        matches!(self, Self::Quaternion { euler: None, .. })
    }

    pub fn set_quaternion(&mut self, value: Quat) {
        *self = Self::from_quaternion(value);
    }

    pub fn set_euler(&mut self, value: Vec3) {
        *self = Self::from_euler(value);
    }

    /// Quaternion view, converting from Euler degrees if stale
    pub fn quaternion(&mut self) -> Quat {
        match self {
            Self::Quaternion { value, .. } => *value,
            Self::Euler {
                quaternion: Some(cached),
                ..
            } => *cached,
            Self::Euler { value, quaternion } => {
                let q = quaternion_from_yaw_pitch_roll(
                    value.y / DEGREES_PER_RADIAN,
                    value.x / DEGREES_PER_RADIAN,
                    value.z / DEGREES_PER_RADIAN,
                );
                *quaternion = Some(q);
                q
            }
        }
    }

    /// Euler view in degrees, converting from the quaternion if stale
    pub fn euler(&mut self) -> Vec3 {
        match self {
            Self::Euler { value, .. } => *value,
            Self::Quaternion {
                euler: Some(cached),
                ..
            } => *cached,
            Self::Quaternion { value, euler } => {
                let (yaw, pitch, roll) = quaternion_to_yaw_pitch_roll(*value);
                let e = Vec3::new(
                    yaw * DEGREES_PER_RADIAN,
                    pitch * DEGREES_PER_RADIAN,
                    roll * DEGREES_PER_RADIAN,
                );
                *euler = Some(e);
                e
            }
        }
    }
}

impl Default for RotationCache {
    fn default() -> Self {
        Self::from_quaternion(Quat::IDENTITY)
    }
}
