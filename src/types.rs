//! Basic types for mpmkit

use nalgebra::Vector3;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Plain 3-component float vector
///
/// Accepts the "vector-like" shapes callers tend to have at hand (arrays,
/// tuples, nalgebra vectors), so shape calls can take `impl Into<Vector3f>`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3f {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }
}

/// Plain 3-component integer vector (grid resolutions, indices)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector3i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vector3i {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn splat(value: i32) -> Self {
        Self::new(value, value, value)
    }
}

impl From<Vector3<f32>> for Vector3f {
    fn from(v: Vector3<f32>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vector3f> for Vector3<f32> {
    fn from(v: Vector3f) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Vector3f {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<(f32, f32, f32)> for Vector3f {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vector3<i32>> for Vector3i {
    fn from(v: Vector3<i32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3i> for Vector3<i32> {
    fn from(v: Vector3i) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<[i32; 3]> for Vector3i {
    fn from(v: [i32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<(i32, i32, i32)> for Vector3i {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Vector3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Vector3i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// 3D Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BBox3 {
    min: Vector3f,
    max: Vector3f,
}

impl BBox3 {
    /// Create a new bounding box
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        debug_assert!(min.x <= max.x);
        debug_assert!(min.y <= max.y);
        debug_assert!(min.z <= max.z);
        Self {
            min: Vector3f::from(min),
            max: Vector3f::from(max),
        }
    }

    /// Get minimum corner
    pub fn min(&self) -> Vector3<f32> {
        Vector3::from(self.min)
    }

    /// Get maximum corner
    pub fn max(&self) -> Vector3<f32> {
        Vector3::from(self.max)
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> Vector3<f32> {
        self.max() - self.min()
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> Vector3<f32> {
        (self.min() + self.max()) * 0.5
    }

    /// Check if a point is inside the bounding box (boundary included)
    pub fn contains(&self, point: Vector3<f32>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Clamp a point into the box, componentwise
    pub fn clamp(&self, point: Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }
}
