//! Implicit surface functions
//!
//! Signed-distance primitives evaluated in grid-index space. The level-set
//! store rasterizes them by union (`min`) into its samples.

use nalgebra::Vector3;

/// Trait for implicit surface functions
///
/// # Example
///
/// ```rust
/// use mpmkit::Implicit;
/// use nalgebra::Vector3;
///
/// struct Slab {
///     height: f32,
/// }
///
/// impl Implicit for Slab {
///     fn signed_distance(&self, point: Vector3<f32>) -> f32 {
///         point.y - self.height
///     }
/// }
/// ```
pub trait Implicit: Send + Sync {
    /// Compute signed distance to the surface
    ///
    /// Returns:
    /// - Negative values inside the object
    /// - Zero at the surface
    /// - Positive values outside the object
    fn signed_distance(&self, point: Vector3<f32>) -> f32;
}

/// Flips the sign of another implicit, turning a solid into a container.
pub struct InsideOut<T>(pub T);

impl<T: Implicit> Implicit for InsideOut<T> {
    fn signed_distance(&self, point: Vector3<f32>) -> f32 {
        -self.0.signed_distance(point)
    }
}

/// Sphere implicit
pub struct SphereImplicit {
    center: Vector3<f32>,
    radius: f32,
}

impl SphereImplicit {
    pub fn new(center: Vector3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Implicit for SphereImplicit {
    fn signed_distance(&self, point: Vector3<f32>) -> f32 {
        (point - self.center).norm() - self.radius
    }
}

/// Half-space `p · n + d <= 0`
///
/// The normal does not need to be unit length; distances are divided by its
/// norm.
pub struct PlaneImplicit {
    normal: Vector3<f32>,
    d: f32,
    inv_norm: f32,
}

impl PlaneImplicit {
    /// Returns `None` for a zero normal, which describes no plane.
    pub fn new(normal: Vector3<f32>, d: f32) -> Option<Self> {
        let norm = normal.norm();
        if norm <= f32::EPSILON {
            return None;
        }
        Some(Self {
            normal,
            d,
            inv_norm: 1.0 / norm,
        })
    }
}

impl Implicit for PlaneImplicit {
    fn signed_distance(&self, point: Vector3<f32>) -> f32 {
        (point.dot(&self.normal) + self.d) * self.inv_norm
    }
}

/// Axis-aligned cuboid between two corners
pub struct CuboidImplicit {
    center: Vector3<f32>,
    half_size: Vector3<f32>,
}

impl CuboidImplicit {
    /// Corners may be given in any order.
    pub fn new(lower: Vector3<f32>, upper: Vector3<f32>) -> Self {
        let min = lower.inf(&upper);
        let max = lower.sup(&upper);
        Self {
            center: (min + max) * 0.5,
            half_size: (max - min) * 0.5,
        }
    }
}

impl Implicit for CuboidImplicit {
    fn signed_distance(&self, point: Vector3<f32>) -> f32 {
        let p = point - self.center;
        let d = Vector3::new(p.x.abs(), p.y.abs(), p.z.abs()) - self.half_size;
        let outside = Vector3::new(d.x.max(0.0), d.y.max(0.0), d.z.max(0.0));
        let inside = d.x.max(d.y.max(d.z)).min(0.0);
        outside.norm() + inside
    }
}
