//! Vector3 extensions

use nalgebra::Vector3;

/// Extension methods for Vector3
pub trait Vector3Ext {
    /// Return the normalized vector (zero if too small)
    fn normalized(self) -> Vector3<f32>;

    /// Convert a world-space position to grid-index space
    fn to_grid(self, delta_x: f32) -> Vector3<f32>;
}

impl Vector3Ext for Vector3<f32> {
    fn normalized(self) -> Vector3<f32> {
        let norm = self.norm();
        if norm <= f32::EPSILON {
            Vector3::zeros()
        } else {
            self / norm
        }
    }

    fn to_grid(self, delta_x: f32) -> Vector3<f32> {
        debug_assert!(delta_x > 0.0);
        self / delta_x
    }
}
