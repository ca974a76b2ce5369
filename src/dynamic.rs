//! Time-interpolated level set for moving boundaries

use crate::{Error, LevelSet, Result};
use nalgebra::Vector3;

/// Linear blend between two level sets over `[t0, t1]`
///
/// Both grids must share resolution and offset. Queries outside the time
/// window are clamped to its ends.
///
/// # Example
///
/// ```rust
/// use mpmkit::{DynamicLevelSet3D, LevelSet};
/// use nalgebra::Vector3;
///
/// let res = Vector3::new(8, 8, 8);
/// let mut start = LevelSet::new(res, Vector3::zeros())?;
/// start.add_plane(Vector3::new(0.0, 1.0, 0.0), -2.0);
/// let mut end = LevelSet::new(res, Vector3::zeros())?;
/// end.add_plane(Vector3::new(0.0, 1.0, 0.0), -4.0);
///
/// let moving = DynamicLevelSet3D::new(0.0, 1.0, start, end)?;
/// let mid = moving.sample(Vector3::new(3.0, 3.0, 3.0), 0.5);
/// assert!(mid.abs() < 1e-5);
/// # Ok::<(), mpmkit::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DynamicLevelSet3D {
    t0: f32,
    t1: f32,
    levelset0: LevelSet,
    levelset1: LevelSet,
}

impl DynamicLevelSet3D {
    pub fn new(t0: f32, t1: f32, levelset0: LevelSet, levelset1: LevelSet) -> Result<Self> {
        if !(t1 > t0) {
            return Err(Error::InvalidParameter(format!(
                "Time window [{}, {}] is empty",
                t0, t1
            )));
        }
        if levelset0.resolution() != levelset1.resolution()
            || levelset0.offset() != levelset1.offset()
        {
            return Err(Error::InvalidParameter(
                "Level sets must share resolution and offset".to_string(),
            ));
        }
        Ok(Self {
            t0,
            t1,
            levelset0,
            levelset1,
        })
    }

    pub fn time_window(&self) -> (f32, f32) {
        (self.t0, self.t1)
    }

    /// Blend weight of the second level set at time `t`
    fn weight(&self, t: f32) -> f32 {
        ((t - self.t0) / (self.t1 - self.t0)).clamp(0.0, 1.0)
    }

    pub fn sample(&self, pos: Vector3<f32>, t: f32) -> f32 {
        let w = self.weight(t);
        self.levelset0.sample(pos) * (1.0 - w) + self.levelset1.sample(pos) * w
    }

    /// Rate of change of the signed distance; constant within the window
    pub fn temporal_derivative(&self, pos: Vector3<f32>, _t: f32) -> f32 {
        (self.levelset1.sample(pos) - self.levelset0.sample(pos)) / (self.t1 - self.t0)
    }

    pub fn spatial_gradient(&self, pos: Vector3<f32>, t: f32) -> Vector3<f32> {
        let w = self.weight(t);
        self.levelset0.gradient(pos) * (1.0 - w) + self.levelset1.gradient(pos) * w
    }

    pub fn inside(&self, pos: Vector3<f32>) -> bool {
        self.levelset0.inside(pos)
    }

    /// Resample the blended field at time `t`
    pub fn rasterize(&self, output_res: Vector3<i32>, t: f32) -> Result<Vec<f32>> {
        let w = self.weight(t);
        let a = self.levelset0.rasterize(output_res)?;
        let b = self.levelset1.rasterize(output_res)?;
        Ok(a
            .iter()
            .zip(&b)
            .map(|(a, b)| a * (1.0 - w) + b * w)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane_at(height: f32) -> LevelSet {
        let mut ls = LevelSet::new(Vector3::new(6, 6, 6), Vector3::zeros()).unwrap();
        ls.add_plane(Vector3::new(0.0, 1.0, 0.0), -height);
        ls
    }

    #[test]
    fn test_interpolation_and_clamping() {
        let moving = DynamicLevelSet3D::new(1.0, 3.0, plane_at(1.0), plane_at(3.0)).unwrap();
        let p = Vector3::new(2.0, 2.0, 2.0);
        assert!((moving.sample(p, 1.0) - 1.0).abs() < 1e-5);
        assert!((moving.sample(p, 2.0) - 0.0).abs() < 1e-5);
        assert!((moving.sample(p, 10.0) + 1.0).abs() < 1e-5);
        assert!((moving.sample(p, -5.0) - 1.0).abs() < 1e-5);
        assert!((moving.temporal_derivative(p, 2.0) + 1.0).abs() < 1e-5);
        let g = moving.spatial_gradient(p, 2.0);
        assert!((g - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(DynamicLevelSet3D::new(1.0, 1.0, plane_at(1.0), plane_at(2.0)).is_err());
        let other = LevelSet::new(Vector3::new(4, 4, 4), Vector3::zeros()).unwrap();
        assert!(DynamicLevelSet3D::new(0.0, 1.0, plane_at(1.0), other).is_err());
    }

    #[test]
    fn test_rasterize_blends() {
        let moving = DynamicLevelSet3D::new(0.0, 1.0, plane_at(1.0), plane_at(3.0)).unwrap();
        let start = moving.rasterize(Vector3::new(2, 2, 2), 0.0).unwrap();
        let mid = moving.rasterize(Vector3::new(2, 2, 2), 0.5).unwrap();
        for (s, m) in start.iter().zip(&mid) {
            assert!((s - m - 1.0).abs() < 1e-5);
        }
    }
}
