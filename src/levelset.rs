//! Dense signed-distance grid
//!
//! `LevelSet` is the geometry store behind [`crate::LevelSet3D`]. It works
//! purely in grid-index units: the sample at index `(i, j, k)` sits at
//! position `(i, j, k) + offset`.

mod io;

use crate::implicit::{CuboidImplicit, InsideOut, PlaneImplicit, SphereImplicit};
use crate::vector_ext::Vector3Ext;
use crate::{BBox3, Error, Implicit, Result};
use nalgebra::Vector3;

/// Dense 3D signed-distance grid
///
/// A new grid holds [`LevelSet::INF`] everywhere. Shape primitives are merged
/// by union: each sample keeps the minimum of its current value and the
/// primitive's signed distance.
///
/// # Example
///
/// ```rust
/// use mpmkit::LevelSet;
/// use nalgebra::Vector3;
///
/// let mut ls = LevelSet::new(Vector3::new(16, 16, 16), Vector3::repeat(0.5))?;
/// ls.add_sphere(Vector3::new(8.0, 8.0, 8.0), 4.0, false);
/// assert!(ls.sample(Vector3::new(8.0, 8.0, 8.0)) < 0.0);
/// # Ok::<(), mpmkit::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSet {
    res: Vector3<usize>,
    offset: Vector3<f32>,
    values: Vec<f32>,
    friction: f32,
}

impl LevelSet {
    /// Value of samples with no surface nearby
    pub const INF: f32 = 1e7;

    /// Friction of a freshly allocated grid
    pub const DEFAULT_FRICTION: f32 = 1.0;

    /// Allocate a grid of `res` samples filled with [`LevelSet::INF`]
    pub fn new(res: Vector3<i32>, offset: Vector3<f32>) -> Result<Self> {
        Self::filled(res, offset, Self::INF)
    }

    /// Allocate a grid of `res` samples filled with `value`
    pub fn filled(res: Vector3<i32>, offset: Vector3<f32>, value: f32) -> Result<Self> {
        let res = checked_res(res)?;
        let count = sample_count(res)?;
        checked_offset(offset)?;
        Ok(Self {
            res,
            offset,
            values: vec![value; count],
            friction: Self::DEFAULT_FRICTION,
        })
    }

    pub(crate) fn from_parts(
        res: Vector3<usize>,
        offset: Vector3<f32>,
        values: Vec<f32>,
        friction: f32,
    ) -> Result<Self> {
        let count = sample_count(res)?;
        checked_offset(offset)?;
        if values.len() != count {
            return Err(Error::InvalidParameter(format!(
                "Expected {} samples, got {}",
                count,
                values.len()
            )));
        }
        Ok(Self {
            res,
            offset,
            values,
            friction,
        })
    }

    /// Number of samples along each axis
    pub fn resolution(&self) -> Vector3<usize> {
        self.res
    }

    /// Position of sample `(0, 0, 0)` in grid-index space
    pub fn offset(&self) -> Vector3<f32> {
        self.offset
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction;
    }

    /// Raw samples, x fastest, then y, then z
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Region covered by the samples, in grid-index space
    pub fn bounds(&self) -> BBox3 {
        let extent = Vector3::new(
            (self.res.x - 1) as f32,
            (self.res.y - 1) as f32,
            (self.res.z - 1) as f32,
        );
        BBox3::new(self.offset, self.offset + extent)
    }

    fn linear_index(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        if i < self.res.x && j < self.res.y && k < self.res.z {
            Some(i + self.res.x * (j + self.res.y * k))
        } else {
            None
        }
    }

    /// Sample value at an index, `None` outside the grid
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f32> {
        self.linear_index(i, j, k).map(|idx| self.values[idx])
    }

    /// Overwrite a single sample
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: f32) -> Result<()> {
        let idx = self.linear_index(i, j, k).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "Index ({}, {}, {}) outside level set of {}x{}x{}",
                i, j, k, self.res.x, self.res.y, self.res.z
            ))
        })?;
        self.values[idx] = value;
        Ok(())
    }

    /// Grid-index position of a sample
    pub fn node_position(&self, i: usize, j: usize, k: usize) -> Vector3<f32> {
        Vector3::new(i as f32, j as f32, k as f32) + self.offset
    }

    /// Merge an implicit into the grid by union
    pub fn union_implicit(&mut self, implicit: &dyn Implicit) {
        let (nx, ny) = (self.res.x, self.res.y);
        let offset = self.offset;
        for (idx, value) in self.values.iter_mut().enumerate() {
            let i = idx % nx;
            let j = (idx / nx) % ny;
            let k = idx / (nx * ny);
            let pos = Vector3::new(i as f32, j as f32, k as f32) + offset;
            *value = value.min(implicit.signed_distance(pos));
        }
    }

    /// Add a sphere
    ///
    /// With `inside_out` the sign is flipped: the sphere encloses free space
    /// and everything outside it becomes solid.
    pub fn add_sphere(&mut self, center: Vector3<f32>, radius: f32, inside_out: bool) {
        let sphere = SphereImplicit::new(center, radius);
        if inside_out {
            self.union_implicit(&InsideOut(sphere));
        } else {
            self.union_implicit(&sphere);
        }
    }

    /// Add the half-space `p · normal + d <= 0`
    ///
    /// A zero normal describes no plane and leaves the grid unchanged.
    pub fn add_plane(&mut self, normal: Vector3<f32>, d: f32) {
        if let Some(plane) = PlaneImplicit::new(normal, d) {
            self.union_implicit(&plane);
        }
    }

    /// Add an axis-aligned cuboid
    pub fn add_cuboid(&mut self, lower: Vector3<f32>, upper: Vector3<f32>, inside_out: bool) {
        let cuboid = CuboidImplicit::new(lower, upper);
        if inside_out {
            self.union_implicit(&InsideOut(cuboid));
        } else {
            self.union_implicit(&cuboid);
        }
    }

    /// Add `delta` to every sample
    pub fn global_increase(&mut self, delta: f32) {
        for value in &mut self.values {
            *value += delta;
        }
    }

    /// Whether `pos` lies within the sample lattice
    pub fn inside(&self, pos: Vector3<f32>) -> bool {
        self.bounds().contains(pos)
    }

    /// Trilinear interpolation; positions outside the lattice are clamped
    pub fn sample(&self, pos: Vector3<f32>) -> f32 {
        let local = self.bounds().clamp(pos) - self.offset;
        let (i0, i1, fx) = split_axis(local.x, self.res.x);
        let (j0, j1, fy) = split_axis(local.y, self.res.y);
        let (k0, k1, fz) = split_axis(local.z, self.res.z);

        let at = |i: usize, j: usize, k: usize| self.values[i + self.res.x * (j + self.res.y * k)];
        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;

        let c00 = lerp(at(i0, j0, k0), at(i1, j0, k0), fx);
        let c10 = lerp(at(i0, j1, k0), at(i1, j1, k0), fx);
        let c01 = lerp(at(i0, j0, k1), at(i1, j0, k1), fx);
        let c11 = lerp(at(i0, j1, k1), at(i1, j1, k1), fx);
        lerp(lerp(c00, c10, fy), lerp(c01, c11, fy), fz)
    }

    /// Central-difference gradient of [`LevelSet::sample`]. Not normalized.
    pub fn gradient(&self, pos: Vector3<f32>) -> Vector3<f32> {
        const H: f32 = 0.5;
        let mut grad = Vector3::zeros();
        for axis in 0..3 {
            let mut step = Vector3::zeros();
            step[axis] = H;
            grad[axis] = (self.sample(pos + step) - self.sample(pos - step)) / (2.0 * H);
        }
        grad
    }

    /// Unit gradient, zero where the gradient vanishes
    pub fn normalized_gradient(&self, pos: Vector3<f32>) -> Vector3<f32> {
        self.gradient(pos).normalized()
    }

    /// Resample the whole lattice at `output_res` cell centers
    ///
    /// The result is laid out x fastest, like [`LevelSet::values`].
    pub fn rasterize(&self, output_res: Vector3<i32>) -> Result<Vec<f32>> {
        let out = checked_res(output_res)?;
        let bounds = self.bounds();
        let size = bounds.size();
        let mut result = Vec::with_capacity(out.x * out.y * out.z);
        for k in 0..out.z {
            for j in 0..out.y {
                for i in 0..out.x {
                    let t = Vector3::new(
                        (i as f32 + 0.5) / out.x as f32,
                        (j as f32 + 0.5) / out.y as f32,
                        (k as f32 + 0.5) / out.z as f32,
                    );
                    result.push(self.sample(bounds.min() + size.component_mul(&t)));
                }
            }
        }
        Ok(result)
    }

    /// Fraction of the segment between two samples that lies inside
    pub fn fraction_inside(phi_a: f32, phi_b: f32) -> f32 {
        if phi_a < 0.0 && phi_b < 0.0 {
            1.0
        } else if phi_a < 0.0 && phi_b >= 0.0 {
            phi_a / (phi_a - phi_b)
        } else if phi_a >= 0.0 && phi_b < 0.0 {
            phi_b / (phi_b - phi_a)
        } else {
            0.0
        }
    }

    pub fn fraction_outside(phi_a: f32, phi_b: f32) -> f32 {
        1.0 - Self::fraction_inside(phi_a, phi_b)
    }
}

fn checked_res(res: Vector3<i32>) -> Result<Vector3<usize>> {
    if res.x <= 0 || res.y <= 0 || res.z <= 0 {
        return Err(Error::invalid_resolution(res));
    }
    Ok(Vector3::new(res.x as usize, res.y as usize, res.z as usize))
}

fn sample_count(res: Vector3<usize>) -> Result<usize> {
    res.x
        .checked_mul(res.y)
        .and_then(|xy| xy.checked_mul(res.z))
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "Level set of {}x{}x{} samples is too large",
                res.x, res.y, res.z
            ))
        })
}

/// NaN offsets would poison every clamp in `sample`
fn checked_offset(offset: Vector3<f32>) -> Result<()> {
    if offset.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "Level set offset ({}, {}, {}) must be finite",
            offset.x, offset.y, offset.z
        )))
    }
}

/// Lower index, upper index and interpolation weight along one axis.
/// `local` is already clamped to `[0, n - 1]`.
fn split_axis(local: f32, n: usize) -> (usize, usize, f32) {
    if n < 2 {
        return (0, 0, 0.0);
    }
    let lower = (local.floor() as usize).min(n - 2);
    (lower, lower + 1, local - lower as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: i32) -> LevelSet {
        LevelSet::new(Vector3::new(n, n, n), Vector3::zeros()).unwrap()
    }

    #[test]
    fn test_new_fills_with_inf() {
        let ls = grid(4);
        assert_eq!(ls.values().len(), 64);
        assert!(ls.values().iter().all(|&v| v == LevelSet::INF));
        assert_eq!(ls.friction(), LevelSet::DEFAULT_FRICTION);
    }

    #[test]
    fn test_rejects_non_positive_resolution() {
        let err = LevelSet::new(Vector3::new(4, -1, 4), Vector3::zeros()).unwrap_err();
        assert!(matches!(err, Error::InvalidResolution { x: 4, y: -1, z: 4 }));
    }

    #[test]
    fn test_rejects_non_finite_offset() {
        let offset = Vector3::new(0.5, f32::NAN, 0.5);
        assert!(matches!(
            LevelSet::new(Vector3::new(4, 4, 4), offset),
            Err(Error::InvalidParameter(_))
        ));
        let offset = Vector3::new(f32::INFINITY, 0.0, 0.0);
        assert!(LevelSet::from_parts(Vector3::new(1, 1, 1), offset, vec![0.0], 1.0).is_err());
    }

    #[test]
    fn test_from_parts_rejects_overflowing_resolution() {
        let res = Vector3::new(usize::MAX, 2, 2);
        let result = LevelSet::from_parts(res, Vector3::zeros(), Vec::new(), 1.0);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_get_set_bounds_checked() {
        let mut ls = grid(3);
        ls.set(2, 1, 0, -2.5).unwrap();
        assert_eq!(ls.get(2, 1, 0), Some(-2.5));
        assert_eq!(ls.get(3, 0, 0), None);
        assert!(ls.set(0, 0, 3, 1.0).is_err());
    }

    #[test]
    fn test_sphere_union_keeps_minimum() {
        let mut ls = grid(9);
        ls.add_sphere(Vector3::new(4.0, 4.0, 4.0), 2.0, false);
        assert!((ls.get(4, 4, 4).unwrap() + 2.0).abs() < 1e-6);
        assert!((ls.get(8, 4, 4).unwrap() - 2.0).abs() < 1e-6);

        // A larger sphere elsewhere does not raise values near the first one
        ls.add_sphere(Vector3::new(0.0, 0.0, 0.0), 1.0, false);
        assert!((ls.get(4, 4, 4).unwrap() + 2.0).abs() < 1e-6);
        assert!((ls.get(0, 0, 0).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_inside_out_sphere_is_container() {
        let mut ls = grid(9);
        ls.add_sphere(Vector3::new(4.0, 4.0, 4.0), 3.0, true);
        assert!(ls.get(4, 4, 4).unwrap() > 0.0);
        assert!(ls.get(0, 0, 0).unwrap() < 0.0);
    }

    #[test]
    fn test_offset_shifts_node_positions() {
        let mut ls = LevelSet::new(Vector3::new(4, 4, 4), Vector3::repeat(0.5)).unwrap();
        assert_eq!(ls.node_position(1, 2, 3), Vector3::new(1.5, 2.5, 3.5));
        ls.add_sphere(Vector3::new(1.5, 1.5, 1.5), 1.0, false);
        assert!((ls.get(1, 1, 1).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_plane_and_zero_normal() {
        let mut ls = grid(5);
        ls.add_plane(Vector3::zeros(), 1.0);
        assert!(ls.values().iter().all(|&v| v == LevelSet::INF));

        ls.add_plane(Vector3::new(0.0, 1.0, 0.0), -2.0);
        assert!((ls.get(0, 0, 0).unwrap() + 2.0).abs() < 1e-6);
        assert!((ls.get(3, 4, 1).unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_cuboid() {
        let mut ls = grid(6);
        ls.add_cuboid(Vector3::new(1.0, 1.0, 1.0), Vector3::new(3.0, 3.0, 3.0), false);
        assert!((ls.get(2, 2, 2).unwrap() + 1.0).abs() < 1e-6);
        assert!((ls.get(5, 2, 2).unwrap() - 2.0).abs() < 1e-6);

        let mut container = grid(6);
        container.add_cuboid(Vector3::new(1.0, 1.0, 1.0), Vector3::new(3.0, 3.0, 3.0), true);
        assert!(container.get(2, 2, 2).unwrap() > 0.0);
        assert!(container.get(5, 2, 2).unwrap() < 0.0);
    }

    #[test]
    fn test_global_increase() {
        let mut ls = LevelSet::filled(Vector3::new(2, 2, 2), Vector3::zeros(), 1.0).unwrap();
        ls.global_increase(-0.25);
        assert!(ls.values().iter().all(|&v| (v - 0.75).abs() < 1e-6));
    }

    #[test]
    fn test_trilinear_sample_of_linear_field() {
        let mut ls = grid(4);
        for k in 0..4 {
            for j in 0..4 {
                for i in 0..4 {
                    ls.set(i, j, k, i as f32 + 2.0 * j as f32 - k as f32).unwrap();
                }
            }
        }
        let v = ls.sample(Vector3::new(1.25, 0.5, 2.75));
        assert!((v - (1.25 + 1.0 - 2.75)).abs() < 1e-5);

        // Clamped outside the lattice
        assert!((ls.sample(Vector3::new(-3.0, 0.0, 0.0)) - 0.0).abs() < 1e-6);

        let g = ls.gradient(Vector3::new(1.5, 1.5, 1.5));
        assert!((g - Vector3::new(1.0, 2.0, -1.0)).norm() < 1e-4);
    }

    #[test]
    fn test_normalized_gradient_points_away_from_sphere() {
        let mut ls = grid(17);
        ls.add_sphere(Vector3::new(8.0, 8.0, 8.0), 4.0, false);
        let n = ls.normalized_gradient(Vector3::new(13.0, 8.0, 8.0));
        assert!((n - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-3);
    }

    #[test]
    fn test_inside_and_single_sample_axis() {
        let ls = LevelSet::filled(Vector3::new(1, 3, 3), Vector3::zeros(), 2.0).unwrap();
        assert!(ls.inside(Vector3::new(0.0, 1.0, 2.0)));
        assert!(!ls.inside(Vector3::new(0.5, 1.0, 1.0)));
        assert_eq!(ls.sample(Vector3::new(0.0, 1.5, 0.5)), 2.0);
    }

    #[test]
    fn test_rasterize() {
        let ls = LevelSet::filled(Vector3::new(3, 3, 3), Vector3::zeros(), -1.0).unwrap();
        let out = ls.rasterize(Vector3::new(2, 5, 1)).unwrap();
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|&v| v == -1.0));
        assert!(ls.rasterize(Vector3::new(0, 1, 1)).is_err());
    }

    #[test]
    fn test_fraction_inside() {
        assert_eq!(LevelSet::fraction_inside(-1.0, -2.0), 1.0);
        assert_eq!(LevelSet::fraction_inside(1.0, 2.0), 0.0);
        assert!((LevelSet::fraction_inside(-1.0, 3.0) - 0.25).abs() < 1e-6);
        assert!((LevelSet::fraction_inside(3.0, -1.0) - 0.25).abs() < 1e-6);
        assert!((LevelSet::fraction_outside(-1.0, 3.0) - 0.75).abs() < 1e-6);
    }
}
