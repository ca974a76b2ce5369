//! World-space level set wrapper
//!
//! `LevelSet3D` lets callers describe boundary geometry in world units, where
//! the simulation domain spans `[0, 1]` along its shortest axis. It owns a
//! grid allocated by a [`GeometryStore`] and rescales every shape call into
//! grid-index units (one unit per voxel) before forwarding it.

use crate::asset::{AssetId, AssetKind, HasAssetId};
use crate::store::{GeometryStore, LevelSetGrid, LevelSetHandle};
use crate::vector_ext::Vector3Ext;
use crate::{Config, Error, LevelSet, Result, Vector3f, Vector3i};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default grid alignment: the grid is centered on the unit domain
pub const DEFAULT_OFFSET: f32 = 0.5;

/// Construction options for [`LevelSet3D`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelSetOptions {
    /// Cells per axis; the allocated grid has one more sample per axis
    pub res: Vector3i,
    /// Grid origin alignment in `[0, 1]`
    pub offset: Vector3f,
}

impl LevelSetOptions {
    pub fn new(res: impl Into<Vector3i>) -> Self {
        Self {
            res: res.into(),
            offset: Vector3f::splat(DEFAULT_OFFSET),
        }
    }

    pub fn with_offset(mut self, offset: impl Into<Vector3f>) -> Self {
        self.offset = offset.into();
        self
    }
}

/// Level set addressed in world units
///
/// # Example
///
/// ```rust
/// use mpmkit::{LevelSet3D, Registry};
/// use nalgebra::Vector3;
///
/// let mut registry = Registry::new();
/// let mut levelset = LevelSet3D::new(&mut registry, Vector3::new(64, 64, 64))?;
/// assert_eq!(levelset.get_delta_x(), 1.0 / 64.0);
///
/// levelset.add_sphere([0.5, 0.5, 0.5], 0.4);
/// levelset.add_plane(0.0, 1.0, 0.0, -0.1);
/// levelset.set_friction(0.5);
/// # Ok::<(), mpmkit::Error>(())
/// ```
#[derive(Debug)]
pub struct LevelSet3D<G: LevelSetGrid = LevelSetHandle> {
    delta_x: f32,
    res: Vector3<i32>,
    offset: Vector3<f32>,
    levelset: G,
    id: AssetId,
}

impl<G: LevelSetGrid> LevelSet3D<G> {
    /// Allocate and register a grid for `res` cells, centered on the domain
    pub fn new<S>(store: &mut S, res: impl Into<Vector3i>) -> Result<Self>
    where
        S: GeometryStore<Grid = G>,
    {
        Self::from_options(store, &LevelSetOptions::new(res))
    }

    /// Allocate and register a grid with an explicit origin alignment
    pub fn with_offset<S>(
        store: &mut S,
        res: impl Into<Vector3i>,
        offset: impl Into<Vector3f>,
    ) -> Result<Self>
    where
        S: GeometryStore<Grid = G>,
    {
        Self::from_options(store, &LevelSetOptions::new(res).with_offset(offset))
    }

    pub fn from_options<S>(store: &mut S, options: &LevelSetOptions) -> Result<Self>
    where
        S: GeometryStore<Grid = G>,
    {
        let res = Vector3::<i32>::from(options.res);
        if res.x <= 0 || res.y <= 0 || res.z <= 0 {
            return Err(Error::invalid_resolution(res));
        }

        let padded = res
            .x
            .checked_add(1)
            .zip(res.y.checked_add(1))
            .zip(res.z.checked_add(1))
            .map(|((x, y), z)| Vector3::new(x, y, z))
            .ok_or_else(|| Error::invalid_resolution(res))?;
        let offset = Vector3::<f32>::from(options.offset);
        if !offset.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "Level set offset {} must be finite",
                options.offset
            )));
        }

        let delta_x = 1.0 / res.x.min(res.y).min(res.z) as f32;

        let levelset = store.allocate_grid(padded, offset)?;
        let id = store.register(&levelset)?;

        Ok(Self {
            delta_x,
            res: padded,
            offset,
            levelset,
            id,
        })
    }

    /// Build from a config holding `res` (required) and `offset` (optional)
    pub fn from_config<S>(store: &mut S, config: &Config) -> Result<Self>
    where
        S: GeometryStore<Grid = G>,
    {
        if !config.has_key("res") {
            return Err(Error::InvalidParameter(
                "Level set config is missing 'res'".to_string(),
            ));
        }
        let res = config.get_vec3i("res", Vector3i::default())?;
        let offset = config.get_vec3("offset", Vector3f::splat(DEFAULT_OFFSET))?;
        Self::from_options(store, &LevelSetOptions { res, offset })
    }

    /// Add a sphere given in world units
    ///
    /// `center` accepts arrays, tuples, [`Vector3f`] or nalgebra vectors.
    pub fn add_sphere(&mut self, center: impl Into<Vector3f>, radius: f32) {
        self.add_sphere_with_inside_out(center, radius, false);
    }

    /// Add a sphere; with `inside_out` the sphere encloses free space
    pub fn add_sphere_with_inside_out(
        &mut self,
        center: impl Into<Vector3f>,
        radius: f32,
        inside_out: bool,
    ) {
        let center = vector(center).to_grid(self.delta_x);
        self.levelset
            .add_sphere(center, radius / self.delta_x, inside_out);
    }

    /// Add the half-space `a*x + b*y + c*z + d <= 0`
    ///
    /// The normal `(a, b, c)` is dimensionless and forwarded as is; only the
    /// world-space offset `d` is rescaled.
    pub fn add_plane(&mut self, a: f32, b: f32, c: f32, d: f32) {
        self.levelset
            .add_plane(Vector3::new(a, b, c), d / self.delta_x);
    }

    /// Add an axis-aligned cuboid between two world-space corners
    pub fn add_cuboid(&mut self, lower: impl Into<Vector3f>, upper: impl Into<Vector3f>) {
        self.add_cuboid_with_inside_out(lower, upper, false);
    }

    /// Add a cuboid; with `inside_out` the cuboid is a container
    pub fn add_cuboid_with_inside_out(
        &mut self,
        lower: impl Into<Vector3f>,
        upper: impl Into<Vector3f>,
        inside_out: bool,
    ) {
        let lower = vector(lower).to_grid(self.delta_x);
        let upper = vector(upper).to_grid(self.delta_x);
        self.levelset.add_cuboid(lower, upper, inside_out);
    }

    /// Add a world-space distance to every sample
    pub fn global_increase(&mut self, delta: f32) {
        self.levelset.global_increase(delta / self.delta_x);
    }

    /// Friction is dimensionless and forwarded unchanged
    pub fn set_friction(&mut self, friction: f32) {
        self.levelset.set_friction(friction);
    }

    /// World-space edge length of one voxel
    pub fn get_delta_x(&self) -> f32 {
        self.delta_x
    }

    /// Id assigned by the store at construction
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Allocated sample counts, one more than the requested cells per axis
    pub fn resolution(&self) -> Vector3<i32> {
        self.res
    }

    pub fn offset(&self) -> Vector3<f32> {
        self.offset
    }

    /// The underlying grid
    pub fn grid(&self) -> &G {
        &self.levelset
    }
}

impl LevelSet3D<LevelSetHandle> {
    /// Signed distance at a world-space position, in world units
    pub fn sample(&self, position: impl Into<Vector3f>) -> f32 {
        let pos = vector(position).to_grid(self.delta_x);
        self.levelset.with(|ls| ls.sample(pos)) * self.delta_x
    }

    /// Unit outward normal at a world-space position
    pub fn normalized_gradient(&self, position: impl Into<Vector3f>) -> Vector3<f32> {
        let pos = vector(position).to_grid(self.delta_x);
        self.levelset.with(|ls| ls.normalized_gradient(pos))
    }

    /// Whether a world-space position lies within the sampled region
    pub fn inside(&self, position: impl Into<Vector3f>) -> bool {
        let pos = vector(position).to_grid(self.delta_x);
        self.levelset.with(|ls| ls.inside(pos))
    }

    /// Copy of the grid in grid-index units
    pub fn snapshot(&self) -> LevelSet {
        self.levelset.snapshot()
    }
}

fn vector(v: impl Into<Vector3f>) -> Vector3<f32> {
    let v: Vector3f = v.into();
    Vector3::<f32>::from(v)
}

impl<G: LevelSetGrid> HasAssetId for LevelSet3D<G> {
    fn asset_kind(&self) -> AssetKind {
        AssetKind::LevelSet
    }

    fn asset_id(&self) -> Option<AssetId> {
        Some(self.id)
    }
}
