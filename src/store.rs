//! Geometry store contract
//!
//! [`crate::LevelSet3D`] never touches grid samples directly. It allocates a
//! grid through a [`GeometryStore`], registers it for an id, and forwards
//! mutations through [`LevelSetGrid`]. [`crate::Registry`] is the in-process
//! store; tests and remote engines can provide their own.

use crate::{AssetId, LevelSet, Result};
use nalgebra::Vector3;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Mutation surface of a signed-distance grid, in grid-index units
pub trait LevelSetGrid {
    fn add_sphere(&mut self, center: Vector3<f32>, radius: f32, inside_out: bool);

    fn add_plane(&mut self, normal: Vector3<f32>, d: f32);

    fn add_cuboid(&mut self, lower: Vector3<f32>, upper: Vector3<f32>, inside_out: bool);

    fn global_increase(&mut self, delta: f32);

    fn set_friction(&mut self, friction: f32);
}

/// Allocates and registers signed-distance grids
pub trait GeometryStore {
    type Grid: LevelSetGrid;

    /// Allocate an empty grid of `res` samples whose first sample sits at
    /// `offset` in grid-index space
    fn allocate_grid(&mut self, res: Vector3<i32>, offset: Vector3<f32>) -> Result<Self::Grid>;

    /// Register a grid and return the id under which it can be referenced
    fn register(&mut self, grid: &Self::Grid) -> Result<AssetId>;
}

impl LevelSetGrid for LevelSet {
    fn add_sphere(&mut self, center: Vector3<f32>, radius: f32, inside_out: bool) {
        LevelSet::add_sphere(self, center, radius, inside_out);
    }

    fn add_plane(&mut self, normal: Vector3<f32>, d: f32) {
        LevelSet::add_plane(self, normal, d);
    }

    fn add_cuboid(&mut self, lower: Vector3<f32>, upper: Vector3<f32>, inside_out: bool) {
        LevelSet::add_cuboid(self, lower, upper, inside_out);
    }

    fn global_increase(&mut self, delta: f32) {
        LevelSet::global_increase(self, delta);
    }

    fn set_friction(&mut self, friction: f32) {
        LevelSet::set_friction(self, friction);
    }
}

/// Owning handle to a [`LevelSet`] allocated by the [`crate::Registry`]
///
/// The wrapper holding the handle is its only owner; the registry keeps a
/// weak reference for id lookups, so the grid is freed with the wrapper.
#[derive(Debug)]
pub struct LevelSetHandle {
    inner: Arc<Mutex<LevelSet>>,
}

impl LevelSetHandle {
    pub(crate) fn new(levelset: LevelSet) -> Self {
        Self {
            inner: Arc::new(Mutex::new(levelset)),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<Mutex<LevelSet>> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn ptr_eq(&self, weak: &Weak<Mutex<LevelSet>>) -> bool {
        std::ptr::eq(Arc::as_ptr(&self.inner), weak.as_ptr())
    }

    /// Lock the grid for reading or writing
    pub fn lock(&self) -> MutexGuard<'_, LevelSet> {
        // A poison only means a previous caller panicked mid-mutation
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` with shared access to the grid
    pub fn with<R>(&self, f: impl FnOnce(&LevelSet) -> R) -> R {
        f(&*self.lock())
    }

    /// Copy the current grid out of the handle
    pub fn snapshot(&self) -> LevelSet {
        self.lock().clone()
    }
}

impl LevelSetGrid for LevelSetHandle {
    fn add_sphere(&mut self, center: Vector3<f32>, radius: f32, inside_out: bool) {
        self.lock().add_sphere(center, radius, inside_out);
    }

    fn add_plane(&mut self, normal: Vector3<f32>, d: f32) {
        self.lock().add_plane(normal, d);
    }

    fn add_cuboid(&mut self, lower: Vector3<f32>, upper: Vector3<f32>, inside_out: bool) {
        self.lock().add_cuboid(lower, upper, inside_out);
    }

    fn global_increase(&mut self, delta: f32) {
        self.lock().global_increase(delta);
    }

    fn set_friction(&mut self, friction: f32) {
        self.lock().set_friction(friction);
    }
}

/// Read-only view of a registered grid, obtained from [`crate::Registry::levelset`]
#[derive(Debug, Clone)]
pub struct LevelSetRef {
    inner: Arc<Mutex<LevelSet>>,
}

impl LevelSetRef {
    pub(crate) fn upgrade(weak: &Weak<Mutex<LevelSet>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Run `f` with shared access to the grid
    pub fn with<R>(&self, f: impl FnOnce(&LevelSet) -> R) -> R {
        f(&*self.inner.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Copy the current grid
    pub fn snapshot(&self) -> LevelSet {
        self.with(LevelSet::clone)
    }
}
