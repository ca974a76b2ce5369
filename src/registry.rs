//! Asset registry
//!
//! The registry maps integer ids to level sets, textures and materials. It is
//! an ordinary value passed by `&mut` to whoever creates assets, so several
//! independent simulation sessions can live in one process.

use crate::asset::AssetId;
use crate::store::{GeometryStore, LevelSetHandle, LevelSetRef};
use crate::{Error, LevelSet, LogFile, Result, SurfaceMaterial, Texture, VolumeMaterial};
use nalgebra::Vector3;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, Weak};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Per-session table of simulation assets
///
/// # Example
///
/// ```rust
/// use mpmkit::{LevelSet3D, Registry};
/// use nalgebra::Vector3;
///
/// let mut registry = Registry::new();
/// let mut levelset = LevelSet3D::new(&mut registry, Vector3::new(32, 32, 32))?;
/// levelset.add_plane(0.0, 1.0, 0.0, -0.1);
/// assert!(registry.levelset(levelset.id()).is_some());
/// # Ok::<(), mpmkit::Error>(())
/// ```
pub struct Registry {
    instance: u64,
    levelsets: Vec<Weak<Mutex<LevelSet>>>,
    textures: Vec<Texture>,
    surface_materials: Vec<SurfaceMaterial>,
    volume_materials: Vec<VolumeMaterial>,
    log: Option<LogFile>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            levelsets: Vec::new(),
            textures: Vec::new(),
            surface_materials: Vec::new(),
            volume_materials: Vec::new(),
            log: None,
        }
    }

    /// Record every registration in `log`
    pub fn with_log(mut self, log: LogFile) -> Self {
        self.log = Some(log);
        self
    }

    pub fn log(&self) -> Option<&LogFile> {
        self.log.as_ref()
    }

    fn note(&self, message: String) {
        if let Some(log) = &self.log {
            let _ = log.log(message);
        }
    }

    fn next_id(len: usize) -> Result<AssetId> {
        u32::try_from(len)
            .map(AssetId)
            .map_err(|_| Error::OperationFailed("Asset table is full".to_string()))
    }

    /// Checks whether an asset was already registered, here or elsewhere.
    fn existing_id(
        &self,
        id: Option<AssetId>,
        registry: Option<u64>,
        what: &str,
    ) -> Result<Option<AssetId>> {
        match (id, registry) {
            (Some(id), Some(owner)) if owner == self.instance => Ok(Some(id)),
            (Some(_), _) => Err(Error::InvalidParameter(format!(
                "{} is already registered with another registry",
                what
            ))),
            (None, _) => Ok(None),
        }
    }

    /// Assign an id to a texture; registering twice returns the same id
    pub fn register_texture(&mut self, texture: &mut Texture) -> Result<AssetId> {
        let what = format!("Texture '{}'", texture.name());
        if let Some(id) = self.existing_id(texture.id, texture.registry, &what)? {
            return Ok(id);
        }
        let id = Self::next_id(self.textures.len())?;
        texture.id = Some(id);
        texture.registry = Some(self.instance);
        self.textures.push(texture.clone());
        self.note(format!("Registered texture #{} ({})", id, texture.name()));
        Ok(id)
    }

    /// Assign an id to a surface material; registering twice returns the same id
    pub fn register_surface_material(&mut self, material: &mut SurfaceMaterial) -> Result<AssetId> {
        let what = format!("Surface material '{}'", material.name());
        if let Some(id) = self.existing_id(material.id, material.registry, &what)? {
            return Ok(id);
        }
        let id = Self::next_id(self.surface_materials.len())?;
        material.id = Some(id);
        material.registry = Some(self.instance);
        self.surface_materials.push(material.clone());
        self.note(format!(
            "Registered surface material #{} ({})",
            id,
            material.name()
        ));
        Ok(id)
    }

    /// Assign an id to a volume material; registering twice returns the same id
    pub fn register_volume_material(&mut self, material: &mut VolumeMaterial) -> Result<AssetId> {
        let what = format!("Volume material '{}'", material.name());
        if let Some(id) = self.existing_id(material.id, material.registry, &what)? {
            return Ok(id);
        }
        let id = Self::next_id(self.volume_materials.len())?;
        material.id = Some(id);
        material.registry = Some(self.instance);
        self.volume_materials.push(material.clone());
        self.note(format!(
            "Registered volume material #{} ({})",
            id,
            material.name()
        ));
        Ok(id)
    }

    /// Registered level set, or `None` if the id is unknown or its owner was dropped
    pub fn levelset(&self, id: AssetId) -> Option<LevelSetRef> {
        self.levelsets
            .get(id.get() as usize)
            .and_then(LevelSetRef::upgrade)
    }

    pub fn texture(&self, id: AssetId) -> Option<&Texture> {
        self.textures.get(id.get() as usize)
    }

    pub fn surface_material(&self, id: AssetId) -> Option<&SurfaceMaterial> {
        self.surface_materials.get(id.get() as usize)
    }

    pub fn volume_material(&self, id: AssetId) -> Option<&VolumeMaterial> {
        self.volume_materials.get(id.get() as usize)
    }

    /// Number of level set ids handed out, including dropped ones
    pub fn levelset_count(&self) -> usize {
        self.levelsets.len()
    }

    /// Number of registered level sets whose owner is still alive
    pub fn live_levelset_count(&self) -> usize {
        self.levelsets.iter().filter(|w| w.strong_count() > 0).count()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn surface_material_count(&self) -> usize {
        self.surface_materials.len()
    }

    pub fn volume_material_count(&self) -> usize {
        self.volume_materials.len()
    }
}

impl GeometryStore for Registry {
    type Grid = LevelSetHandle;

    fn allocate_grid(&mut self, res: Vector3<i32>, offset: Vector3<f32>) -> Result<Self::Grid> {
        Ok(LevelSetHandle::new(LevelSet::new(res, offset)?))
    }

    fn register(&mut self, grid: &Self::Grid) -> Result<AssetId> {
        if let Some(index) = self.levelsets.iter().position(|w| grid.ptr_eq(w)) {
            return Self::next_id(index);
        }
        let id = Self::next_id(self.levelsets.len())?;
        self.levelsets.push(grid.downgrade());
        let res = grid.with(|ls| ls.resolution());
        self.note(format!(
            "Registered level set #{} ({}x{}x{} samples)",
            id, res.x, res.y, res.z
        ));
        Ok(id)
    }
}
