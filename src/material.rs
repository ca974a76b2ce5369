//! Surface and volume material descriptors

use crate::asset::{AssetId, AssetKind, HasAssetId};
use crate::Config;

/// Surface material descriptor (e.g. `"diffuse"`, `"emissive"`)
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMaterial {
    name: String,
    config: Config,
    pub(crate) id: Option<AssetId>,
    pub(crate) registry: Option<u64>,
}

impl SurfaceMaterial {
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            config,
            id: None,
            registry: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn id(&self) -> Option<AssetId> {
        self.id
    }
}

impl HasAssetId for SurfaceMaterial {
    fn asset_kind(&self) -> AssetKind {
        AssetKind::SurfaceMaterial
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.id
    }
}

/// Volume material descriptor (e.g. `"homogeneous"`, `"vacuum"`)
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeMaterial {
    name: String,
    config: Config,
    pub(crate) id: Option<AssetId>,
    pub(crate) registry: Option<u64>,
}

impl VolumeMaterial {
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            config,
            id: None,
            registry: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn id(&self) -> Option<AssetId> {
        self.id
    }
}

impl HasAssetId for VolumeMaterial {
    fn asset_kind(&self) -> AssetKind {
        AssetKind::VolumeMaterial
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.id
    }
}
