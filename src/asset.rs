//! Asset ids and asset-id resolution
//!
//! Level sets, textures and materials are referenced by the solver through
//! integer ids handed out by the [`crate::Registry`]. A [`Config`] may hold
//! asset handles while it is being assembled; [`resolve_asset_ids`] replaces
//! them with plain ids before the config leaves the setup layer.

use crate::{Config, ConfigValue, Error, Result};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Registry-assigned asset id, unique per [`AssetKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssetId(pub(crate) u32);

impl AssetId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of asset kinds that resolve to ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AssetKind {
    SurfaceMaterial,
    VolumeMaterial,
    Texture,
    LevelSet,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::SurfaceMaterial => "surface material",
            AssetKind::VolumeMaterial => "volume material",
            AssetKind::Texture => "texture",
            AssetKind::LevelSet => "level set",
        };
        f.write_str(name)
    }
}

/// Lightweight reference to an asset, as stored in a [`Config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssetRef {
    pub kind: AssetKind,
    /// `None` until the asset is registered
    pub id: Option<AssetId>,
}

/// Implemented by every asset kind
pub trait HasAssetId {
    fn asset_kind(&self) -> AssetKind;

    /// `None` until the asset is registered
    fn asset_id(&self) -> Option<AssetId>;

    fn asset_ref(&self) -> AssetRef {
        AssetRef {
            kind: self.asset_kind(),
            id: self.asset_id(),
        }
    }
}

/// Replace every asset handle in `config` with its integer id
///
/// Non-asset values pass through unchanged, so resolving an already resolved
/// config is a no-op.
///
/// # Errors
///
/// [`Error::UnregisteredAsset`] if an asset handle carries no id.
///
/// # Example
///
/// ```rust
/// use mpmkit::{resolve_asset_ids, AssetId, AssetKind, AssetRef, Config, ConfigValue};
///
/// let material = AssetRef { kind: AssetKind::SurfaceMaterial, id: Some(AssetId::new(7)) };
/// let config = Config::new().set("mat", material).set("x", 3);
/// let resolved = resolve_asset_ids(config)?;
/// assert_eq!(resolved.get("mat"), Some(&ConfigValue::Int(7)));
/// assert_eq!(resolved.get("x"), Some(&ConfigValue::Int(3)));
/// # Ok::<(), mpmkit::Error>(())
/// ```
pub fn resolve_asset_ids(mut config: Config) -> Result<Config> {
    for (key, value) in config.iter_mut() {
        if let ConfigValue::Asset(asset) = value {
            let id = asset.id.ok_or_else(|| Error::UnregisteredAsset {
                kind: asset.kind,
                key: key.clone(),
            })?;
            *value = ConfigValue::Int(id.get() as i64);
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(kind: AssetKind, id: Option<u32>) -> AssetRef {
        AssetRef {
            kind,
            id: id.map(AssetId::new),
        }
    }

    #[test]
    fn test_every_kind_resolves() {
        let config = Config::new()
            .set("surface", asset(AssetKind::SurfaceMaterial, Some(1)))
            .set("volume", asset(AssetKind::VolumeMaterial, Some(2)))
            .set("density_tex", asset(AssetKind::Texture, Some(3)))
            .set("levelset", asset(AssetKind::LevelSet, Some(0)));
        let resolved = resolve_asset_ids(config).unwrap();
        assert_eq!(resolved.get("surface"), Some(&ConfigValue::Int(1)));
        assert_eq!(resolved.get("volume"), Some(&ConfigValue::Int(2)));
        assert_eq!(resolved.get("density_tex"), Some(&ConfigValue::Int(3)));
        assert_eq!(resolved.get("levelset"), Some(&ConfigValue::Int(0)));
    }

    #[test]
    fn test_unregistered_asset_is_an_error() {
        let config = Config::new()
            .set("x", 1)
            .set("tex", asset(AssetKind::Texture, None));
        match resolve_asset_ids(config) {
            Err(Error::UnregisteredAsset { kind, key }) => {
                assert_eq!(kind, AssetKind::Texture);
                assert_eq!(key, "tex");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_plain_values_pass_through() {
        let config = Config::new().set("a", 1.5f32).set("b", "text").set("c", false);
        assert_eq!(resolve_asset_ids(config.clone()).unwrap(), config);
    }
}
