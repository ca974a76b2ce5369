//! Texture descriptors
//!
//! A texture is a named generator plus its parameters (for example a
//! `"sphere"` texture with `center` and `radius`). Evaluation happens in the
//! solver; this side only builds descriptors and tracks their registry id.

use crate::asset::{AssetId, AssetKind, HasAssetId};
use crate::{Config, Error, Result};

/// Texture descriptor
///
/// # Example
///
/// ```rust
/// use mpmkit::{Config, Registry, Texture, Vector3f};
///
/// let mut registry = Registry::new();
/// let mut ball = Texture::new(
///     "sphere",
///     Config::new()
///         .set("center", Vector3f::new(0.5, 0.6, 0.5))
///         .set("radius", 0.05f32),
/// );
/// registry.register_texture(&mut ball)?;
/// let mut density = ball.scaled(10.0)?;
/// registry.register_texture(&mut density)?;
/// # Ok::<(), mpmkit::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    name: String,
    config: Config,
    pub(crate) id: Option<AssetId>,
    pub(crate) registry: Option<u64>,
}

impl Texture {
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            config,
            id: None,
            registry: None,
        }
    }

    /// Generator name, e.g. `"sphere"` or `"multiply"`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn id(&self) -> Option<AssetId> {
        self.id
    }

    /// A `"multiply"` texture that scales this one by `factor`
    ///
    /// The source must already be registered, since the new texture refers to
    /// it by id.
    pub fn scaled(&self, factor: f32) -> Result<Texture> {
        if self.id.is_none() {
            return Err(Error::UnregisteredAsset {
                kind: AssetKind::Texture,
                key: "tex1".to_string(),
            });
        }
        let config = Config::new()
            .set("tex1", self.asset_ref())
            .set("multiplier", factor);
        Ok(Texture::new("multiply", config))
    }
}

impl HasAssetId for Texture {
    fn asset_kind(&self) -> AssetKind {
        AssetKind::Texture
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.id
    }
}
