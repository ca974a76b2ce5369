//! # mpmkit
//!
//! Boundary geometry and asset plumbing for grid-based MPM simulation setups.
//!
//! ## Features
//!
//! - **World-space level sets**: describe boundaries in a unit domain and let
//!   [`LevelSet3D`] rescale them onto the simulation grid
//! - **Explicit registries**: ids for level sets, textures and materials live in
//!   a [`Registry`] value instead of process-global state
//! - **Config resolution**: asset handles inside a [`Config`] are replaced by
//!   their integer ids before the config is handed to a solver
//!
//! ## Example
//!
//! ```rust
//! use mpmkit::{resolve_asset_ids, Config, HasAssetId, LevelSet3D, Registry, Texture};
//! use nalgebra::Vector3;
//!
//! let mut registry = Registry::new();
//!
//! // Container with a floor at y = 0.05
//! let mut boundary = LevelSet3D::new(&mut registry, Vector3::new(64, 64, 64))?;
//! boundary.add_plane(0.0, 1.0, 0.0, -0.05);
//! boundary.set_friction(0.4);
//!
//! let mut density = Texture::new("const", Config::new().set("value", 1.0f32));
//! registry.register_texture(&mut density)?;
//!
//! let config = Config::new()
//!     .set("levelset", boundary.asset_ref())
//!     .set("density", density.asset_ref());
//! let resolved = resolve_asset_ids(config)?;
//! assert_eq!(resolved.get_int("levelset", -1)?, 0);
//! # Ok::<(), mpmkit::Error>(())
//! ```

pub mod asset;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod implicit;
pub mod levelset;
pub mod levelset3d;
pub mod log;
pub mod material;
pub mod registry;
pub mod store;
pub mod texture;
pub mod types;
pub mod utils;
pub mod vector_ext;

/// Convenience imports for common traits/extensions.
pub mod prelude {
    pub use crate::{GeometryStore, HasAssetId, Implicit, LevelSetGrid, Vector3Ext};
}

// Re-exports
pub use asset::{resolve_asset_ids, AssetId, AssetKind, AssetRef, HasAssetId};
pub use config::{Config, ConfigValue};
pub use dynamic::DynamicLevelSet3D;
pub use error::{Error, Result};
pub use implicit::{CuboidImplicit, Implicit, InsideOut, PlaneImplicit, SphereImplicit};
pub use levelset::LevelSet;
pub use levelset3d::{LevelSet3D, LevelSetOptions, DEFAULT_OFFSET};
pub use log::LogFile;
pub use material::{SurfaceMaterial, VolumeMaterial};
pub use registry::Registry;
pub use store::{GeometryStore, LevelSetGrid, LevelSetHandle, LevelSetRef};
pub use texture::Texture;
pub use types::{BBox3, Vector3f, Vector3i};
pub use utils::{TempFolder, Utils};
pub use vector_ext::Vector3Ext;
