//! Error types for mpmkit

use crate::asset::AssetKind;
use thiserror::Error;

/// mpmkit error types
#[derive(Error, Debug)]
pub enum Error {
    /// A grid resolution axis was zero or negative
    #[error("Invalid resolution ({x}, {y}, {z}): every axis must be positive")]
    InvalidResolution { x: i32, y: i32, z: i32 },

    /// An asset handle was used before being registered
    #[error("Unregistered {kind} asset under key '{key}'")]
    UnregisteredAsset { kind: AssetKind, key: String },

    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File load error
    #[error("File load error: {0}")]
    FileLoad(String),

    /// File save error
    #[error("File save error: {0}")]
    FileSave(String),

    /// Invalid handle
    #[error("Invalid handle")]
    InvalidHandle,

    /// Operation failed
    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    pub(crate) fn invalid_resolution(res: nalgebra::Vector3<i32>) -> Self {
        Error::InvalidResolution {
            x: res.x,
            y: res.y,
            z: res.z,
        }
    }
}

/// Result type alias for mpmkit operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("test".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: test");
    }

    #[test]
    fn test_resolution_error_display() {
        let err = Error::invalid_resolution(nalgebra::Vector3::new(4, 0, 4));
        assert_eq!(
            err.to_string(),
            "Invalid resolution (4, 0, 4): every axis must be positive"
        );
    }

    #[test]
    fn test_unregistered_asset_display() {
        let err = Error::UnregisteredAsset {
            kind: AssetKind::Texture,
            key: "density_tex".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unregistered texture asset under key 'density_tex'"
        );
    }
}
