//! Asset loading
//!
//! Scene import from glTF files. Import failure is a recoverable
//! condition: the loader returns an error value and the caller keeps
//! whatever scene it had before.

pub mod gltf_loader;

pub use gltf_loader::load_gltf;

use thiserror::Error;

/// Errors produced while loading assets
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Unsupported asset format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// glTF parsing or validation error
    #[error("glTF error: {0}")]
    GltfError(#[from] gltf::Error),

    /// GPU resource creation failed during import
    #[error("Render error: {0}")]
    RenderError(#[from] crate::render::RenderError),
}
