//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::fit_within;
use super::params::{Quality, ThumbnailParams};
use crate::config;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Bounding box and encoding quality for thumbnails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailSpec {
    pub max_size: u32,
    pub quality: Quality,
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self {
            max_size: 256,
            quality: Quality::default(),
        }
    }
}

impl From<&config::ThumbnailConfig> for ThumbnailSpec {
    fn from(config: &config::ThumbnailConfig) -> Self {
        Self {
            max_size: config.max_size,
            quality: Quality::new(config.quality),
        }
    }
}

/// Plan a thumbnail operation without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_thumbnail(
    source: &Path,
    output: &Path,
    source_dims: (u32, u32),
    spec: &ThumbnailSpec,
) -> ThumbnailParams {
    let (width, height) = fit_within(source_dims, spec.max_size);

    ThumbnailParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        quality: spec.quality,
    }
}

/// Create a thumbnail image.
///
/// Reads the source dimensions, fits them into the bounding box and writes
/// the scaled JPEG. Returns the thumbnail dimensions.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    spec: &ThumbnailSpec,
) -> Result<(u32, u32)> {
    let dims = get_dimensions(backend, source)?;
    let params = plan_thumbnail(source, output, dims, spec);
    backend.thumbnail(&params)?;
    Ok((params.width, params.height))
}
