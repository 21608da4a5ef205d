//! The `prepare` driver: scan, merge, publish, then thumbnail.
//!
//! ```text
//! root/<camera>/Y/M/D ──scan──▶ CameraLog ──merge+publish──▶ web/images/<camera>/…
//!                                                                 │
//!                                                    thumbnails ◀─┘
//! ```
//!
//! Cameras are handled in the order given. Scanning and publishing run
//! sequentially; each camera's thumbnails are then made in parallel. A fatal
//! error in any camera stops the run before later cameras are touched.

use crate::config::SiteConfig;
use crate::imaging::{ImageBackend, RustBackend};
use crate::publish::{PublishError, PublishedCamera, publish_camera};
use crate::scan::{ScanError, collect};
use crate::thumbnails::{ThumbnailReport, create_thumbnails};
use crate::types::Camera;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

/// Inputs of one `prepare` run.
#[derive(Debug, Clone)]
pub struct PrepareRequest {
    /// Directory holding the raw camera directories.
    pub root: PathBuf,
    /// Output root; links go to `images/`, thumbnails to `thumbnails/`.
    pub web_root: PathBuf,
    /// Camera directory names under `root`.
    pub cameras: Vec<String>,
    /// Restrict the run to one day.
    pub date: Option<NaiveDate>,
}

/// Per-camera results, in request order.
#[derive(Debug, Clone, Serialize)]
pub struct PrepareReport {
    pub cameras: Vec<PublishedCamera>,
    pub thumbnails: Vec<ThumbnailReport>,
}

/// Prepare using the built-in image backend.
pub fn prepare(request: &PrepareRequest, config: &SiteConfig) -> Result<PrepareReport, PrepareError> {
    prepare_with_backend(&RustBackend::new(), request, config)
}

/// Prepare using a specific backend (allows testing with mock).
pub fn prepare_with_backend(
    backend: &impl ImageBackend,
    request: &PrepareRequest,
    config: &SiteConfig,
) -> Result<PrepareReport, PrepareError> {
    let mut cameras = Vec::with_capacity(request.cameras.len());
    let mut thumbnails = Vec::with_capacity(request.cameras.len());

    for dir_name in &request.cameras {
        let log = collect(&request.root.join(dir_name), request.date)?;
        info!(camera = %dir_name, snapshots = log.len(), "scanned camera");
        let camera = Camera {
            dir_name: dir_name.clone(),
            log,
        };

        let published = publish_camera(&request.root, &request.web_root, &camera, &config.merge)?;
        let report = create_thumbnails(
            backend,
            &request.web_root,
            dir_name,
            &published.log,
            &config.thumbnails,
        );

        cameras.push(published);
        thumbnails.push(report);
    }

    Ok(PrepareReport { cameras, thumbnails })
}
