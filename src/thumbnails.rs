//! Thumbnail generation for published snapshots.
//!
//! Stage 3 of the pipeline. Reads the image member of every published
//! snapshot and writes a scaled JPEG next to it in a parallel tree:
//!
//! ```text
//! web/
//! ├── images/front/2021/03/13/Front_20210313090000.jpg      # link to source
//! └── thumbnails/front/2021/03/13/Front_20210313090000.jpg  # ≤ 256×256
//! ```
//!
//! Video-only snapshots have nothing to scale and are skipped. Existing
//! thumbnails are kept, so reruns only do new work.
//!
//! ## Parallel Processing
//!
//! Snapshots are processed in parallel using [rayon](https://docs.rs/rayon).
//! Each item writes its own file, so order does not matter. A failing item
//! is logged and counted; the others carry on.

use crate::config::ThumbnailConfig;
use crate::imaging::{ImageBackend, ThumbnailSpec, create_thumbnail};
use crate::naming::{IMAGES_DIR, THUMBNAILS_DIR, capture_file_name, date_dir};
use crate::types::{CameraLog, MediaType};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One thumbnail to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailJob {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Counters for one camera.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThumbnailReport {
    pub camera_dir: String,
    pub created: usize,
    pub existing: usize,
    /// Snapshots without an image member.
    pub video_only: usize,
    pub failed: usize,
}

enum Outcome {
    Created,
    Existing,
    Failed,
}

/// Source and target paths for every snapshot that has an image.
pub fn thumbnail_jobs(web_root: &Path, camera_dir: &str, log: &CameraLog) -> Vec<ThumbnailJob> {
    let Some(camera_name) = log.camera_name.as_deref() else {
        return Vec::new();
    };
    let images = web_root.join(IMAGES_DIR).join(camera_dir);
    let thumbnails = web_root.join(THUMBNAILS_DIR).join(camera_dir);

    log.snapshots
        .iter()
        .filter(|s| s.has(MediaType::Image))
        .map(|s| {
            let name = capture_file_name(camera_name, s.timestamp, MediaType::Image);
            let day = s.timestamp.date();
            ThumbnailJob {
                source: date_dir(&images, day).join(&name),
                output: date_dir(&thumbnails, day).join(&name),
            }
        })
        .collect()
}

/// Create the missing thumbnails of one camera.
pub fn create_thumbnails(
    backend: &impl ImageBackend,
    web_root: &Path,
    camera_dir: &str,
    log: &CameraLog,
    config: &ThumbnailConfig,
) -> ThumbnailReport {
    let spec = ThumbnailSpec::from(config);
    let jobs = thumbnail_jobs(web_root, camera_dir, log);

    let outcomes: Vec<Outcome> = jobs
        .par_iter()
        .map(|job| run_job(backend, job, &spec))
        .collect();

    let mut report = ThumbnailReport {
        camera_dir: camera_dir.to_string(),
        video_only: log.len() - jobs.len(),
        ..ThumbnailReport::default()
    };
    for outcome in outcomes {
        match outcome {
            Outcome::Created => report.created += 1,
            Outcome::Existing => report.existing += 1,
            Outcome::Failed => report.failed += 1,
        }
    }

    info!(
        camera = %camera_dir,
        created = report.created,
        existing = report.existing,
        failed = report.failed,
        "thumbnails done"
    );
    report
}

fn run_job(backend: &impl ImageBackend, job: &ThumbnailJob, spec: &ThumbnailSpec) -> Outcome {
    if job.output.exists() {
        return Outcome::Existing;
    }

    if let Some(parent) = job.output.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!(dir = %parent.display(), error = %e, "cannot create thumbnail directory");
            return Outcome::Failed;
        }
    }

    match create_thumbnail(backend, &job.source, &job.output, spec) {
        Ok((width, height)) => {
            debug!(output = %job.output.display(), width, height, "thumbnail created");
            Outcome::Created
        }
        Err(e) => {
            warn!(source = %job.source.display(), error = %e, "thumbnail failed");
            Outcome::Failed
        }
    }
}
