//! Publishing merged snapshots into the web root.
//!
//! Stage 2 of the pipeline. Every merged group gets one canonical file stem,
//! taken from its defining snapshot, and one link per media file:
//!
//! ```text
//! source/front/2021/03/13/Front_20210313090000.jpg ─┐
//! source/front/2021/03/13/Front_20210313090003.mp4 ─┤  Pair
//!                                                   ▼
//! web/images/front/2021/03/13/Front_20210313090000.jpg → source …090000.jpg
//! web/images/front/2021/03/13/Front_20210313090000.mp4 → source …090003.mp4
//! ```
//!
//! Links point at the canonicalized source path. On Unix they are symlinks;
//! elsewhere the file is copied. An existing target is left alone, so
//! publishing is idempotent. A source that no longer resolves (a dangling
//! upload link) is logged and counted, never fatal.

use crate::config::MergeConfig;
use crate::merge::{MergeStats, SnapshotGroup, merge_proximate};
use crate::naming::{IMAGES_DIR, capture_file_name, date_dir};
use crate::types::{Camera, CameraLog, MediaTypes, Snapshot};
use serde::Serialize;
use std::fs;
use std::io;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Source file {path} cannot be resolved: {err}")]
    Source {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
}

/// Where one camera's files come from and go to.
#[derive(Debug, Clone)]
pub struct PublishLayout {
    /// `source_root/<camera_dir>`
    pub source_camera_root: PathBuf,
    /// `web_root/images/<camera_dir>`
    pub target_camera_root: PathBuf,
    /// Camera name used in file names.
    pub camera_name: String,
}

impl PublishLayout {
    pub fn new(source_root: &Path, web_root: &Path, camera_dir: &str, camera_name: &str) -> Self {
        Self {
            source_camera_root: source_root.join(camera_dir),
            target_camera_root: web_root.join(IMAGES_DIR).join(camera_dir),
            camera_name: camera_name.to_string(),
        }
    }
}

/// Link counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishStats {
    /// Links (or copies) created by this run.
    pub linked: usize,
    /// Targets that were already present.
    pub existing: usize,
    /// Sources that could not be resolved. On Unix they are still linked,
    /// by absolute path; elsewhere they are skipped.
    pub dangling: usize,
    /// Pair members whose media type the defining member already published
    /// under the same name.
    pub shadowed: usize,
}

impl AddAssign for PublishStats {
    fn add_assign(&mut self, other: Self) {
        self.linked += other.linked;
        self.existing += other.existing;
        self.dangling += other.dangling;
        self.shadowed += other.shadowed;
    }
}

/// What [`link_file`] did with one target.
enum Linked {
    Created,
    Existing,
    Dangling,
}

/// A camera after merge and publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedCamera {
    pub dir_name: String,
    /// One snapshot per published group, in time order.
    pub log: CameraLog,
    pub merge: MergeStats,
    pub links: PublishStats,
}

/// Publish one merged group.
///
/// Returns the snapshot as it now exists in the web root: the defining
/// timestamp with the union of all member media types.
pub fn publish_group(
    layout: &PublishLayout,
    group: &SnapshotGroup,
) -> Result<(Snapshot, PublishStats), PublishError> {
    let stem_time = group.defining().timestamp;
    let out_dir = date_dir(&layout.target_camera_root, stem_time.date());
    let mut stats = PublishStats::default();
    let mut placed = MediaTypes::new();

    for member in group.members() {
        let source_dir = date_dir(&layout.source_camera_root, member.timestamp.date());
        for media_type in &member.media_types {
            let source =
                source_dir.join(capture_file_name(&layout.camera_name, member.timestamp, media_type));
            if !placed.insert(media_type) {
                debug!(source = %source.display(), "same media type as defining member, not published");
                stats.shadowed += 1;
                continue;
            }
            let target = out_dir.join(capture_file_name(&layout.camera_name, stem_time, media_type));

            match link_file(&source, &target)? {
                Linked::Created => stats.linked += 1,
                Linked::Existing => stats.existing += 1,
                Linked::Dangling => stats.dangling += 1,
            }
        }
    }

    Ok((Snapshot::new(stem_time, group.media_types()), stats))
}

/// Merge and publish a whole camera.
///
/// An absent log publishes nothing and yields an absent log.
pub fn publish_camera(
    source_root: &Path,
    web_root: &Path,
    camera: &Camera,
    config: &MergeConfig,
) -> Result<PublishedCamera, PublishError> {
    let Some(camera_name) = camera.log.camera_name.as_deref() else {
        info!(camera = %camera.dir_name, "no captures found, nothing to publish");
        return Ok(PublishedCamera {
            dir_name: camera.dir_name.clone(),
            log: CameraLog::absent(),
            merge: MergeStats::default(),
            links: PublishStats::default(),
        });
    };

    let layout = PublishLayout::new(source_root, web_root, &camera.dir_name, camera_name);
    let merged = merge_proximate(camera.log.snapshots.iter().cloned(), config);
    let merge_stats = merged.stats(camera.log.len());

    let mut links = PublishStats::default();
    let mut snapshots = Vec::with_capacity(merged.groups.len());
    for group in &merged.groups {
        let (snapshot, stats) = publish_group(&layout, group)?;
        links += stats;
        snapshots.push(snapshot);
    }

    info!(
        camera = %camera.dir_name,
        groups = merge_stats.groups,
        pairs = merge_stats.pairs,
        dropped = merge_stats.dropped,
        linked = links.linked,
        existing = links.existing,
        dangling = links.dangling,
        shadowed = links.shadowed,
        "published camera"
    );

    Ok(PublishedCamera {
        dir_name: camera.dir_name.clone(),
        log: CameraLog::new(camera_name, snapshots),
        merge: merge_stats,
        links,
    })
}

/// Create `target` pointing at the real path of `source`.
///
/// An existing target is left alone. A missing parent directory is created
/// and the link retried once. A source that cannot be resolved is linked by
/// its absolute path on Unix and skipped elsewhere.
fn link_file(source: &Path, target: &Path) -> Result<Linked, PublishError> {
    if target.symlink_metadata().is_ok() {
        return Ok(Linked::Existing);
    }

    let (real, outcome) = match fs::canonicalize(source) {
        Ok(real) => (real, Linked::Created),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(source = %source.display(), "source does not resolve");
            if !cfg!(unix) {
                return Ok(Linked::Dangling);
            }
            (std::path::absolute(source)?, Linked::Dangling)
        }
        Err(err) => {
            return Err(PublishError::Source {
                path: source.to_path_buf(),
                err,
            });
        }
    };

    match place(&real, target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            place(&real, target)?;
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(Linked::Existing),
        Err(e) => return Err(e.into()),
    }

    debug!(target = %target.display(), source = %real.display(), "linked");
    Ok(outcome)
}

#[cfg(unix)]
fn place(source: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(not(unix))]
fn place(source: &Path, target: &Path) -> io::Result<()> {
    fs::copy(source, target).map(|_| ())
}
