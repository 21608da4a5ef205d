//! Camera directory scanning and snapshot grouping.
//!
//! Stage 1 of the pipeline. Reads capture files from a camera directory and
//! turns them into a [`CameraLog`].
//!
//! ## Directory Structure
//!
//! Each camera has its own directory with one level per year, month and day:
//!
//! ```text
//! camera-front/                          # Camera root
//! ├── 2021/
//! │   ├── 03/
//! │   │   ├── 13/
//! │   │   │   ├── Front_20210313090000.jpg
//! │   │   │   ├── Front_20210313090000.mp4   # same moment → one snapshot
//! │   │   │   └── Front_20210313090523.jpg
//! │   │   └── 14/
//! │   │       └── ...
//! │   └── 04/
//! └── 2022/
//! ```
//!
//! Year, month and day directories are walked in numeric order, so the
//! resulting log is sorted without a global sort. Entries that are not
//! numbered directories are ignored at every level.
//!
//! ## Validation
//!
//! A camera directory holds files of exactly one camera. Files with two
//! different camera prefixes, in one day or across days, are a hard error
//! ([`ScanError::MixedCamera`]); the data is either misplaced or corrupt.
//! Directories without any capture files are not an error and contribute
//! nothing.

use crate::naming::{date_dir, parse_capture_name};
use crate::types::{Camera, CameraLog, MediaTypes, Snapshot};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, trace};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Camera directory not found: {0}")]
    MissingCameraDir(PathBuf),
    #[error("Files from more than one camera in {location}: {}", names.join(", "))]
    MixedCamera { names: Vec<String>, location: String },
}

impl ScanError {
    /// Attach a directory to a mixed-camera error raised by [`group`].
    fn in_dir(self, dir: &Path) -> Self {
        match self {
            ScanError::MixedCamera { names, .. } => ScanError::MixedCamera {
                names,
                location: dir.display().to_string(),
            },
            other => other,
        }
    }
}

/// Group capture file names of one day into a camera log.
///
/// Names that are not captures for `for_date` are skipped. Files sharing a
/// timestamp become one [`Snapshot`] whose media types keep first-seen
/// order. The result is sorted by timestamp regardless of input order.
///
/// Returns the absent log when nothing matched, and
/// [`ScanError::MixedCamera`] when more than one camera name matched.
pub fn group<I, S>(filenames: I, for_date: NaiveDate) -> Result<CameraLog, ScanError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut camera_names = BTreeSet::new();
    let mut by_time: BTreeMap<NaiveDateTime, MediaTypes> = BTreeMap::new();

    for name in filenames {
        let name = name.as_ref();
        let Some(capture) = parse_capture_name(name, for_date) else {
            trace!(file = name, "not a capture file");
            continue;
        };
        by_time
            .entry(capture.timestamp)
            .or_default()
            .insert(capture.media_type);
        camera_names.insert(capture.camera_name);
    }

    if camera_names.len() > 1 {
        return Err(ScanError::MixedCamera {
            names: camera_names.into_iter().collect(),
            location: format!("files for {for_date}"),
        });
    }
    let Some(camera_name) = camera_names.pop_first() else {
        return Ok(CameraLog::absent());
    };

    let snapshots = by_time
        .into_iter()
        .map(|(timestamp, types)| Snapshot::new(timestamp, types))
        .collect();

    Ok(CameraLog::new(camera_name, snapshots))
}

/// Collect the snapshots of one camera directory.
///
/// With `for_date`, only `camera_root/YYYY/MM/DD` for that date is read; a
/// missing day directory yields the absent log. Without it, every
/// `year/month/day` directory is read and the camera name must agree across
/// all of them.
pub fn collect(camera_root: &Path, for_date: Option<NaiveDate>) -> Result<CameraLog, ScanError> {
    if !camera_root.is_dir() {
        return Err(ScanError::MissingCameraDir(camera_root.to_path_buf()));
    }

    let days = match for_date {
        Some(date) => {
            let dir = date_dir(camera_root, date);
            if dir.is_dir() {
                vec![(date, dir)]
            } else {
                info!(dir = %dir.display(), "no directory for requested date");
                Vec::new()
            }
        }
        None => day_dirs(camera_root)?,
    };

    let mut camera_name: Option<String> = None;
    let mut snapshots = Vec::new();

    for (date, dir) in days {
        let files = file_names(&dir)?;
        debug!(dir = %dir.display(), files = files.len(), "collecting day");

        let log = group(&files, date).map_err(|e| e.in_dir(&dir))?;
        let Some(name) = log.camera_name else {
            debug!(dir = %dir.display(), "no capture files");
            continue;
        };

        match &camera_name {
            None => camera_name = Some(name),
            Some(known) if *known != name => {
                return Err(ScanError::MixedCamera {
                    names: vec![known.clone(), name],
                    location: camera_root.display().to_string(),
                });
            }
            Some(_) => {}
        }
        snapshots.extend(log.snapshots);
    }

    Ok(match camera_name {
        Some(name) => CameraLog::new(name, snapshots),
        None => CameraLog::absent(),
    })
}

/// Collect every camera directory under `root`, keeping the given order.
///
/// A camera without a directory under `root` has never published anything
/// and gets the absent log.
pub fn load_cameras(
    root: &Path,
    camera_dirs: &[String],
    for_date: Option<NaiveDate>,
) -> Result<Vec<Camera>, ScanError> {
    camera_dirs
        .iter()
        .map(|dir_name| {
            let camera_root = root.join(dir_name);
            let log = if camera_root.is_dir() {
                collect(&camera_root, for_date)?
            } else {
                info!(camera = %dir_name, dir = %camera_root.display(), "no published directory");
                CameraLog::absent()
            };
            info!(
                camera = %dir_name,
                name = log.camera_name.as_deref().unwrap_or("-"),
                snapshots = log.len(),
                "loaded camera"
            );
            Ok(Camera {
                dir_name: dir_name.clone(),
                log,
            })
        })
        .collect()
}

/// All valid `year/month/day` directories below a camera root, oldest first.
fn day_dirs(camera_root: &Path) -> Result<Vec<(NaiveDate, PathBuf)>, ScanError> {
    let mut days = Vec::new();
    for (year, year_dir) in numbered_subdirs(camera_root)? {
        for (month, month_dir) in numbered_subdirs(&year_dir)? {
            for (day, day_dir) in numbered_subdirs(&month_dir)? {
                let date = i32::try_from(year)
                    .ok()
                    .and_then(|y| NaiveDate::from_ymd_opt(y, month, day));
                match date {
                    Some(date) => days.push((date, day_dir)),
                    None => debug!(dir = %day_dir.display(), "not a calendar date, skipped"),
                }
            }
        }
    }
    Ok(days)
}

/// Direct subdirectories whose name is a plain number, in numeric order.
fn numbered_subdirs(path: &Path) -> Result<Vec<(u32, PathBuf)>, ScanError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(number) = name.parse::<u32>() {
            dirs.push((number, entry.into_path()));
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Names of the non-directory entries of a day directory.
///
/// Symlinks count as files even when dangling: published trees are made of
/// links and a broken one should not hide its siblings.
fn file_names(dir: &Path) -> Result<Vec<String>, ScanError> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => names.push(name.to_string()),
            None => trace!(path = %entry.path().display(), "non-UTF-8 file name skipped"),
        }
    }
    Ok(names)
}
