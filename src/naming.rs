//! Filename conventions for camera captures and generated pages.
//!
//! Cameras write one file per capture and media type, named
//! `<camera>_<YYYYMMDDhhmmss>.<ext>`:
//!
//! ```text
//! Camera BE_01_20210315004528.jpg   → camera "Camera BE_01", 2021-03-15 00:45:28, image
//! Camera BE_01_20210315004528.mp4   → same moment, video
//! ```
//!
//! The camera name is everything before the final `_<timestamp>` so names
//! containing underscores survive intact. Files live in `YYYY/MM/DD`
//! directories; every stage builds those paths through [`date_dir`].
//!
//! The generated site uses one page per day, named `YYYY-MM-DD.html`
//! ([`archive_page_name`]).

use crate::types::MediaType;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

/// `strftime` layout of the timestamp embedded in capture filenames.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Directory under the web root holding the published capture links.
pub const IMAGES_DIR: &str = "images";

/// Directory under the web root holding the thumbnails, same layout as
/// [`IMAGES_DIR`].
pub const THUMBNAILS_DIR: &str = "thumbnails";

const TIMESTAMP_LEN: usize = 14;
const ARCHIVE_PAGE_FORMAT: &str = "%Y-%m-%d.html";

/// A recognized capture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFile {
    pub camera_name: String,
    pub timestamp: NaiveDateTime,
    pub media_type: MediaType,
}

/// Parse a capture filename, accepting it only for `expected_date`.
///
/// Returns `None` for anything that is not `<camera>_<timestamp>.<ext>` with
/// a recognized extension, a valid timestamp on `expected_date` and a
/// non-empty camera name. Unrelated files are expected in camera directories
/// and are simply not captures.
pub fn parse_capture_name(filename: &str, expected_date: NaiveDate) -> Option<CaptureFile> {
    let (stem, ext) = filename.rsplit_once('.')?;
    let media_type = MediaType::from_extension(ext)?;

    let (camera_name, digits) = stem.rsplit_once('_')?;
    if camera_name.is_empty()
        || digits.len() != TIMESTAMP_LEN
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let expected_prefix = expected_date.format("%Y%m%d").to_string();
    if !digits.starts_with(&expected_prefix) {
        return None;
    }

    let timestamp = NaiveDateTime::parse_from_str(digits, TIMESTAMP_FORMAT).ok()?;

    Some(CaptureFile {
        camera_name: camera_name.to_string(),
        timestamp,
        media_type,
    })
}

/// File stem shared by all media of one capture: `<camera>_<YYYYMMDDhhmmss>`.
pub fn capture_stem(camera_name: &str, timestamp: NaiveDateTime) -> String {
    format!("{}_{}", camera_name, timestamp.format(TIMESTAMP_FORMAT))
}

/// Full file name of one media member of a capture.
pub fn capture_file_name(
    camera_name: &str,
    timestamp: NaiveDateTime,
    media_type: MediaType,
) -> String {
    format!(
        "{}.{}",
        capture_stem(camera_name, timestamp),
        media_type.extension()
    )
}

/// `root/YYYY/MM/DD` for a date.
pub fn date_dir(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(date.format("%Y").to_string())
        .join(date.format("%m").to_string())
        .join(date.format("%d").to_string())
}

/// Same as [`date_dir`] but with `/` separators, for URLs.
pub fn date_url_path(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Archive page file name for a date: `YYYY-MM-DD.html`.
pub fn archive_page_name(date: NaiveDate) -> String {
    date.format(ARCHIVE_PAGE_FORMAT).to_string()
}

/// Inverse of [`archive_page_name`].
pub fn parse_archive_page_name(name: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(name, ARCHIVE_PAGE_FORMAT).ok()
}
