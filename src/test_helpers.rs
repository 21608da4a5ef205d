//! Shared test utilities for the cam-site test suite.
//!
//! Builds camera directory trees in temp dirs and small real JPEGs.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! touch_capture(&tmp.path().join("front"), "Front_20210313090000.jpg");
//! // → front/2021/03/13/Front_20210313090000.jpg
//! ```

use crate::naming::date_dir;
use chrono::{NaiveDate, NaiveDateTime};
use image::{ImageEncoder, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

// =========================================================================
// Dates
// =========================================================================

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, mi, s).unwrap()
}

// =========================================================================
// Camera trees
// =========================================================================

/// Day directory a capture file name belongs in, under `camera_root`.
///
/// Panics if the name carries no `_YYYYMMDD…` timestamp.
pub fn capture_dir(camera_root: &Path, file_name: &str) -> PathBuf {
    let (stem, _) = file_name
        .rsplit_once('.')
        .unwrap_or_else(|| panic!("no extension in '{file_name}'"));
    let (_, digits) = stem
        .rsplit_once('_')
        .unwrap_or_else(|| panic!("no timestamp in '{file_name}'"));
    let day = NaiveDate::parse_from_str(&digits[..8], "%Y%m%d")
        .unwrap_or_else(|e| panic!("bad date in '{file_name}': {e}"));
    date_dir(camera_root, day)
}

/// Create a placeholder capture file in its `YYYY/MM/DD` directory.
pub fn touch_capture(camera_root: &Path, file_name: &str) -> PathBuf {
    let dir = capture_dir(camera_root, file_name);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(file_name);
    fs::write(&path, "fake").unwrap();
    path
}

/// Create a decodable JPEG capture in its `YYYY/MM/DD` directory.
pub fn write_capture_jpeg(camera_root: &Path, file_name: &str, width: u32, height: u32) -> PathBuf {
    let dir = capture_dir(camera_root, file_name);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(file_name);
    write_test_jpeg(&path, width, height);
    path
}

// =========================================================================
// Images
// =========================================================================

/// Write a small valid JPEG file with the given dimensions.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Read a generated file, panicking with its path on failure.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}
