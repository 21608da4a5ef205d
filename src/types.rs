//! Shared types used across all pipeline stages.
//!
//! A camera's history is a [`CameraLog`]: an ordered list of [`Snapshot`]s,
//! each of which is one capture moment carrying one or more [`MediaType`]s.
//! These types are produced by [`scan`](crate::scan), reshaped by
//! [`merge`](crate::merge) and [`publish`](crate::publish), and consumed by
//! the thumbnail and site stages.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Kind of media file a camera writes for a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// Recognized file extensions.
const MEDIA_EXTENSIONS: &[(&str, MediaType)] =
    &[("jpg", MediaType::Image), ("mp4", MediaType::Video)];

impl MediaType {
    /// Every media type, in canonical order.
    pub const ALL: [MediaType; 2] = [MediaType::Image, MediaType::Video];

    /// Look up the media type for a file extension (exact, lowercase match).
    pub fn from_extension(ext: &str) -> Option<Self> {
        MEDIA_EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, t)| *t)
    }

    /// Canonical extension, without the dot. Used when file names are
    /// synthesized.
    pub fn extension(self) -> &'static str {
        match self {
            MediaType::Image => "jpg",
            MediaType::Video => "mp4",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Insertion-ordered set of media types. Holds each type at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MediaTypes(Vec<MediaType>);

impl MediaTypes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a type; returns `false` if it was already present.
    pub fn insert(&mut self, media_type: MediaType) -> bool {
        if self.0.contains(&media_type) {
            return false;
        }
        self.0.push(media_type);
        true
    }

    pub fn contains(&self, media_type: MediaType) -> bool {
        self.0.contains(&media_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = MediaType> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every known media type is present.
    pub fn is_complete(&self) -> bool {
        MediaType::ALL.iter().all(|t| self.contains(*t))
    }
}

impl FromIterator<MediaType> for MediaTypes {
    fn from_iter<I: IntoIterator<Item = MediaType>>(iter: I) -> Self {
        let mut set = Self::new();
        for t in iter {
            set.insert(t);
        }
        set
    }
}

impl<'a> IntoIterator for &'a MediaTypes {
    type Item = MediaType;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, MediaType>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// One capture moment of a camera.
///
/// Ordering and equality look at the timestamp only: two snapshots at the
/// same second are the same moment, whatever files were found for it.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub timestamp: NaiveDateTime,
    pub media_types: MediaTypes,
}

impl Snapshot {
    pub fn new(timestamp: NaiveDateTime, media_types: MediaTypes) -> Self {
        debug_assert!(!media_types.is_empty(), "snapshot without media");
        Self {
            timestamp,
            media_types,
        }
    }

    /// Convenience constructor from a slice of types.
    pub fn with_types(timestamp: NaiveDateTime, types: &[MediaType]) -> Self {
        Self::new(timestamp, types.iter().copied().collect())
    }

    pub fn has(&self, media_type: MediaType) -> bool {
        self.media_types.contains(media_type)
    }

    /// True when the snapshot already carries every media type.
    pub fn is_complete(&self) -> bool {
        self.media_types.is_complete()
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
    }
}

impl Eq for Snapshot {}

impl PartialOrd for Snapshot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Snapshot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp.cmp(&other.timestamp)
    }
}

/// Ordered snapshot history attributed to one camera.
///
/// `camera_name == None` marks a log built from a directory without any
/// recognizable files; such a log never holds snapshots.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CameraLog {
    pub camera_name: Option<String>,
    pub snapshots: Vec<Snapshot>,
}

impl CameraLog {
    /// The "nothing found" log.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn new(camera_name: impl Into<String>, snapshots: Vec<Snapshot>) -> Self {
        Self {
            camera_name: Some(camera_name.into()),
            snapshots,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.camera_name.is_none()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Most recent snapshot, if any.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.iter().max()
    }
}

/// A camera as named on the command line: its directory plus its history.
#[derive(Debug, Clone, Serialize)]
pub struct Camera {
    /// Directory name under the source (or `images/`) root.
    pub dir_name: String,
    pub log: CameraLog,
}
