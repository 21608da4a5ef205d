//! # cam-site
//!
//! Turns the upload folders of security cameras into a browsable static
//! archive. Cameras drop a JPEG and/or an MP4 per event into
//! `root/<camera>/YYYY/MM/DD/`; cam-site pairs the files that belong
//! together, publishes them under one name, and renders plain HTML pages.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! ```text
//! 1. Scan       root/<camera>/Y/M/D  →  CameraLog         (file names → snapshots)
//! 2. Publish    CameraLog            →  web/images/…      (merge pairs, link files)
//! 3. Thumbnail  web/images/…         →  web/thumbnails/…  (scaled JPEGs)
//! 4. Generate   web/images/…         →  web/*.html        (live page + archive)
//! ```
//!
//! Stages 1–3 make up the `prepare` command, stage 4 the `create` command.
//! `create` re-scans the published tree, so the two can run on different
//! schedules.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `<Camera>_<YYYYMMDDhhmmss>.<ext>` file names, date paths, page names |
//! | [`types`] | `MediaType`, `Snapshot`, `CameraLog`, `Camera` |
//! | [`scan`] | Walks the `YYYY/MM/DD` tree and groups files into snapshots |
//! | [`merge`] | Pairs single-media snapshots that are close in time |
//! | [`publish`] | Links merged groups into `web/images` under canonical names |
//! | [`imaging`] | Image backend trait and the `image`-crate implementation |
//! | [`thumbnails`] | Parallel thumbnail generation for published snapshots |
//! | [`prepare`] | Drives scan → publish → thumbnail for a list of cameras |
//! | [`generate`] | Display rounding and the maud page renderers |
//! | [`calendar`] | Month grids and the archive calendar |
//! | [`config`] | `cam-site.toml` loading, defaults and validation |
//! | [`output`] | CLI output formatting for run reports |
//!
//! # Design Decisions
//!
//! ## Timestamps Live in File Names
//!
//! Cameras name every capture after its second. No metadata is read from the
//! files themselves, so scanning a day costs one directory listing.
//!
//! ## Links, Not Copies
//!
//! The published tree links back to the camera uploads on Unix. It can be
//! rebuilt at any time and takes no extra space. Existing links are kept,
//! which makes `prepare` cheap to rerun.
//!
//! ## Explicit Locale
//!
//! Month names, weekday labels and headings come from the config and are
//! passed to the renderers. The process locale is never changed.

pub mod calendar;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod merge;
pub mod naming;
pub mod output;
pub mod prepare;
pub mod publish;
pub mod scan;
pub mod thumbnails;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
