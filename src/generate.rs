//! HTML site generation.
//!
//! Stage 4 of the pipeline. Reads the published tree under `web_root/images`
//! and renders a static site next to it.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): the latest snapshot of every camera at
//!   full size, followed by the archive calendar
//! - **Archive pages** (`/YYYY-MM-DD.html`): one block per display slot with
//!   a thumbnail per camera, linking to the full image and video
//!
//! ## Output Structure
//!
//! ```text
//! web/
//! ├── index.html                 # Live block + calendar
//! ├── 2021-03-13.html            # Archive pages
//! ├── 2021-03-14.html
//! ├── style.css
//! ├── images/<camera>/YYYY/MM/DD/...      # Published links (stage 2)
//! └── thumbnails/<camera>/YYYY/MM/DD/...  # Thumbnails (stage 3)
//! ```
//!
//! ## Display Rounding
//!
//! Snapshots are shown in slots of `display.round_minutes`. Each camera gets
//! at most one snapshot per slot: the one closest to the slot time. Rounding
//! only affects the pages; the published tree keeps every snapshot.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::calendar::render_calendar;
use crate::config::{LocaleConfig, SiteConfig};
use crate::naming::{
    IMAGES_DIR, THUMBNAILS_DIR, archive_page_name, capture_file_name, date_url_path,
    parse_archive_page_name,
};
use crate::scan::{self, ScanError};
use crate::types::{Camera, CameraLog, MediaType, Snapshot};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use maud::{DOCTYPE, Markup, html};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

pub const INDEX_PAGE: &str = "index.html";
pub const STYLESHEET: &str = "style.css";

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Source of "now" for the live block and "today" for the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderClock {
    pub now: NaiveDateTime,
}

impl RenderClock {
    /// Local wall-clock time.
    pub fn system() -> Self {
        Self {
            now: Local::now().naive_local(),
        }
    }

    pub fn fixed(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

/// What to render and where.
#[derive(Debug, Clone)]
pub struct SiteRequest {
    /// Site title, shown on every page.
    pub name: String,
    /// Output root holding `images/` and `thumbnails/`.
    pub web_root: PathBuf,
    /// Camera directory names, in display order.
    pub cameras: Vec<String>,
    /// Only render this day's archive page.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraSummary {
    pub dir_name: String,
    pub snapshots: usize,
    /// Snapshots left after display rounding.
    pub shown: usize,
    pub latest: Option<NaiveDateTime>,
}

/// What [`create_site`] wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteReport {
    pub web_root: PathBuf,
    pub cameras: Vec<CameraSummary>,
    /// Archive pages written in this run.
    pub pages: Vec<NaiveDate>,
    /// Dates linked from the calendar.
    pub archive_dates: usize,
}

// ============================================================================
// Display rounding
// ============================================================================

/// Round a timestamp to the nearest multiple of `minutes` within its day.
///
/// Exact halves round up, so with 10 minutes 15:14:59 becomes 15:10 and
/// 15:15:00 becomes 15:20. A slot can roll over to 00:00 of the next day.
pub fn round_minutes(timestamp: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    if minutes == 0 {
        return timestamp;
    }
    let step = i64::from(minutes) * 60;
    let seconds = i64::from(timestamp.time().num_seconds_from_midnight());
    let rounded = (seconds + step / 2) / step * step;
    timestamp + Duration::seconds(rounded - seconds)
}

/// Keep one snapshot per rounded slot: the one closest to the slot time.
///
/// Input must be in chronological order. On a tie the earlier snapshot wins.
/// Slots are per capture date, so a snapshot rounded past midnight never
/// competes with one captured on the next day.
pub fn round_to(snapshots: &[Snapshot], minutes: u32) -> Vec<Snapshot> {
    let mut kept = Vec::new();
    let mut best: Option<((NaiveDate, NaiveDateTime), i64, &Snapshot)> = None;

    for snapshot in snapshots {
        let slot = round_minutes(snapshot.timestamp, minutes);
        let key = (snapshot.timestamp.date(), slot);
        let distance = (snapshot.timestamp - slot).num_seconds().abs();

        match best.as_mut() {
            Some((current, closest, chosen)) if *current == key => {
                if distance < *closest {
                    *closest = distance;
                    *chosen = snapshot;
                }
            }
            _ => {
                if let Some((_, _, chosen)) = best.replace((key, distance, snapshot)) {
                    kept.push(chosen.clone());
                }
            }
        }
    }
    if let Some((_, _, chosen)) = best {
        kept.push(chosen.clone());
    }
    kept
}

/// Cells of one slot, one per camera in request order.
type Slots<'a> = BTreeMap<NaiveDateTime, Vec<Option<&'a Snapshot>>>;

/// Rounded snapshots grouped by capture date, then by slot.
fn archive_days(cameras: &[Camera], minutes: u32) -> BTreeMap<NaiveDate, Slots<'_>> {
    let mut days: BTreeMap<NaiveDate, Slots<'_>> = BTreeMap::new();
    for (index, camera) in cameras.iter().enumerate() {
        for snapshot in &camera.log.snapshots {
            let cells = days
                .entry(snapshot.timestamp.date())
                .or_default()
                .entry(round_minutes(snapshot.timestamp, minutes))
                .or_insert_with(|| vec![None; cameras.len()]);
            cells[index] = Some(snapshot);
        }
    }
    days
}

// ============================================================================
// Site
// ============================================================================

/// Render the site using the local clock.
pub fn create_site(request: &SiteRequest, config: &SiteConfig) -> Result<SiteReport, GenerateError> {
    create_site_with_clock(request, config, &RenderClock::system())
}

/// Render the site with an explicit clock.
pub fn create_site_with_clock(
    request: &SiteRequest,
    config: &SiteConfig,
    clock: &RenderClock,
) -> Result<SiteReport, GenerateError> {
    let web_root = &request.web_root;
    let minutes = config.display.round_minutes;
    let locale = &config.locale;

    let cameras = scan::load_cameras(&web_root.join(IMAGES_DIR), &request.cameras, request.date)?;
    let rounded: Vec<Camera> = cameras
        .iter()
        .map(|camera| Camera {
            dir_name: camera.dir_name.clone(),
            log: CameraLog {
                camera_name: camera.log.camera_name.clone(),
                snapshots: round_to(&camera.log.snapshots, minutes),
            },
        })
        .collect();

    fs::create_dir_all(web_root)?;
    fs::write(web_root.join(STYLESHEET), CSS_STATIC)?;

    let days = archive_days(&rounded, minutes);
    for (date, slots) in &days {
        let page = render_archive_page(&request.name, *date, slots, &rounded, locale);
        let path = web_root.join(archive_page_name(*date));
        fs::write(&path, page.into_string())?;
        debug!(page = %path.display(), slots = slots.len(), "archive page written");
    }

    let mut archive_dates: BTreeSet<NaiveDate> = days.keys().copied().collect();
    if request.date.is_some() {
        archive_dates.extend(load_archive_pages(web_root)?);
    }

    let index = render_index(&request.name, &cameras, &archive_dates, clock, locale);
    fs::write(web_root.join(INDEX_PAGE), index.into_string())?;

    info!(
        web_root = %web_root.display(),
        pages = days.len(),
        archive_dates = archive_dates.len(),
        "site generated"
    );

    Ok(SiteReport {
        web_root: web_root.clone(),
        cameras: cameras
            .iter()
            .zip(&rounded)
            .map(|(camera, shown)| CameraSummary {
                dir_name: camera.dir_name.clone(),
                snapshots: camera.log.len(),
                shown: shown.log.len(),
                latest: camera.log.latest().map(|s| s.timestamp),
            })
            .collect(),
        pages: days.keys().copied().collect(),
        archive_dates: archive_dates.len(),
    })
}

/// Dates of the `YYYY-MM-DD.html` pages already present in `dir`.
///
/// A missing directory has no pages.
pub fn load_archive_pages(dir: &Path) -> Result<BTreeSet<NaiveDate>, GenerateError> {
    let mut dates = BTreeSet::new();
    if !dir.is_dir() {
        return Ok(dates);
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(date) = entry.file_name().to_str().and_then(parse_archive_page_name) {
            dates.insert(date);
        }
    }
    Ok(dates)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(STYLESHEET);
            }
            body {
                (content)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preview {
    Full,
    Thumbnail,
}

/// Relative URL of one media file of a snapshot under `root_dir`.
fn media_url(root_dir: &str, camera: &Camera, snapshot: &Snapshot, media: MediaType) -> Option<String> {
    let camera_name = camera.log.camera_name.as_deref()?;
    Some(format!(
        "{}/{}/{}/{}",
        root_dir,
        camera.dir_name,
        date_url_path(snapshot.timestamp.date()),
        capture_file_name(camera_name, snapshot.timestamp, media)
    ))
}

/// Image (linking to the full size) and video link of one snapshot.
fn render_snapshot(camera: &Camera, snapshot: &Snapshot, preview: Preview, locale: &LocaleConfig) -> Markup {
    let image = snapshot
        .has(MediaType::Image)
        .then(|| media_url(IMAGES_DIR, camera, snapshot, MediaType::Image))
        .flatten();
    let video = snapshot
        .has(MediaType::Video)
        .then(|| media_url(IMAGES_DIR, camera, snapshot, MediaType::Video))
        .flatten();
    let src = match preview {
        Preview::Full => image.clone(),
        Preview::Thumbnail => image
            .as_ref()
            .and_then(|_| media_url(THUMBNAILS_DIR, camera, snapshot, MediaType::Image)),
    };
    let alt = snapshot.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();

    html! {
        @if let (Some(href), Some(src)) = (&image, &src) {
            a href=(href) {
                img src=(src) alt=(alt) style="width:100%";
            }
        }
        @if let Some(href) = &video {
            p { a href=(href) { (locale.video_label) } }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Latest snapshot per camera, then the calendar.
fn render_index(
    site_name: &str,
    cameras: &[Camera],
    archive_dates: &BTreeSet<NaiveDate>,
    clock: &RenderClock,
    locale: &LocaleConfig,
) -> Markup {
    let content = html! {
        div.site {
            h1 { (locale.live_heading) }
            div.live {
                h2 { (clock.now.format("%Y-%m-%d %H:%M")) }
                div.cam-wrapper {
                    @for camera in cameras {
                        @if let Some(latest) = camera.log.latest() {
                            div { (render_snapshot(camera, latest, Preview::Full, locale)) }
                        }
                    }
                }
            }
            h1 { (locale.archive_heading) }
            div.archive {
                (render_calendar(archive_dates, clock.today(), locale))
            }
        }
    };

    base_document(site_name, content)
}

/// One day of rounded snapshots, one column per camera.
fn render_archive_page(
    site_name: &str,
    date: NaiveDate,
    slots: &Slots<'_>,
    cameras: &[Camera],
    locale: &LocaleConfig,
) -> Markup {
    let title = format!("{} - {}", site_name, date);
    let content = html! {
        div.site {
            p.back { a href=(INDEX_PAGE) { (site_name) } }
            h1 { (locale.archive_heading) " " (date) }
            @for (slot, cells) in slots {
                div.slot {
                    h2 { (slot.format("%H:%M")) }
                    @for (camera, cell) in cameras.iter().zip(cells) {
                        div.camera {
                            @if let Some(snapshot) = cell {
                                (render_snapshot(camera, snapshot, Preview::Thumbnail, locale))
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(&title, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{at, date, read, touch_capture};
    use crate::types::MediaType::{Image, Video};
    use tempfile::TempDir;

    fn snap(h: u32, m: u32, s: u32) -> Snapshot {
        Snapshot::with_types(at(2021, 3, 13, h, m, s), &[Image])
    }

    fn times(snapshots: &[Snapshot]) -> Vec<NaiveDateTime> {
        snapshots.iter().map(|s| s.timestamp).collect()
    }

    fn camera(dir: &str, name: &str, snapshots: Vec<Snapshot>) -> Camera {
        Camera {
            dir_name: dir.to_string(),
            log: CameraLog::new(name, snapshots),
        }
    }

    fn request(web_root: &Path, cameras: &[&str], date: Option<NaiveDate>) -> SiteRequest {
        SiteRequest {
            name: "Home".to_string(),
            web_root: web_root.to_path_buf(),
            cameras: cameras.iter().map(|c| c.to_string()).collect(),
            date,
        }
    }

    fn clock() -> RenderClock {
        RenderClock::fixed(at(2021, 3, 14, 8, 5, 0))
    }

    // =========================================================================
    // Rounding
    // =========================================================================

    #[test]
    fn round_minutes_to_nearest_slot() {
        assert_eq!(round_minutes(at(2021, 3, 13, 15, 10, 55), 10), at(2021, 3, 13, 15, 10, 0));
        assert_eq!(round_minutes(at(2021, 3, 13, 15, 14, 59), 10), at(2021, 3, 13, 15, 10, 0));
        assert_eq!(round_minutes(at(2021, 3, 13, 15, 15, 0), 10), at(2021, 3, 13, 15, 20, 0));
    }

    #[test]
    fn round_minutes_rolls_into_next_day() {
        assert_eq!(round_minutes(at(2021, 3, 13, 23, 58, 0), 10), at(2021, 3, 14, 0, 0, 0));
    }

    #[test]
    fn round_minutes_zero_is_identity() {
        let ts = at(2021, 3, 13, 15, 10, 55);
        assert_eq!(round_minutes(ts, 0), ts);
    }

    #[test]
    fn round_to_keeps_closest_per_slot() {
        let kept = round_to(&[snap(15, 8, 0), snap(15, 11, 0), snap(15, 13, 0), snap(15, 16, 0)], 10);
        assert_eq!(times(&kept), vec![at(2021, 3, 13, 15, 11, 0), at(2021, 3, 13, 15, 16, 0)]);
    }

    #[test]
    fn round_to_prefers_earlier_on_tie() {
        let kept = round_to(&[snap(15, 9, 0), snap(15, 11, 0)], 10);
        assert_eq!(times(&kept), vec![at(2021, 3, 13, 15, 9, 0)]);
    }

    #[test]
    fn round_to_flushes_last_slot() {
        let kept = round_to(&[snap(9, 0, 0), snap(10, 0, 0), snap(11, 0, 0)], 10);
        assert_eq!(kept.len(), 3);
        assert!(round_to(&[], 10).is_empty());
    }

    #[test]
    fn round_to_keeps_both_sides_of_midnight() {
        let before = Snapshot::with_types(at(2021, 3, 13, 23, 58, 0), &[Image]);
        let after = Snapshot::with_types(at(2021, 3, 14, 0, 3, 0), &[Image]);

        let kept = round_to(&[before, after], 10);
        assert_eq!(times(&kept), vec![at(2021, 3, 13, 23, 58, 0), at(2021, 3, 14, 0, 3, 0)]);
    }

    #[test]
    fn archive_days_group_cameras_into_shared_slots() {
        let cameras = vec![
            camera("front", "Front", vec![snap(9, 1, 0), snap(9, 20, 0)]),
            camera("back", "Back", vec![snap(9, 2, 0)]),
        ];
        let days = archive_days(&cameras, 10);
        let slots = &days[&date(2021, 3, 13)];

        assert_eq!(slots.len(), 2);
        let first = &slots[&at(2021, 3, 13, 9, 0, 0)];
        assert!(first[0].is_some() && first[1].is_some());
        let second = &slots[&at(2021, 3, 13, 9, 20, 0)];
        assert!(second[0].is_some() && second[1].is_none());
    }

    // =========================================================================
    // Components
    // =========================================================================

    #[test]
    fn base_document_includes_doctype() {
        let content = html! { p { "test" } };
        let doc = base_document("Test", content).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"<link rel="stylesheet" href="style.css">"#));
    }

    #[test]
    fn thumbnail_links_to_full_image_and_video() {
        let cam = camera("front", "Front", vec![]);
        let snapshot = Snapshot::with_types(at(2021, 3, 13, 9, 0, 0), &[Image, Video]);
        let html = render_snapshot(&cam, &snapshot, Preview::Thumbnail, &LocaleConfig::default())
            .into_string();

        assert!(html.contains(r#"href="images/front/2021/03/13/Front_20210313090000.jpg""#));
        assert!(html.contains(r#"src="thumbnails/front/2021/03/13/Front_20210313090000.jpg""#));
        assert!(html.contains(
            r#"<a href="images/front/2021/03/13/Front_20210313090000.mp4">Captured video</a>"#
        ));
    }

    #[test]
    fn full_preview_uses_image_itself() {
        let cam = camera("front", "Front", vec![]);
        let html = render_snapshot(&cam, &snap(9, 0, 0), Preview::Full, &LocaleConfig::default())
            .into_string();
        assert!(html.contains(r#"src="images/front/2021/03/13/Front_20210313090000.jpg""#));
        assert!(!html.contains("thumbnails/"));
        assert!(!html.contains("Captured video"));
    }

    #[test]
    fn video_only_snapshot_has_no_image() {
        let cam = camera("front", "Front", vec![]);
        let snapshot = Snapshot::with_types(at(2021, 3, 13, 9, 0, 0), &[Video]);
        let html = render_snapshot(&cam, &snapshot, Preview::Thumbnail, &LocaleConfig::default())
            .into_string();
        assert!(!html.contains("<img"));
        assert!(html.contains("Front_20210313090000.mp4"));
    }

    // =========================================================================
    // Site
    // =========================================================================

    fn populate(web_root: &Path) {
        let front = web_root.join("images/front");
        touch_capture(&front, "Front_20210313090100.jpg");
        touch_capture(&front, "Front_20210313090100.mp4");
        touch_capture(&front, "Front_20210313090400.jpg");
        touch_capture(&front, "Front_20210314070000.jpg");
        let back = web_root.join("images/back");
        touch_capture(&back, "Back_20210313090200.jpg");
    }

    #[test]
    fn create_site_writes_pages_and_index() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());

        let report = create_site_with_clock(
            &request(tmp.path(), &["front", "back"], None),
            &SiteConfig::default(),
            &clock(),
        )
        .unwrap();

        assert_eq!(report.pages, vec![date(2021, 3, 13), date(2021, 3, 14)]);
        assert_eq!(report.archive_dates, 2);
        assert_eq!(report.cameras[0].snapshots, 3);
        assert_eq!(report.cameras[0].shown, 2);
        assert_eq!(report.cameras[0].latest, Some(at(2021, 3, 14, 7, 0, 0)));
        assert!(tmp.path().join("style.css").is_file());

        let page = read(&tmp.path().join("2021-03-13.html"));
        assert!(page.contains("<title>Home - 2021-03-13</title>"));
        assert!(page.contains("<h1>Archive 2021-03-13</h1>"));
        assert!(page.contains("<h2>09:00</h2>"));
        // 09:01 is closer to the 09:00 slot than 09:04
        assert!(page.contains("thumbnails/front/2021/03/13/Front_20210313090100.jpg"));
        assert!(!page.contains("Front_20210313090400"));
        assert!(page.contains("thumbnails/back/2021/03/13/Back_20210313090200.jpg"));
        assert!(page.contains("Captured video"));

        let index = read(&tmp.path().join("index.html"));
        assert!(index.contains("<h2>2021-03-14 08:05</h2>"));
        assert!(index.contains(r#"src="images/front/2021/03/14/Front_20210314070000.jpg""#));
        assert!(index.contains(r#"src="images/back/2021/03/13/Back_20210313090200.jpg""#));
        assert!(index.contains(r#"<a href="2021-03-13.html">13</a>"#));
        assert!(index.contains(r#"<div class="today"><a href="2021-03-14.html">14</a></div>"#));
    }

    #[test]
    fn date_filter_keeps_existing_pages_in_calendar() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());
        fs::write(tmp.path().join("2021-02-01.html"), "old").unwrap();

        let report = create_site_with_clock(
            &request(tmp.path(), &["front", "back"], Some(date(2021, 3, 14))),
            &SiteConfig::default(),
            &clock(),
        )
        .unwrap();

        assert_eq!(report.pages, vec![date(2021, 3, 14)]);
        assert_eq!(report.archive_dates, 2);
        assert!(!tmp.path().join("2021-03-13.html").exists());
        let index = read(&tmp.path().join("index.html"));
        assert!(index.contains(r#"<a href="2021-02-01.html">1</a>"#));
        assert!(index.contains("<h3>February</h3>"));
    }

    #[test]
    fn camera_without_snapshots_is_left_out_of_live_block() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());
        fs::create_dir_all(tmp.path().join("images/side")).unwrap();

        let report = create_site_with_clock(
            &request(tmp.path(), &["front", "side"], None),
            &SiteConfig::default(),
            &clock(),
        )
        .unwrap();

        assert_eq!(report.cameras[1].snapshots, 0);
        let index = read(&tmp.path().join("index.html"));
        assert!(!index.contains("images/side"));
    }

    #[test]
    fn site_name_is_escaped() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());
        let mut req = request(tmp.path(), &["front"], None);
        req.name = "<Cams>".to_string();

        create_site_with_clock(&req, &SiteConfig::default(), &clock()).unwrap();

        let index = read(&tmp.path().join("index.html"));
        assert!(index.contains("<title>&lt;Cams&gt;</title>"));
    }

    #[test]
    fn locale_headings_are_used() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());
        let mut config = SiteConfig::default();
        config.locale.live_heading = "Aktuell".to_string();
        config.locale.archive_heading = "Archiv".to_string();
        config.locale.video_label = "Video".to_string();

        create_site_with_clock(&request(tmp.path(), &["front"], None), &config, &clock()).unwrap();

        let index = read(&tmp.path().join("index.html"));
        assert!(index.contains("<h1>Aktuell</h1>"));
        assert!(index.contains("<h1>Archiv</h1>"));
        let page = read(&tmp.path().join("2021-03-13.html"));
        assert!(page.contains("<h1>Archiv 2021-03-13</h1>"));
        assert!(page.contains(">Video</a>"));
    }

    #[test]
    fn unpublished_camera_still_renders() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());

        let report = create_site_with_clock(
            &request(tmp.path(), &["front", "side"], None),
            &SiteConfig::default(),
            &clock(),
        )
        .unwrap();

        assert_eq!(report.cameras[1].dir_name, "side");
        assert_eq!(report.cameras[1].snapshots, 0);
        assert_eq!(report.pages, vec![date(2021, 3, 13), date(2021, 3, 14)]);
        let index = read(&tmp.path().join("index.html"));
        assert!(!index.contains("images/side"));
        assert!(index.contains(r#"src="images/front/2021/03/14/Front_20210314070000.jpg""#));
    }

    #[test]
    fn midnight_snapshots_stay_on_their_own_pages() {
        let tmp = TempDir::new().unwrap();
        let front = tmp.path().join("images/front");
        touch_capture(&front, "Front_20210313235800.jpg");
        touch_capture(&front, "Front_20210314000300.jpg");

        let report = create_site_with_clock(
            &request(tmp.path(), &["front"], None),
            &SiteConfig::default(),
            &clock(),
        )
        .unwrap();

        assert_eq!(report.cameras[0].shown, 2);
        let first = read(&tmp.path().join("2021-03-13.html"));
        assert!(first.contains("Front_20210313235800"));
        assert!(first.contains("<h2>00:00</h2>"));
        let second = read(&tmp.path().join("2021-03-14.html"));
        assert!(second.contains("Front_20210314000300"));
        assert!(!second.contains("Front_20210313235800"));
    }

    #[test]
    fn load_archive_pages_ignores_other_files() {
        let tmp = TempDir::new().unwrap();
        for name in ["2021-03-13.html", "index.html", "style.css", "2021-13-01.html"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        fs::create_dir(tmp.path().join("2021-03-14.html")).unwrap();

        let dates = load_archive_pages(tmp.path()).unwrap();
        assert_eq!(dates, BTreeSet::from([date(2021, 3, 13)]));
        assert!(load_archive_pages(&tmp.path().join("missing")).unwrap().is_empty());
    }
}
