//! CLI output formatting for the `prepare` and `create` commands.
//!
//! # Information-First Display
//!
//! Every camera leads with its positional index and directory name, followed
//! by indented counter lines. Paths only appear where the user needs them to
//! find the result.
//!
//! # Output Format
//!
//! ## Prepare
//!
//! ```text
//! 001 front (Front)
//!     Snapshots: 5 → 3 groups (1 pair, 1 dropped)
//!     Links: 5 new, 0 existing
//!     Thumbnails: 3 new, 0 existing
//! 002 garage
//!     No captures found
//! Prepared 2 cameras: 5 links, 3 thumbnails
//! ```
//!
//! ## Create
//!
//! ```text
//! Home → index.html
//! 001 2021-03-13 → 2021-03-13.html
//! 002 2021-03-14 → 2021-03-14.html
//!
//! Cameras
//!     001 front: 3 snapshots, 2 shown, latest 2021-03-14 07:00:00
//!     002 garage: no snapshots
//! Generated 2 archive pages, 5 calendar dates
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::{INDEX_PAGE, SiteReport};
use crate::naming::archive_page_name;
use crate::prepare::PrepareReport;
use crate::publish::PublishedCamera;
use crate::thumbnails::ThumbnailReport;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 pair`, `2 pairs`.
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

fn camera_lines(index: usize, camera: &PublishedCamera, thumbs: Option<&ThumbnailReport>) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(name) = camera.log.camera_name.as_deref() else {
        lines.push(format!("{} {}", format_index(index), camera.dir_name));
        lines.push(format!("{}No captures found", indent(1)));
        return lines;
    };

    lines.push(format!("{} {} ({})", format_index(index), camera.dir_name, name));

    let merge = &camera.merge;
    let mut detail = plural(merge.pairs, "pair", "pairs");
    if merge.dropped > 0 {
        detail.push_str(&format!(", {} dropped", merge.dropped));
    }
    lines.push(format!(
        "{}Snapshots: {} \u{2192} {} ({})",
        indent(1),
        merge.input,
        plural(merge.groups, "group", "groups"),
        detail
    ));
    let links = &camera.links;
    let mut line = format!(
        "{}Links: {} new, {} existing",
        indent(1),
        links.linked,
        links.existing
    );
    if links.dangling > 0 {
        line.push_str(&format!(", {} dangling", links.dangling));
    }
    if links.shadowed > 0 {
        line.push_str(&format!(", {} duplicate", links.shadowed));
    }
    lines.push(line);

    if let Some(t) = thumbs {
        let mut line = format!(
            "{}Thumbnails: {} new, {} existing",
            indent(1),
            t.created,
            t.existing
        );
        if t.failed > 0 {
            line.push_str(&format!(", {} failed", t.failed));
        }
        if t.video_only > 0 {
            line.push_str(&format!(", {} video only", t.video_only));
        }
        lines.push(line);
    }
    lines
}

// ============================================================================
// Prepare
// ============================================================================

/// Format the result of a `prepare` run.
pub fn format_prepare_output(report: &PrepareReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, camera) in report.cameras.iter().enumerate() {
        let thumbs = report
            .thumbnails
            .iter()
            .find(|t| t.camera_dir == camera.dir_name);
        lines.extend(camera_lines(i + 1, camera, thumbs));
    }

    let links: usize = report.cameras.iter().map(|c| c.links.linked).sum();
    let thumbnails: usize = report.thumbnails.iter().map(|t| t.created).sum();
    let failed: usize = report.thumbnails.iter().map(|t| t.failed).sum();

    let mut summary = format!(
        "Prepared {}: {}, {}",
        plural(report.cameras.len(), "camera", "cameras"),
        plural(links, "link", "links"),
        plural(thumbnails, "thumbnail", "thumbnails")
    );
    if failed > 0 {
        summary.push_str(&format!(" ({} failed)", failed));
    }
    lines.push(summary);
    lines
}

/// Print prepare output to stdout.
pub fn print_prepare_output(report: &PrepareReport) {
    for line in format_prepare_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Create
// ============================================================================

/// Format the result of a `create` run.
///
/// Information-first: each page leads with its positional index and date,
/// followed by `→` and the output file.
pub fn format_site_output(report: &SiteReport) -> Vec<String> {
    let mut lines = vec![format!("Home \u{2192} {}", INDEX_PAGE)];

    for (i, date) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            date,
            archive_page_name(*date)
        ));
    }

    if !report.cameras.is_empty() {
        lines.push(String::new());
        lines.push("Cameras".to_string());
        for (i, camera) in report.cameras.iter().enumerate() {
            let line = match camera.latest {
                Some(latest) => format!(
                    "{}{} {}: {}, {} shown, latest {}",
                    indent(1),
                    format_index(i + 1),
                    camera.dir_name,
                    plural(camera.snapshots, "snapshot", "snapshots"),
                    camera.shown,
                    latest
                ),
                None => format!(
                    "{}{} {}: no snapshots",
                    indent(1),
                    format_index(i + 1),
                    camera.dir_name
                ),
            };
            lines.push(line);
        }
    }

    lines.push(format!(
        "Generated {}, {}",
        plural(report.pages.len(), "archive page", "archive pages"),
        plural(report.archive_dates, "calendar date", "calendar dates")
    ));
    lines
}

/// Print create output to stdout.
pub fn print_site_output(report: &SiteReport) {
    for line in format_site_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
