//! Site configuration module.
//!
//! Handles loading, validating, and merging the `cam-site.toml` config file.
//! Stock defaults are the base layer; a user file overrides any subset of
//! them.
//!
//! ## Config File Location
//!
//! The file is looked up in this order:
//!
//! 1. the path given with `--config`,
//! 2. `cam-site.toml` in the output root (`--web-root` for `prepare`,
//!    `--dir` for `create`),
//! 3. none: stock defaults are used.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [merge]
//! window_seconds = 10       # Max distance of a jpg/mp4 pair (exclusive)
//! mode = "compatible"       # or "corrected": never drop unpaired snapshots
//!
//! [thumbnails]
//! max_size = 256            # Bounding box edge in pixels
//! quality = 85              # JPEG quality (1-100)
//!
//! [display]
//! round_minutes = 10        # Time slot size on archive pages
//!
//! [locale]
//! live_heading = "Live"
//! archive_heading = "Archive"
//! video_label = "Captured video"
//! month_names = ["January", ..., "December"]
//! weekday_names = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [locale]
//! live_heading = "Aktuell"
//! archive_heading = "Archiv"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the output root when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "cam-site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `cam-site.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Proximate-pair merge settings.
    pub merge: MergeConfig,
    /// Thumbnail generation settings.
    pub thumbnails: ThumbnailConfig,
    /// Archive page display settings.
    pub display: DisplayConfig,
    /// Texts and calendar labels used on the generated pages.
    pub locale: LocaleConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.merge.window_seconds == 0 {
            return Err(ConfigError::Validation(
                "merge.window_seconds must be greater than 0".into(),
            ));
        }
        if self.thumbnails.max_size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.max_size must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        let minutes = self.display.round_minutes;
        if minutes == 0 || minutes > MINUTES_PER_DAY || MINUTES_PER_DAY % minutes != 0 {
            return Err(ConfigError::Validation(
                "display.round_minutes must divide a day (1-1440)".into(),
            ));
        }
        if self.locale.month_names.len() != 12 {
            return Err(ConfigError::Validation(
                "locale.month_names must have 12 entries".into(),
            ));
        }
        if self.locale.weekday_names.len() != 7 {
            return Err(ConfigError::Validation(
                "locale.weekday_names must have 7 entries".into(),
            ));
        }
        Ok(())
    }
}

const MINUTES_PER_DAY: u32 = 24 * 60;

/// How the merger treats a single-media snapshot that found no partner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Unpaired candidates are dropped when a later snapshot replaces them.
    /// Matches the output of existing published trees.
    #[default]
    Compatible,
    /// Unpaired candidates are published on their own.
    Corrected,
}

/// Proximate-pair merge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// Two single-media snapshots pair up when they are less than this many
    /// seconds apart.
    pub window_seconds: u32,
    pub mode: MergeMode,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            window_seconds: 10,
            mode: MergeMode::Compatible,
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailConfig {
    /// Thumbnails fit in a `max_size` × `max_size` box.
    pub max_size: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_size: 256,
            quality: 85,
        }
    }
}

/// Archive page display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Snapshots are shown in slots of this many minutes, one per camera.
    pub round_minutes: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { round_minutes: 10 }
    }
}

/// Texts used on the generated pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocaleConfig {
    /// Heading above the latest snapshots on the index page.
    pub live_heading: String,
    /// Heading above the calendar and on archive pages.
    pub archive_heading: String,
    /// Link text for the video of a snapshot.
    pub video_label: String,
    /// Month names, January first.
    pub month_names: Vec<String>,
    /// Calendar column labels, Monday first.
    pub weekday_names: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            live_heading: "Live".to_string(),
            archive_heading: "Archive".to_string(),
            video_label: "Captured video".to_string(),
            month_names: strings(&[
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]),
            weekday_names: strings(&["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]),
        }
    }
}

impl LocaleConfig {
    /// Name of a month, `1..=12`.
    pub fn month_name(&self, month: u32) -> &str {
        month
            .checked_sub(1)
            .and_then(|i| self.month_names.get(i as usize))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel thumbnail workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Err` if the file cannot be read or contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config for a run.
///
/// An explicit `config_path` must exist. Otherwise `cam-site.toml` in
/// `output_root` is used when present, and stock defaults when not.
pub fn load_config(
    config_path: Option<&Path>,
    output_root: &Path,
) -> Result<SiteConfig, ConfigError> {
    let overlay = match config_path {
        Some(path) => Some(load_raw_config(path)?),
        None => {
            let default_path = output_root.join(CONFIG_FILE_NAME);
            if default_path.is_file() {
                Some(load_raw_config(&default_path)?)
            } else {
                None
            }
        }
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `cam-site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# cam-site Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The file is read from --config, or from cam-site.toml in the output root
# (--web-root for `prepare`, --dir for `create`).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Proximate-pair merging
# ---------------------------------------------------------------------------
[merge]
# A jpg-only and an mp4-only snapshot less than this many seconds apart
# are published as one capture.
window_seconds = 10

# "compatible": a snapshot that found no partner is dropped once the next
#               snapshot arrives (same output as earlier releases).
# "corrected":  such snapshots are published on their own.
mode = "compatible"

# ---------------------------------------------------------------------------
# Thumbnail generation
# ---------------------------------------------------------------------------
[thumbnails]
# Thumbnails fit in a max_size x max_size box, aspect ratio preserved.
max_size = 256

# JPEG encoding quality (1 = worst, 100 = best).
quality = 85

# ---------------------------------------------------------------------------
# Archive pages
# ---------------------------------------------------------------------------
[display]
# Snapshots are grouped into slots of this many minutes.
# Must divide a day evenly (1, 5, 10, 15, 30, 60, ...).
round_minutes = 10

# ---------------------------------------------------------------------------
# Page texts
# ---------------------------------------------------------------------------
[locale]
live_heading = "Live"
archive_heading = "Archive"
video_label = "Captured video"
month_names = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
]
# Calendar columns, Monday first.
weekday_names = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel thumbnail workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
