//! Platform interfaces.
//!
//! The navigation core consumes media listing, video control and key mapping
//! through these narrow traits; each platform provides implementations and
//! the composition point installs one set for the process lifetime.

pub mod desktop;

use std::rc::Rc;

use anyhow::{Result, bail};

use crate::config::Config;
use crate::nav::keys::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Folder,
    File,
}

/// One listable item in a media directory.
#[derive(Debug, Clone)]
pub struct MediaEntry {
    pub kind: MediaKind,
    /// Path or url handed to the video control's `select`.
    pub locator: String,
    pub title: String,
    pub thumbnail_ref: Option<String>,
    /// Full-size preview artwork ("movie sheet"), if any.
    pub sheet_ref: Option<String>,
}

pub trait MediaDirectory {
    /// List the entries at a path, folders first, then alphabetical by
    /// title. An empty path means the configured media search path.
    fn list_entries(&self, path: &str) -> Result<Vec<MediaEntry>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Stopped,
    Playing,
    Paused,
    FastForward,
    Reverse,
}

#[derive(Debug, Clone)]
pub struct MediaInfo {
    pub duration_seconds: f64,
    pub title: String,
}

/// Transport control for the active video. Methods return `false` when the
/// backend refused the operation.
pub trait VideoControl {
    fn select(&self, locator: &str) -> bool;
    fn play(&self) -> bool;
    fn pause(&self) -> bool;
    fn stop(&self) -> bool;
    fn fast_forward(&self, speed: u32) -> bool;
    fn reverse(&self, speed: u32) -> bool;
    fn play_mode(&self) -> (PlayMode, u32);
    fn position_seconds(&self) -> f64;
    fn media_info(&self) -> Option<MediaInfo>;
}

/// Maps raw terminal key events to the symbolic key set.
pub trait KeyMap {
    fn map_key(&self, raw: &crossterm::event::KeyEvent) -> Key;
}

/// The installed interface implementations, shared across the app.
#[derive(Clone)]
pub struct Platform {
    pub media: Rc<dyn MediaDirectory>,
    pub video: Rc<dyn VideoControl>,
    pub keymap: Rc<dyn KeyMap>,
}

impl Platform {
    /// Build the platform named in the config.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.platform.as_str() {
            "Desktop" => Ok(desktop::desktop_platform(config)),
            other => bail!("illegal platform value: {other}"),
        }
    }
}

/// Folders first, then alphabetical by title (case-insensitive). Views apply
/// this even if a provider returns entries unsorted.
pub fn sort_entries(entries: &mut [MediaEntry]) {
    entries.sort_by(|a, b| {
        let rank = |e: &MediaEntry| match e.kind {
            MediaKind::Folder => 0,
            MediaKind::File => 1,
        };
        rank(a)
            .cmp(&rank(b))
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
}
