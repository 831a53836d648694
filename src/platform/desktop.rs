//! Desktop platform: filesystem media listing, an in-process video control
//! stub for development, and a keyboard mapping that stands in for a remote.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{
    KeyMap, MediaDirectory, MediaEntry, MediaInfo, MediaKind, PlayMode, Platform, VideoControl,
    sort_entries,
};
use crate::config::{Config, expand_image_pattern};
use crate::nav::keys::Key;

const VIDEO_EXTENSIONS: &[&str] = &[
    "avi", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "ts", "vob", "wmv",
];

pub fn desktop_platform(config: &Config) -> Platform {
    Platform {
        media: Rc::new(FsMediaDirectory::new(config)),
        video: Rc::new(StubVideoControl::new()),
        keymap: Rc::new(DesktopKeyMap),
    }
}

/// Lists movies straight off the local filesystem.
pub struct FsMediaDirectory {
    search_path: String,
    folder_image_pattern: String,
    thumbnail_pattern: String,
    sheet_pattern: String,
}

impl FsMediaDirectory {
    pub fn new(config: &Config) -> Self {
        Self {
            search_path: config.media_search_path.clone(),
            folder_image_pattern: config.folder_image_path_pattern.clone(),
            thumbnail_pattern: config.thumbnail_image_path_pattern.clone(),
            sheet_pattern: config.movie_sheet_image_path_pattern.clone(),
        }
    }

    fn artwork(&self, pattern: &str, media_path: &str) -> Option<String> {
        let candidate = expand_image_pattern(pattern, media_path);
        Path::new(&candidate).exists().then_some(candidate)
    }
}

impl MediaDirectory for FsMediaDirectory {
    fn list_entries(&self, path: &str) -> Result<Vec<MediaEntry>> {
        let path = if path.is_empty() {
            self.search_path.as_str()
        } else {
            path
        };

        let mut entries = Vec::new();
        let dir = std::fs::read_dir(path).with_context(|| format!("listing {path}"))?;
        for item in dir {
            let item = item.with_context(|| format!("listing {path}"))?;
            let item_path = item.path();
            let locator = item_path.to_string_lossy().into_owned();
            let title = item_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| locator.clone());

            let file_type = item.file_type().with_context(|| format!("stat {locator}"))?;
            if file_type.is_dir() {
                entries.push(MediaEntry {
                    kind: MediaKind::Folder,
                    thumbnail_ref: self.artwork(&self.folder_image_pattern, &locator),
                    sheet_ref: None,
                    locator,
                    title,
                });
            } else if let Some(ext) = item_path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
                    entries.push(MediaEntry {
                        kind: MediaKind::File,
                        thumbnail_ref: self.artwork(&self.thumbnail_pattern, &locator),
                        sheet_ref: self.artwork(&self.sheet_pattern, &locator),
                        locator,
                        title,
                    });
                }
            }
        }

        sort_entries(&mut entries);
        Ok(entries)
    }
}

struct TransportState {
    mode: PlayMode,
    speed: u32,
    selected: Option<String>,
    /// Position at the last mode change; the live position is derived from
    /// this plus wall-clock time at the current rate.
    position_base: f64,
    anchor: Instant,
}

/// Stateful stand-in for a real player backend: tracks transport state and
/// simulates the play position so the video view has something to show.
pub struct StubVideoControl {
    state: RefCell<TransportState>,
    duration_seconds: f64,
}

impl StubVideoControl {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(TransportState {
                mode: PlayMode::Stopped,
                speed: 1,
                selected: None,
                position_base: 0.0,
                anchor: Instant::now(),
            }),
            duration_seconds: 5400.0,
        }
    }

    fn rate(mode: PlayMode, speed: u32) -> f64 {
        match mode {
            PlayMode::Playing => 1.0,
            PlayMode::FastForward => speed as f64,
            PlayMode::Reverse => -(speed as f64),
            PlayMode::Stopped | PlayMode::Paused => 0.0,
        }
    }

    fn set_mode(&self, mode: PlayMode, speed: u32) {
        let mut state = self.state.borrow_mut();
        let position = Self::rate(state.mode, state.speed)
            .mul_add(state.anchor.elapsed().as_secs_f64(), state.position_base)
            .clamp(0.0, self.duration_seconds);
        state.position_base = position;
        state.anchor = Instant::now();
        state.mode = mode;
        state.speed = speed;
    }
}

impl Default for StubVideoControl {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoControl for StubVideoControl {
    fn select(&self, locator: &str) -> bool {
        log::info!("selecting {locator}");
        let mut state = self.state.borrow_mut();
        state.selected = Some(locator.to_string());
        state.position_base = 0.0;
        state.anchor = Instant::now();
        true
    }

    fn play(&self) -> bool {
        if self.state.borrow().selected.is_none() {
            return false;
        }
        self.set_mode(PlayMode::Playing, 1);
        true
    }

    fn pause(&self) -> bool {
        self.set_mode(PlayMode::Paused, 1);
        true
    }

    fn stop(&self) -> bool {
        self.set_mode(PlayMode::Stopped, 1);
        let mut state = self.state.borrow_mut();
        state.selected = None;
        state.position_base = 0.0;
        true
    }

    fn fast_forward(&self, speed: u32) -> bool {
        if self.state.borrow().selected.is_none() {
            return false;
        }
        self.set_mode(PlayMode::FastForward, speed.max(2));
        true
    }

    fn reverse(&self, speed: u32) -> bool {
        if self.state.borrow().selected.is_none() {
            return false;
        }
        self.set_mode(PlayMode::Reverse, speed.max(2));
        true
    }

    fn play_mode(&self) -> (PlayMode, u32) {
        let state = self.state.borrow();
        (state.mode, state.speed)
    }

    fn position_seconds(&self) -> f64 {
        let state = self.state.borrow();
        Self::rate(state.mode, state.speed)
            .mul_add(state.anchor.elapsed().as_secs_f64(), state.position_base)
            .clamp(0.0, self.duration_seconds)
    }

    fn media_info(&self) -> Option<MediaInfo> {
        let state = self.state.borrow();
        state.selected.as_ref().map(|locator| MediaInfo {
            duration_seconds: self.duration_seconds,
            title: Path::new(locator)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| locator.clone()),
        })
    }
}

/// Keyboard stand-in for the remote control.
pub struct DesktopKeyMap;

impl KeyMap for DesktopKeyMap {
    fn map_key(&self, raw: &KeyEvent) -> Key {
        // leave chords with Ctrl/Alt to the terminal
        if raw
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Key::Unknown;
        }

        match raw.code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc | KeyCode::Backspace => Key::Back,
            KeyCode::Char(' ') => Key::PlayPause,
            KeyCode::Home => Key::Home,
            KeyCode::PageUp => Key::Previous,
            KeyCode::PageDown => Key::Next,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'o' => Key::Option,
                'p' => Key::Power,
                'h' => Key::Home,
                't' => Key::Stop,
                'f' => Key::FastForward,
                'r' => Key::Reverse,
                'b' => Key::Previous,
                'n' => Key::Next,
                'e' => Key::Eject,
                's' => Key::Search,
                _ => Key::Unknown,
            },
            _ => Key::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_mapping_covers_the_remote_set() {
        let map = DesktopKeyMap;
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(map.map_key(&press(KeyCode::Up)), Key::Up);
        assert_eq!(map.map_key(&press(KeyCode::Esc)), Key::Back);
        assert_eq!(map.map_key(&press(KeyCode::Backspace)), Key::Back);
        assert_eq!(map.map_key(&press(KeyCode::Char(' '))), Key::PlayPause);
        assert_eq!(map.map_key(&press(KeyCode::Char('T'))), Key::Stop);
        assert_eq!(map.map_key(&press(KeyCode::PageDown)), Key::Next);
        assert_eq!(map.map_key(&press(KeyCode::Char('x'))), Key::Unknown);
    }

    #[test]
    fn control_chords_stay_unmapped() {
        let map = DesktopKeyMap;
        let chord = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert_eq!(map.map_key(&chord), Key::Unknown);
    }

    #[test]
    fn transport_state_machine() {
        let video = StubVideoControl::new();
        assert!(!video.play(), "play without select must be refused");

        assert!(video.select("/m/film.mkv"));
        assert!(video.play());
        assert_eq!(video.play_mode().0, PlayMode::Playing);

        assert!(video.fast_forward(4));
        assert_eq!(video.play_mode(), (PlayMode::FastForward, 4));

        assert!(video.stop());
        assert_eq!(video.play_mode().0, PlayMode::Stopped);
        assert!(video.media_info().is_none());
    }

    #[test]
    fn media_info_reports_title_from_locator() {
        let video = StubVideoControl::new();
        video.select("/media/films/Alien.mkv");
        let info = video.media_info().unwrap();
        assert_eq!(info.title, "Alien");
        assert!(info.duration_seconds > 0.0);
    }
}
