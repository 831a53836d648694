//! The video browser: a grid over one media directory, drill-down into
//! folders, and a movie-sheet overlay for files that have sheet artwork.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::nav::command::{Command, CommandSink, ViewData};
use crate::nav::event::commands;
use crate::nav::keys::Key;
use crate::nav::view::ViewController;
use crate::platform::{MediaDirectory, MediaEntry, MediaKind};

pub const VIDEO_BROWSER_VIEW_NAME: &str = "Movies.VideoBrowser";

/// Begin data for the browser: which directory to show and, on restore,
/// which cell was selected.
pub struct BrowserViewState {
    pub path: String,
    pub selected_index: usize,
}

impl BrowserViewState {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            selected_index: 0,
        }
    }
}

pub struct VideoBrowserController {
    media: Rc<dyn MediaDirectory>,
    path: String,
    entries: Vec<MediaEntry>,
    selected: usize,
    /// Column count of the last rendered grid; keyboard navigation moves in
    /// rows of this width.
    columns: usize,
    /// Entry shown in the movie-sheet overlay. Shared with the captured key
    /// handler so closing the overlay from either side stays in sync.
    sheet: Rc<RefCell<Option<MediaEntry>>>,
}

impl VideoBrowserController {
    pub fn new(media: Rc<dyn MediaDirectory>) -> Self {
        Self {
            media,
            path: String::new(),
            entries: Vec::new(),
            selected: 0,
            columns: 4,
            sheet: Rc::new(RefCell::new(None)),
        }
    }

    fn reload(&mut self) {
        self.entries = match self.media.list_entries(&self.path) {
            Ok(mut entries) => {
                // display order holds even if the provider returned unsorted
                crate::platform::sort_entries(&mut entries);
                entries
            }
            Err(err) => {
                log::error!("cannot list media at '{}': {err:#}", self.path);
                Vec::new()
            }
        };
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }

    fn select_cell(&mut self, index: usize) {
        if !self.entries.is_empty() {
            self.selected = index.min(self.entries.len() - 1);
        }
    }

    /// Open the sheet overlay for an entry and capture all keys until it is
    /// dismissed.
    fn open_sheet(&mut self, entry: MediaEntry, sink: &mut CommandSink) {
        let locator = entry.locator.clone();
        *self.sheet.borrow_mut() = Some(entry);

        let sheet = self.sheet.clone();
        sink.queue(Command::capture_keys(Box::new(move |key, sink| {
            match key {
                Key::Enter | Key::PlayPause | Key::Play => {
                    sheet.borrow_mut().take();
                    sink.queue(Command::PopKeyHandler);
                    sink.queue(Command::post(commands::start_video(&locator)));
                }
                Key::Back => {
                    sheet.borrow_mut().take();
                    sink.queue(Command::PopKeyHandler);
                    sink.queue(Command::WaitIndicator(false));
                }
                _ => {}
            }
            // the overlay swallows everything, including unknown keys
            false
        })));
    }

    fn activate_selected(&mut self, sink: &mut CommandSink) {
        let Some(entry) = self.entries.get(self.selected).cloned() else {
            return;
        };
        match entry.kind {
            MediaKind::Folder => {
                sink.queue(Command::push_view_with(
                    VIDEO_BROWSER_VIEW_NAME,
                    BrowserViewState::new(entry.locator),
                ));
            }
            // no sheet artwork means nothing to preview: play immediately
            MediaKind::File if entry.sheet_ref.is_none() => {
                sink.queue(Command::post(commands::start_video(&entry.locator)));
            }
            MediaKind::File => self.open_sheet(entry, sink),
        }
    }

    fn start_selected(&mut self, sink: &mut CommandSink) {
        if let Some(entry) = self.entries.get(self.selected) {
            if entry.kind == MediaKind::File {
                sink.queue(Command::post(commands::start_video(&entry.locator)));
            }
        }
    }
}

impl ViewController for VideoBrowserController {
    fn begin(&mut self, data: Option<ViewData>) {
        if let Some(state) = data.and_then(|d| d.downcast::<BrowserViewState>().ok()) {
            self.path = state.path;
            self.selected = state.selected_index;
        } else {
            self.path.clear();
            self.selected = 0;
        }
        self.sheet.borrow_mut().take();
        self.reload();
    }

    fn end(&mut self) -> Option<ViewData> {
        Some(Box::new(BrowserViewState {
            path: self.path.clone(),
            selected_index: self.selected,
        }))
    }

    fn on_key(&mut self, key: Key, sink: &mut CommandSink) -> bool {
        let columns = self.columns.max(1);
        match key {
            Key::Left => {
                self.select_cell(self.selected.saturating_sub(1));
                false
            }
            Key::Right => {
                self.select_cell(self.selected + 1);
                false
            }
            Key::Up => {
                self.select_cell(self.selected.saturating_sub(columns));
                false
            }
            Key::Down => {
                // stay on the last row instead of clamping into its final cell
                if self.selected + columns < self.entries.len() {
                    self.selected += columns;
                }
                false
            }
            Key::Previous => {
                self.select_cell(0);
                false
            }
            Key::Next => {
                self.select_cell(self.entries.len().saturating_sub(1));
                false
            }
            Key::Enter => {
                self.activate_selected(sink);
                false
            }
            Key::PlayPause | Key::Play => {
                self.start_selected(sink);
                false
            }
            _ => true,
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(if self.path.is_empty() {
                "Videos".to_string()
            } else {
                format!("Videos: {}", self.path)
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        const CELL_WIDTH: u16 = 24;
        self.columns = (inner.width / CELL_WIDTH).max(1) as usize;

        let lines: Vec<Line> = self
            .entries
            .chunks(self.columns)
            .enumerate()
            .map(|(row, chunk)| {
                let mut spans = Vec::new();
                for (col, entry) in chunk.iter().enumerate() {
                    let index = row * self.columns + col;
                    let marker = match entry.kind {
                        MediaKind::Folder => "▸ ",
                        MediaKind::File => "  ",
                    };
                    let text = format!("{marker}{:<width$}", entry.title, width = 22);
                    let style = if index == self.selected {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    spans.push(ratatui::text::Span::styled(text, style));
                }
                Line::from(spans)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if let Some(entry) = self.sheet.borrow().as_ref() {
            draw_sheet_overlay(frame, area, entry);
        }
    }
}

fn draw_sheet_overlay(frame: &mut Frame<'_>, area: Rect, entry: &MediaEntry) {
    let [overlay] = Layout::horizontal([Constraint::Percentage(70)])
        .flex(Flex::Center)
        .areas(area);
    let [overlay] = Layout::vertical([Constraint::Percentage(70)])
        .flex(Flex::Center)
        .areas(overlay);

    frame.render_widget(Clear, overlay);

    let mut lines = vec![Line::from(entry.locator.clone())];
    if let Some(sheet) = &entry.sheet_ref {
        lines.push(Line::from(format!("sheet: {sheet}")));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Enter/Play: start   Back: close"));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(entry.title.clone()),
            ),
        overlay,
    );
}
