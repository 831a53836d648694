//! The video view: fullscreen playback surface with a transport OSD that
//! fades out after a few seconds of inactivity.

use std::rc::Rc;
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::nav::command::{Command, CommandSink, ViewData};
use crate::nav::keys::Key;
use crate::nav::view::ViewController;
use crate::platform::{PlayMode, VideoControl};

pub const VIDEO_VIEW_NAME: &str = "VideoView";

const OSD_TIMEOUT: Duration = Duration::from_millis(5000);
const MAX_SPEED: u32 = 32;

pub struct VideoViewController {
    video: Rc<dyn VideoControl>,
    /// OSD stays visible until this deadline; `None` means hidden.
    osd_deadline: Option<Instant>,
}

impl VideoViewController {
    pub fn new(video: Rc<dyn VideoControl>) -> Self {
        Self {
            video,
            osd_deadline: None,
        }
    }

    fn show_osd(&mut self) {
        self.osd_deadline = Some(Instant::now() + OSD_TIMEOUT);
    }

    /// The OSD fades only during playback; while paused or stopped it stays
    /// up so the state is never invisible.
    fn osd_visible(&self) -> bool {
        match self.video.play_mode().0 {
            PlayMode::Paused | PlayMode::Stopped => true,
            PlayMode::Playing | PlayMode::FastForward | PlayMode::Reverse => self
                .osd_deadline
                .is_some_and(|deadline| Instant::now() < deadline),
        }
    }

    fn toggle_play_pause(&self) {
        match self.video.play_mode().0 {
            PlayMode::Playing | PlayMode::FastForward | PlayMode::Reverse => {
                self.video.pause();
            }
            PlayMode::Paused | PlayMode::Stopped => {
                self.video.play();
            }
        }
    }

    /// Step the scan speed: 2x on the first press, then doubled on each
    /// further press up to 32x. Pressing in the opposite direction restarts
    /// at 2x.
    fn cycle_speed(&self, mode: PlayMode) -> u32 {
        let (current_mode, speed) = self.video.play_mode();
        if current_mode == mode {
            (speed * 2).min(MAX_SPEED)
        } else {
            2
        }
    }
}

impl ViewController for VideoViewController {
    fn begin(&mut self, _data: Option<ViewData>) {
        self.show_osd();
    }

    fn end(&mut self) -> Option<ViewData> {
        self.osd_deadline = None;
        None
    }

    fn on_key(&mut self, key: Key, sink: &mut CommandSink) -> bool {
        match key {
            Key::PlayPause => self.toggle_play_pause(),
            Key::Play => {
                self.video.play();
            }
            Key::Pause => {
                self.video.pause();
            }
            Key::Stop => {
                self.video.stop();
                sink.queue(Command::PopView);
            }
            Key::FastForward => {
                self.video.fast_forward(self.cycle_speed(PlayMode::FastForward));
            }
            Key::Reverse => {
                self.video.reverse(self.cycle_speed(PlayMode::Reverse));
            }
            _ => return true,
        }
        self.show_osd();
        false
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Block::default(), area);
        if !self.osd_visible() {
            return;
        }

        let [_, osd] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(4)]).areas(area);

        let info = self.video.media_info();
        let title = info
            .as_ref()
            .map(|i| i.title.clone())
            .unwrap_or_else(|| "No media".to_string());
        let duration = info.map(|i| i.duration_seconds).unwrap_or(0.0);
        let position = self.video.position_seconds();
        let (mode, speed) = self.video.play_mode();

        let mode_label = match mode {
            PlayMode::Stopped => "■".to_string(),
            PlayMode::Playing => "▶".to_string(),
            PlayMode::Paused => "⏸".to_string(),
            PlayMode::FastForward => format!("▶▶ {speed}x"),
            PlayMode::Reverse => format!("◀◀ {speed}x"),
        };

        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(osd);
        frame.render_widget(block, osd);

        let [status, progress] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

        frame.render_widget(
            Paragraph::new(Line::from(format!(
                "{mode_label}  {} / {}",
                format_time(position),
                format_time(duration)
            )))
            .style(Style::default().add_modifier(Modifier::BOLD)),
            status,
        );

        let ratio = if duration > 0.0 {
            (position / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        frame.render_widget(Gauge::default().ratio(ratio).label(""), progress);
    }
}

fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}
