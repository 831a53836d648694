//! The terminal shell: owns the singletons (view stack, key stack, event
//! bus), runs the frame loop, and applies queued navigation effects.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::{Frame, Terminal};
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::command::{Command, CommandSink};
use super::event::EventBus;
use super::keys::{Key, KeyFilter, KeyStack};
use super::menu::{MENU_VIEW_NAME, MenuId, MenuViewState};
use super::stack::ViewStack;
use crate::locale::Localization;
use crate::platform::Platform;

const FRAME_BUDGET: Duration = Duration::from_millis(16);

/// Application shell wiring input, navigation and rendering together.
pub struct Shell {
    keys: KeyStack,
    views: ViewStack,
    bus: EventBus,
    platform: Platform,
    i18n: Rc<RefCell<Localization>>,
    sink: CommandSink,
    should_quit: bool,
}

impl Shell {
    pub fn new(
        views: ViewStack,
        bus: EventBus,
        platform: Platform,
        i18n: Rc<RefCell<Localization>>,
    ) -> Self {
        let mut keys = KeyStack::new();

        // global fallbacks, installed below any view handler and never
        // popped: Back pops a view unless overridden, Power quits
        keys.push(
            Box::new(|_, sink| {
                sink.queue(Command::PopView);
                false
            }),
            KeyFilter::Key(Key::Back),
        );
        keys.push(
            Box::new(|_, sink| {
                sink.queue(Command::Quit);
                false
            }),
            KeyFilter::Key(Key::Power),
        );

        Self {
            keys,
            views,
            bus,
            platform,
            i18n,
            sink: CommandSink::new(),
            should_quit: false,
        }
    }

    /// Queue a command to run once the shell loop drains effects.
    pub fn queue(&mut self, command: Command) {
        self.sink.queue(command);
    }

    /// Show a menu as the first screen.
    pub fn show_menu(&mut self, menu: MenuId) {
        self.queue(Command::ShowMenu(menu));
    }

    /// Run the shell until a quit is requested.
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            let frame_start = Instant::now();

            // process all pending input first for minimal latency
            while event::poll(Duration::ZERO)? {
                if let TermEvent::Key(raw) = event::read()? {
                    if raw.kind == KeyEventKind::Press {
                        let key = self.platform.keymap.map_key(&raw);
                        log::debug!("recognized key: {key:?}");
                        self.keys.dispatch(key, &mut self.sink);
                    }
                }
            }

            self.drain_commands().await;
            if self.should_quit {
                return Ok(());
            }

            terminal.draw(|frame| {
                let area = frame.area();
                self.views.render(frame, area);
                if self.views.wait_indicator_visible() {
                    let label = self.i18n.borrow().translate("Please wait...");
                    draw_wait_indicator(frame, area, &label);
                }
            })?;

            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_BUDGET {
                tokio::time::sleep(FRAME_BUDGET - elapsed).await;
            }
        }
    }

    /// Apply queued effects in order. Dispatch failures are local and
    /// recoverable: they are logged, never fatal to the loop.
    pub async fn drain_commands(&mut self) {
        while let Some(command) = self.sink.take_next() {
            match command {
                Command::PushView { name, data } => {
                    if let Err(err) = self.views.push_view(&mut self.keys, &name, data).await {
                        log::error!("failed to push view {name}: {err:#}");
                    }
                }
                Command::PopView => {
                    if let Err(err) = self.views.pop_view(&mut self.keys) {
                        log::error!("failed to pop view: {err:#}");
                    }
                }
                Command::ShowMenu(menu) => {
                    let state = MenuViewState {
                        menu,
                        selected_index: 0,
                    };
                    if let Err(err) = self
                        .views
                        .push_view(&mut self.keys, MENU_VIEW_NAME, Some(Box::new(state)))
                        .await
                    {
                        log::error!("failed to show menu: {err:#}");
                    }
                }
                Command::Post(event) => {
                    self.bus.publish(&event, &mut self.sink);
                }
                Command::PushKeyHandler { handler, filter } => {
                    self.keys.push(handler, filter);
                }
                Command::PopKeyHandler => {
                    self.keys.pop();
                }
                Command::WaitIndicator(show) => {
                    self.views.wait_indicator(show);
                }
                Command::Quit => {
                    self.should_quit = true;
                }
            }
        }
    }

    pub fn views(&self) -> &ViewStack {
        &self.views
    }

    pub fn keys(&self) -> &KeyStack {
        &self.keys
    }

    /// Feed one symbolic key through the dispatch stack, as the loop does.
    pub fn dispatch_key(&mut self, key: Key) -> bool {
        self.keys.dispatch(key, &mut self.sink)
    }

    pub fn quit_requested(&self) -> bool {
        self.should_quit
    }
}

fn draw_wait_indicator(frame: &mut Frame<'_>, area: Rect, label: &str) {
    let [popup] = Layout::horizontal([Constraint::Length(label.len() as u16 + 6)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(3)])
        .flex(Flex::Center)
        .areas(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(label)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}
