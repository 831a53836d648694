//! The menu view: renders one menu and turns directional keys into menu
//! traversal.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::locale::Localization;
use crate::nav::command::{CommandSink, ViewData};
use crate::nav::keys::Key;
use crate::nav::menu::{MenuId, MenuModel, MenuViewState};
use crate::nav::view::ViewController;

pub struct MenuViewController {
    menus: Rc<MenuModel>,
    i18n: Rc<RefCell<Localization>>,
    current: MenuId,
    selected: usize,
}

impl MenuViewController {
    pub fn new(menus: Rc<MenuModel>, i18n: Rc<RefCell<Localization>>) -> Self {
        let main = menus.main_menu();
        Self {
            menus,
            i18n,
            current: main,
            selected: 0,
        }
    }

    fn item_count(&self) -> usize {
        self.menus.items(self.current).len()
    }

    /// Move the selection cursor, clamped to the sibling range. No
    /// wraparound.
    fn select_item_at(&mut self, index: usize) {
        let count = self.item_count();
        if count == 0 {
            self.selected = 0;
        } else {
            self.selected = index.min(count - 1);
        }
    }

    fn activate_selected(&mut self, sink: &mut CommandSink) {
        let items = self.menus.items(self.current);
        if let Some(entry) = items.get(self.selected) {
            self.menus.activate_entry(*entry, sink);
        }
    }
}

impl ViewController for MenuViewController {
    fn begin(&mut self, data: Option<ViewData>) {
        let state = data
            .and_then(|d| d.downcast::<MenuViewState>().ok())
            .map(|s| *s);
        match state {
            Some(state) => {
                self.current = state.menu;
                self.select_item_at(state.selected_index);
            }
            None => {
                self.current = self.menus.main_menu();
                self.selected = 0;
            }
        }
    }

    fn end(&mut self) -> Option<ViewData> {
        Some(Box::new(MenuViewState {
            menu: self.current,
            selected_index: self.selected,
        }))
    }

    fn on_key(&mut self, key: Key, sink: &mut CommandSink) -> bool {
        match key {
            Key::Up => {
                self.select_item_at(self.selected.saturating_sub(1));
                false
            }
            Key::Down => {
                self.select_item_at(self.selected + 1);
                false
            }
            Key::Previous => {
                self.select_item_at(0);
                false
            }
            Key::Next => {
                self.select_item_at(self.item_count().saturating_sub(1));
                false
            }
            Key::Enter => {
                self.activate_selected(sink);
                false
            }
            _ => true,
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let [list_area, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let items: Vec<ListItem> = self
            .menus
            .items(self.current)
            .iter()
            .map(|entry| {
                let mut spans = vec![Span::raw(self.menus.entry_title(*entry).to_string())];
                if self.menus.next_menu_of(*entry).is_some() {
                    spans.push(Span::styled(" ›", Style::default().add_modifier(Modifier::DIM)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(self.selected));
        }

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.menus.menu_title(self.current).to_string()),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("» ");
        frame.render_stateful_widget(list, list_area, &mut state);

        let hint = self.i18n.borrow().translate("Enter: select  Back: return");
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().add_modifier(Modifier::DIM)),
            footer,
        );
    }
}
