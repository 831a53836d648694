//! The menu hierarchy.
//!
//! Menus and entries live in an arena owned by [`MenuModel`] and are
//! addressed by ids; an entry's parent back-reference is a plain id that is
//! set exactly once, when the entry is appended, and is never used for
//! ownership. Cycles in the menu graph are legal: every traversal pushes an
//! independent menu-view entry, so Back unwinds one level per press.

use super::command::{Command, CommandSink};

/// Canonical name of the view that renders menus.
pub const MENU_VIEW_NAME: &str = "MenuView";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

/// Outcome of an entry's action handler. `Veto` aborts a pending navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Proceed,
    Veto,
}

/// What [`MenuModel::activate_entry`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A navigation to the entry's next menu was requested.
    Navigated,
    /// Nothing happened: the action vetoed, or the entry has no next menu.
    NoNavigation,
}

/// Side-effecting handler run when an entry is activated, before any
/// navigation to its next menu.
pub type MenuAction = Box<dyn Fn(&mut CommandSink) -> ActionResult>;

/// Begin/end state blob of the menu view: which menu, which selection.
#[derive(Debug, Clone, Copy)]
pub struct MenuViewState {
    pub menu: MenuId,
    pub selected_index: usize,
}

struct MenuNode {
    title: String,
    icon: Option<String>,
    items: Vec<EntryId>,
}

struct EntryNode {
    title: String,
    parent: Option<MenuId>,
    next_menu: Option<MenuId>,
    action: Option<MenuAction>,
    icon: Option<String>,
}

/// A menu entry under construction, appended with
/// [`MenuModel::append_entry`].
pub struct MenuEntry {
    title: String,
    next_menu: Option<MenuId>,
    action: Option<MenuAction>,
    icon: Option<String>,
}

impl MenuEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            next_menu: None,
            action: None,
            icon: None,
        }
    }

    /// Navigate to this menu when the entry is activated.
    pub fn next_menu(mut self, menu: MenuId) -> Self {
        self.next_menu = Some(menu);
        self
    }

    /// Run this handler on activation. It is always called before any
    /// navigation and can veto it by returning [`ActionResult::Veto`].
    pub fn action(mut self, action: impl Fn(&mut CommandSink) -> ActionResult + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Arena of all menus and entries, built once at startup.
pub struct MenuModel {
    menus: Vec<MenuNode>,
    entries: Vec<EntryNode>,
    main_menu: MenuId,
}

impl MenuModel {
    /// Create the model with an empty main menu of the given title.
    pub fn new(main_title: impl Into<String>) -> Self {
        let mut model = Self {
            menus: Vec::new(),
            entries: Vec::new(),
            main_menu: MenuId(0),
        };
        model.main_menu = model.create_menu(main_title, None);
        model
    }

    /// The root of the hierarchy; modules append their entries here.
    pub fn main_menu(&self) -> MenuId {
        self.main_menu
    }

    pub fn create_menu(&mut self, title: impl Into<String>, icon: Option<String>) -> MenuId {
        let id = MenuId(self.menus.len());
        self.menus.push(MenuNode {
            title: title.into(),
            icon,
            items: Vec::new(),
        });
        id
    }

    /// Append an entry to a menu. Order is significant: it is the on-screen
    /// and navigation order. The entry's parent back-reference is set here,
    /// exactly once.
    pub fn append_entry(&mut self, menu: MenuId, entry: MenuEntry) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(EntryNode {
            title: entry.title,
            parent: Some(menu),
            next_menu: entry.next_menu,
            action: entry.action,
            icon: entry.icon,
        });
        self.menus[menu.0].items.push(id);
        id
    }

    pub fn menu_title(&self, menu: MenuId) -> &str {
        &self.menus[menu.0].title
    }

    pub fn menu_icon(&self, menu: MenuId) -> Option<&str> {
        self.menus[menu.0].icon.as_deref()
    }

    /// Entries of a menu in display order.
    pub fn items(&self, menu: MenuId) -> &[EntryId] {
        &self.menus[menu.0].items
    }

    pub fn entry_title(&self, entry: EntryId) -> &str {
        &self.entries[entry.0].title
    }

    pub fn entry_icon(&self, entry: EntryId) -> Option<&str> {
        self.entries[entry.0].icon.as_deref()
    }

    pub fn parent_of(&self, entry: EntryId) -> Option<MenuId> {
        self.entries[entry.0].parent
    }

    pub fn next_menu_of(&self, entry: EntryId) -> Option<MenuId> {
        self.entries[entry.0].next_menu
    }

    /// Queue a request to display a menu. Normally only used for the main
    /// menu at startup; after that [`MenuModel::activate_entry`] takes over.
    pub fn show_menu(&self, menu: MenuId, sink: &mut CommandSink) {
        sink.queue(Command::push_view_with(
            MENU_VIEW_NAME,
            MenuViewState {
                menu,
                selected_index: 0,
            },
        ));
    }

    /// Activate an entry: run its action first (which may veto), then
    /// navigate to its next menu if it has one. An entry with neither action
    /// nor next menu is a defined no-op, not an error.
    pub fn activate_entry(&self, entry: EntryId, sink: &mut CommandSink) -> Activation {
        let node = &self.entries[entry.0];
        if let Some(action) = &node.action {
            if action(sink) == ActionResult::Veto {
                log::debug!("menu entry '{}' vetoed activation", node.title);
                return Activation::NoNavigation;
            }
        }

        match node.next_menu {
            None => Activation::NoNavigation,
            Some(next) => {
                self.show_menu(next, sink);
                Activation::Navigated
            }
        }
    }
}
