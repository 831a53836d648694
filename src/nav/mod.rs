//! The navigation core: event bus, key dispatch stack, menu model, view
//! lifecycle stack and the shell loop driving them.

pub mod command;
pub mod event;
pub mod keys;
pub mod menu;
pub mod shell;
pub mod stack;
pub mod view;

pub use command::{Command, CommandSink, ViewData};
pub use event::{Event, EventBus, ListenerId};
pub use keys::{Key, KeyFilter, KeyHandler, KeyStack};
pub use menu::{
    ActionResult, Activation, EntryId, MENU_VIEW_NAME, MenuEntry, MenuId, MenuModel, MenuViewState,
};
pub use shell::Shell;
pub use stack::{ViewRegistry, ViewStack};
pub use view::{NavError, NoResources, ViewController, ViewName, ViewResources};
