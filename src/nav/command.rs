//! Deferred navigation effects.
//!
//! Key handlers, menu actions and bus listeners run while the view and key
//! stacks are borrowed, so they never mutate them directly. Instead they
//! queue commands into a [`CommandSink`]; the shell drains the queue between
//! dispatches and applies each effect with the stacks free again.

use std::any::Any;
use std::collections::VecDeque;

use super::event::Event;
use super::keys::{KeyFilter, KeyHandler};
use super::menu::MenuId;

/// Opaque per-view state blob, passed to a view's begin transition and
/// returned from its end transition. Only the owning view knows what is
/// inside.
pub type ViewData = Box<dyn Any>;

/// An effect requested by a handler, executed by the shell.
pub enum Command {
    /// Push a view onto the view stack.
    PushView {
        name: String,
        data: Option<ViewData>,
    },

    /// Pop the current view (no-op on the root view).
    PopView,

    /// Push the menu view displaying the given menu.
    ShowMenu(MenuId),

    /// Publish an event on the event bus.
    Post(Event),

    /// Push an extra key handler, e.g. for a modal overlay that must capture
    /// all input.
    PushKeyHandler {
        handler: KeyHandler,
        filter: KeyFilter,
    },

    /// Pop the top key handler.
    PopKeyHandler,

    /// Show or hide the global wait indicator.
    WaitIndicator(bool),

    /// Quit the application.
    Quit,
}

impl Command {
    /// Push a view without begin data.
    pub fn push_view(name: impl Into<String>) -> Self {
        Command::PushView {
            name: name.into(),
            data: None,
        }
    }

    /// Push a view with a typed begin-data blob.
    pub fn push_view_with<T: Any>(name: impl Into<String>, data: T) -> Self {
        Command::PushView {
            name: name.into(),
            data: Some(Box::new(data)),
        }
    }

    pub fn post(event: Event) -> Self {
        Command::Post(event)
    }

    pub fn capture_keys(handler: KeyHandler) -> Self {
        Command::PushKeyHandler {
            handler,
            filter: KeyFilter::Any,
        }
    }
}

/// FIFO queue of pending commands.
#[derive(Default)]
pub struct CommandSink {
    queue: VecDeque<Command>,
}

impl CommandSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn take_next(&mut self) -> Option<Command> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
