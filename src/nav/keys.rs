//! Layered key dispatch.
//!
//! Handlers form a stack; the most recently pushed handler sees a key first.
//! A handler returns `false` to consume the key and stop propagation, `true`
//! to pass it on to the next handler below. A base handler that passes
//! everything through sits at the bottom so dispatch always terminates
//! cleanly.

use super::command::CommandSink;

/// Symbolic keys a remote control (or its keyboard stand-in) can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Unknown,

    Stop,
    PlayPause,
    Play,
    Pause,
    FastForward,
    Reverse,
    Eject,

    Previous,
    Next,

    Up,
    Down,
    Left,
    Right,
    Enter,

    Home,
    Back,
    Option,
    Search,

    Power,
}

/// Handler callback. `false` consumes the key, `true` passes it down.
pub type KeyHandler = Box<dyn FnMut(Key, &mut CommandSink) -> bool>;

/// Optional per-handler filter. A non-matching filter means the handler is
/// skipped and dispatch continues below it.
pub enum KeyFilter {
    /// Matches every key.
    Any,
    /// Matches a single key.
    Key(Key),
    /// Arbitrary predicate.
    Predicate(Box<dyn Fn(Key) -> bool>),
}

impl KeyFilter {
    fn matches(&self, key: Key) -> bool {
        match self {
            KeyFilter::Any => true,
            KeyFilter::Key(k) => *k == key,
            KeyFilter::Predicate(pred) => pred(key),
        }
    }
}

struct HandlerEntry {
    handler: KeyHandler,
    filter: KeyFilter,
}

/// The LIFO stack of key handlers.
///
/// The stack does not enforce a floor beyond its own base handler; pairing
/// pushes and pops correctly is the caller's job (the view stack installs and
/// removes exactly one handler per view).
pub struct KeyStack {
    entries: Vec<HandlerEntry>,
}

impl KeyStack {
    pub fn new() -> Self {
        Self {
            entries: vec![HandlerEntry {
                // base handler: pass everything through
                handler: Box::new(|_, _| true),
                filter: KeyFilter::Any,
            }],
        }
    }

    pub fn push(&mut self, handler: KeyHandler, filter: KeyFilter) {
        self.entries.push(HandlerEntry { handler, filter });
    }

    pub fn pop(&mut self) {
        self.entries.pop();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walk handlers from top to bottom. Returns `true` if some handler
    /// consumed the key (callers then suppress any default handling).
    pub fn dispatch(&mut self, key: Key, sink: &mut CommandSink) -> bool {
        for entry in self.entries.iter_mut().rev() {
            if entry.filter.matches(key) && !(entry.handler)(key, sink) {
                return true;
            }
        }
        false
    }
}

impl Default for KeyStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn dispatch_walks_top_to_bottom_and_stops_at_false() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut stack = KeyStack::new();

        let c = calls.clone();
        stack.push(
            Box::new(move |_, _| {
                c.borrow_mut().push("bottom");
                true
            }),
            KeyFilter::Any,
        );
        let c = calls.clone();
        stack.push(
            Box::new(move |_, _| {
                c.borrow_mut().push("middle");
                false
            }),
            KeyFilter::Any,
        );
        let c = calls.clone();
        stack.push(
            Box::new(move |_, _| {
                c.borrow_mut().push("top");
                true
            }),
            KeyFilter::Any,
        );

        let mut sink = CommandSink::new();
        let consumed = stack.dispatch(Key::Enter, &mut sink);

        assert!(consumed);
        assert_eq!(*calls.borrow(), vec!["top", "middle"]);
    }

    #[test]
    fn non_matching_filter_skips_the_handler() {
        let hits = Rc::new(RefCell::new(0));
        let mut stack = KeyStack::new();

        let h = hits.clone();
        stack.push(
            Box::new(move |_, _| {
                *h.borrow_mut() += 1;
                false
            }),
            KeyFilter::Key(Key::Back),
        );

        let mut sink = CommandSink::new();
        assert!(!stack.dispatch(Key::Enter, &mut sink));
        assert!(stack.dispatch(Key::Back, &mut sink));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn predicate_filter() {
        let mut stack = KeyStack::new();
        stack.push(
            Box::new(|_, _| false),
            KeyFilter::Predicate(Box::new(|key| {
                matches!(key, Key::Play | Key::Pause | Key::PlayPause)
            })),
        );

        let mut sink = CommandSink::new();
        assert!(stack.dispatch(Key::Pause, &mut sink));
        assert!(!stack.dispatch(Key::Up, &mut sink));
    }

    #[test]
    fn unhandled_key_falls_through_base_handler() {
        let mut stack = KeyStack::new();
        let mut sink = CommandSink::new();
        assert!(!stack.dispatch(Key::Unknown, &mut sink));
    }
}
