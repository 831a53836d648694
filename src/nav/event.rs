//! Event and command bus.
//!
//! Events are plain `{type, params}` records. Commands are events too, with
//! their type prefixed so command names can never clash with notification
//! names; the bus treats both uniformly. Listeners are called in subscription
//! order and the first one returning `true` ends delivery.

use serde_json::Value;

use super::command::CommandSink;

/// Prefix applied to all command event types.
pub const COMMAND_PREFIX: &str = "Command.";

/// An immutable typed event with an arbitrary JSON parameter map.
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    params: Value,
}

impl Event {
    /// Create a plain notification event.
    pub fn new(event_type: impl Into<String>, params: Value) -> Self {
        Self {
            event_type: event_type.into(),
            params,
        }
    }

    /// Create a command. The type is namespaced with [`COMMAND_PREFIX`] so
    /// commands and notifications cannot collide.
    pub fn command(event_type: impl Into<String>, params: Value) -> Self {
        Self {
            event_type: format!("{COMMAND_PREFIX}{}", event_type.into()),
            params,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Look up a single parameter by key.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

/// Predefined command constructors.
pub mod commands {
    use serde_json::json;

    use super::Event;

    pub const BROWSE_VIDEOS_AT_FILE_URL: &str = "Command.BrowseVideosAtFileUrl";
    pub const START_VIDEO: &str = "Command.StartVideo";

    /// Post this command to open a video browser at the given url.
    pub fn browse_videos_at_file_url(url: &str) -> Event {
        Event::command("BrowseVideosAtFileUrl", json!({ "url": url }))
    }

    /// Post this command to start playing the video at the given url.
    pub fn start_video(url: &str) -> Event {
        Event::command("StartVideo", json!({ "url": url }))
    }
}

/// Handle returned from `subscribe`, used to remove exactly that registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener callback. Returns `true` when it handled the event, which stops
/// further delivery. Side effects are requested through the sink rather than
/// performed inline.
pub type EventListener = Box<dyn FnMut(&Event, &mut CommandSink) -> bool>;

struct ListenerEntry {
    id: ListenerId,
    event_type: Option<String>,
    handler: EventListener,
}

/// Ordered delivery of events to type-filtered listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<ListenerEntry>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every event, regardless of type.
    pub fn subscribe(&mut self, handler: EventListener) -> ListenerId {
        self.add(None, handler)
    }

    /// Subscribe to a single event type.
    pub fn subscribe_to(
        &mut self,
        event_type: impl Into<String>,
        handler: EventListener,
    ) -> ListenerId {
        self.add(Some(event_type.into()), handler)
    }

    fn add(&mut self, event_type: Option<String>, handler: EventListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(ListenerEntry {
            id,
            event_type,
            handler,
        });
        id
    }

    /// Remove the registration created by `subscribe`/`subscribe_to`.
    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|l| l.id != id);
    }

    /// Deliver an event to matching listeners in subscription order.
    ///
    /// Returns `true` if some listener handled the event. An unhandled event
    /// is not an error; it is only logged.
    pub fn publish(&mut self, event: &Event, sink: &mut CommandSink) -> bool {
        for listener in &mut self.listeners {
            let matches = listener
                .event_type
                .as_deref()
                .is_none_or(|t| t == event.event_type());
            if matches && (listener.handler)(event, sink) {
                return true;
            }
        }
        log::debug!("event was not handled: {}", event.event_type());
        false
    }
}
