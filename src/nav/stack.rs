//! The view lifecycle stack.
//!
//! All views are organized in a stack onto which new views are pushed and
//! later popped, giving the flow through multiple screens that a remote
//! controlled device needs. A view receives a begin transition when it
//! becomes top of the stack (pushed, or everything above it popped) and an
//! end transition when it loses the top spot; the blob returned by `end` is
//! stored on the view's stack entry and handed back on the next `begin`, so
//! views restore their internal state (selection, scroll position) without
//! re-deriving it.
//!
//! The stack also installs a key handler for the active view and removes it
//! when the view ends, keeping the key stack and view stack in lockstep.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::Rect;

use super::command::ViewData;
use super::keys::{KeyFilter, KeyStack};
use super::view::{NavError, ViewController, ViewName, ViewResources};

/// Factory producing the controller for one view name, run once on the
/// first visit.
pub type ViewFactory = Box<dyn Fn() -> Rc<RefCell<dyn ViewController>>>;

/// Explicit mapping from view names to controller factories, filled at the
/// composition point. Resolution never falls back to anything dynamic: an
/// unregistered name is an error.
#[derive(Default)]
pub struct ViewRegistry {
    factories: HashMap<String, ViewFactory>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), NavError>
    where
        F: Fn() -> Rc<RefCell<dyn ViewController>> + 'static,
    {
        let name = ViewName::parse(name)?;
        self.factories.insert(name.canonical(), Box::new(factory));
        Ok(())
    }

    fn contains(&self, canonical: &str) -> bool {
        self.factories.contains_key(canonical)
    }

    fn get(&self, canonical: &str) -> Option<&ViewFactory> {
        self.factories.get(canonical)
    }
}

struct ViewStackEntry {
    name: ViewName,
    data: Option<ViewData>,
}

/// The stack of active and suspended views.
pub struct ViewStack {
    entries: Vec<ViewStackEntry>,
    registry: ViewRegistry,
    /// Controllers instantiated so far, one per distinct view name, kept for
    /// the process lifetime.
    cache: HashMap<String, Rc<RefCell<dyn ViewController>>>,
    resources: Box<dyn ViewResources>,
    /// Single in-flight-transition guard: no second push/pop may begin while
    /// a resource load is outstanding.
    transitioning: bool,
    wait_visible: bool,
}

impl ViewStack {
    pub fn new(registry: ViewRegistry, resources: Box<dyn ViewResources>) -> Self {
        Self {
            entries: Vec::new(),
            registry,
            cache: HashMap::new(),
            resources,
            transitioning: false,
            wait_visible: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the currently displayed view.
    pub fn current_view(&self) -> Option<&ViewName> {
        self.entries.last().map(|e| &e.name)
    }

    /// Push a view, making it the displayed one. The previous view's state
    /// is retained and restored when this view is popped again.
    ///
    /// On a resource-load failure the push is rolled back: the fresh entry
    /// is removed, the previous view is re-begun with its stored state, and
    /// [`NavError::ViewLoadFailed`] is returned for the caller to decide on
    /// retry or an error screen.
    pub async fn push_view(
        &mut self,
        keys: &mut KeyStack,
        name: &str,
        data: Option<ViewData>,
    ) -> Result<(), NavError> {
        if self.transitioning {
            return Err(NavError::TransitionInProgress);
        }

        let name = ViewName::parse(name)?;
        let canonical = name.canonical();
        if !self.cache.contains_key(&canonical) && !self.registry.contains(&canonical) {
            return Err(NavError::UnknownView(canonical));
        }

        self.transitioning = true;
        let result = self.push_view_inner(keys, name, data).await;
        self.transitioning = false;
        result
    }

    async fn push_view_inner(
        &mut self,
        keys: &mut KeyStack,
        name: ViewName,
        data: Option<ViewData>,
    ) -> Result<(), NavError> {
        log::info!("pushing view {name}");

        self.end_current(keys);
        self.entries.push(ViewStackEntry {
            name: name.clone(),
            data,
        });

        let canonical = name.canonical();
        if !self.cache.contains_key(&canonical) {
            if let Err(source) = self.resources.load(&name).await {
                // roll back the push and restore the previous view
                self.entries.pop();
                self.begin_top(keys);
                return Err(NavError::ViewLoadFailed {
                    name: canonical,
                    source,
                });
            }
            if let Some(factory) = self.registry.get(&canonical) {
                self.cache.insert(canonical, factory());
            }
        }

        self.begin_top(keys);
        Ok(())
    }

    /// Pop the displayed view and restore the one below it to its previous
    /// state. Popping the root view is a defined no-op: the stack never
    /// drops below one entry.
    pub fn pop_view(&mut self, keys: &mut KeyStack) -> Result<(), NavError> {
        if self.entries.len() <= 1 {
            return Ok(());
        }
        if self.transitioning {
            return Err(NavError::TransitionInProgress);
        }

        self.end_current(keys);
        if let Some(popped) = self.entries.pop() {
            log::info!("popping view {}", popped.name);
        }
        self.begin_top(keys);

        // hide the wait indicator, in case the view forgot
        self.wait_indicator(false);
        Ok(())
    }

    /// Show or hide the global wait indicator. Not re-entrant-counted; the
    /// last caller wins.
    pub fn wait_indicator(&mut self, show: bool) {
        self.wait_visible = show;
    }

    pub fn wait_indicator_visible(&self) -> bool {
        self.wait_visible
    }

    /// Render the displayed view.
    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let Some(entry) = self.entries.last() else {
            return;
        };
        if let Some(controller) = self.cache.get(&entry.name.canonical()) {
            controller.borrow_mut().render(frame, area);
        }
    }

    /// End the current top view: pop the key handler installed for it and
    /// store its end-transition blob on its stack entry.
    fn end_current(&mut self, keys: &mut KeyStack) {
        let Some(entry) = self.entries.last_mut() else {
            return;
        };
        keys.pop();
        if let Some(controller) = self.cache.get(&entry.name.canonical()) {
            entry.data = controller.borrow_mut().end();
        }
    }

    /// Begin the current top view: install its key handler, then run its
    /// begin transition with the stored (or initially supplied) data.
    fn begin_top(&mut self, keys: &mut KeyStack) {
        let Some(entry) = self.entries.last_mut() else {
            return;
        };
        let Some(controller) = self.cache.get(&entry.name.canonical()).cloned() else {
            log::error!("no controller cached for view {}", entry.name);
            // still occupy a key stack slot so push/pop counts stay paired
            keys.push(Box::new(|_, _| true), KeyFilter::Any);
            return;
        };

        let data = entry.data.take();
        let handler = controller.clone();
        keys.push(
            Box::new(move |key, sink| handler.borrow_mut().on_key(key, sink)),
            KeyFilter::Any,
        );
        controller.borrow_mut().begin(data);
    }
}
