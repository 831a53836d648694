//! View controllers and view naming.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ratatui::Frame;
use ratatui::layout::Rect;
use thiserror::Error;

use super::command::{CommandSink, ViewData};
use super::keys::Key;

/// Navigation failure taxonomy. Ordinary "nothing to do" conditions (popping
/// the root, empty menus, unhandled events) are defined no-ops and never
/// appear here.
#[derive(Debug, Error)]
pub enum NavError {
    /// Programming error: a view name that is neither `View` nor
    /// `Module.View`. Fails fast at resolution time.
    #[error("illegal view name '{0}': use format \"ViewName\" or \"ModuleName.ViewName\"")]
    IllegalViewName(String),

    /// No factory registered under this name.
    #[error("no view registered under '{0}'")]
    UnknownView(String),

    /// The view's resources failed to load; the push has been rolled back
    /// and the previous view restored. The caller decides whether to retry.
    #[error("loading resources for view '{name}' failed")]
    ViewLoadFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A push or pop was attempted while another transition is in flight.
    #[error("a view transition is already in progress")]
    TransitionInProgress,
}

/// A view's controller: the begin/end lifecycle, its key handler, and its
/// rendering. One controller instance exists per distinct view name and is
/// reused across visits; the begin/end data blob carries per-visit state.
pub trait ViewController {
    /// The view became top of the stack. `data` is the blob supplied on the
    /// first push, or whatever the view's own `end` returned last time.
    fn begin(&mut self, data: Option<ViewData>);

    /// The view is losing the screen. The returned blob is stored on the
    /// view's stack entry and handed back on the next `begin`. Keep it
    /// small; one blob is retained per pushed entry.
    fn end(&mut self) -> Option<ViewData>;

    /// Key handler while this view is active. `false` consumes the key.
    /// The default passes everything through, which still occupies a key
    /// stack slot so push/pop counts stay balanced.
    fn on_key(&mut self, key: Key, sink: &mut CommandSink) -> bool {
        let _ = (key, sink);
        true
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect);
}

/// A parsed view name: either a core view (`"MenuView"`) or a module view
/// (`"Movies.VideoBrowser"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewName {
    module: Option<String>,
    view: String,
}

impl ViewName {
    pub fn parse(name: &str) -> Result<Self, NavError> {
        let parts: Vec<&str> = name.split('.').collect();
        match parts.as_slice() {
            [view] if !view.is_empty() => Ok(Self {
                module: None,
                view: (*view).to_string(),
            }),
            [module, view] if !module.is_empty() && !view.is_empty() => Ok(Self {
                module: Some((*module).to_string()),
                view: (*view).to_string(),
            }),
            _ => Err(NavError::IllegalViewName(name.to_string())),
        }
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    /// The registry key, `"View"` or `"Module.View"`.
    pub fn canonical(&self) -> String {
        match &self.module {
            Some(module) => format!("{module}.{}", self.view),
            None => self.view.clone(),
        }
    }

    /// Where this view's on-disk resources live: core views under
    /// `views/<View>`, module views under `modules/<Module>/views/<View>`.
    pub fn base_dir(&self, assets_root: &Path) -> PathBuf {
        match &self.module {
            Some(module) => assets_root
                .join("modules")
                .join(module)
                .join("views")
                .join(&self.view),
            None => assets_root.join("views").join(&self.view),
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(module) = &self.module {
            write!(f, "{module}.")?;
        }
        write!(f, "{}", self.view)
    }
}

/// Loader for a view's resources (localization dictionaries and the like),
/// run once per distinct view name before the first begin transition. The
/// load may suspend the logical flow; the view stack guarantees no other
/// transition interleaves until it completes.
#[async_trait(?Send)]
pub trait ViewResources {
    async fn load(&self, view: &ViewName) -> anyhow::Result<()>;
}

/// Resource loader with nothing to do, for views bundled entirely in code.
pub struct NoResources;

#[async_trait(?Send)]
impl ViewResources for NoResources {
    async fn load(&self, _view: &ViewName) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_core_and_module_names() {
        let core = ViewName::parse("MenuView").unwrap();
        assert_eq!(core.module(), None);
        assert_eq!(core.canonical(), "MenuView");

        let module = ViewName::parse("Movies.VideoBrowser").unwrap();
        assert_eq!(module.module(), Some("Movies"));
        assert_eq!(module.view(), "VideoBrowser");
        assert_eq!(module.canonical(), "Movies.VideoBrowser");
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(matches!(
            ViewName::parse("a.b.c"),
            Err(NavError::IllegalViewName(_))
        ));
        assert!(matches!(
            ViewName::parse(""),
            Err(NavError::IllegalViewName(_))
        ));
        assert!(matches!(
            ViewName::parse("Movies."),
            Err(NavError::IllegalViewName(_))
        ));
    }

    #[test]
    fn base_dir_follows_naming_strategy() {
        let root = Path::new("/assets");
        let core = ViewName::parse("MenuView").unwrap();
        assert_eq!(core.base_dir(root), Path::new("/assets/views/MenuView"));

        let module = ViewName::parse("Movies.VideoBrowser").unwrap();
        assert_eq!(
            module.base_dir(root),
            Path::new("/assets/modules/Movies/views/VideoBrowser")
        );
    }
}
