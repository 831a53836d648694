//! Feature modules.
//!
//! A module groups views, menu entries and command listeners for one feature
//! area. Modules are set up once at startup, in registration order, against
//! a shared context; after setup the navigation core drives everything and
//! the module itself holds no state.

pub mod movies;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::locale::Localization;
use crate::nav::event::EventBus;
use crate::nav::menu::MenuModel;
use crate::nav::stack::ViewRegistry;
use crate::platform::Platform;

pub use movies::MoviesModule;

/// Everything a module may contribute to during setup.
pub struct ModuleContext<'a> {
    pub config: &'a Config,
    pub platform: &'a Platform,
    pub i18n: Rc<RefCell<Localization>>,
    pub menus: &'a mut MenuModel,
    pub registry: &'a mut ViewRegistry,
    pub bus: &'a mut EventBus,
}

impl ModuleContext<'_> {
    /// Asset directory of a module, `<assets root>/modules/<name>`.
    pub fn module_dir(&self, module: &str) -> PathBuf {
        self.config.assets_root.join("modules").join(module)
    }
}

pub trait Module {
    fn name(&self) -> &str;

    /// Register views, append menu entries and subscribe listeners. Runs
    /// exactly once, before the first view is shown.
    fn set_up(&self, ctx: &mut ModuleContext<'_>) -> Result<()>;
}

/// Runs module setup in registration order.
#[derive(Default)]
pub struct ModuleManager {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: Box<dyn Module>) {
        self.modules.push(module);
    }

    pub fn set_up_all(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        for module in &self.modules {
            log::info!("setting up module {}", module.name());
            module
                .set_up(ctx)
                .with_context(|| format!("setting up module {}", module.name()))?;
        }
        Ok(())
    }
}
