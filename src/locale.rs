//! Localization.
//!
//! Dictionaries are JSON files named `<locale>.json` holding a single map of
//! key/value pairs. Loading several dictionaries for one locale builds a
//! union; later entries may overwrite earlier ones. Untranslated strings
//! fall back to themselves, so a missing dictionary only costs translations,
//! never functionality.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::nav::view::{ViewName, ViewResources};

pub struct Localization {
    active_locale: String,
    /// locale -> (key -> translation)
    dictionary: HashMap<String, HashMap<String, String>>,
}

impl Localization {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            active_locale: locale.into(),
            dictionary: HashMap::new(),
        }
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.active_locale = locale.into();
    }

    pub fn locale(&self) -> &str {
        &self.active_locale
    }

    /// Merge the dictionary for the active locale from `dir/<locale>.json`.
    /// A missing or malformed file is logged and skipped.
    pub fn load_dictionary(&mut self, dir: &Path) {
        let path = dir.join(format!("{}.json", self.active_locale));
        let Ok(raw) = std::fs::read_to_string(&path) else {
            log::debug!("no translation file at {}", path.display());
            return;
        };
        self.merge_dictionary(&path, &raw);
    }

    /// Async variant used while loading view resources.
    pub async fn load_dictionary_async(&mut self, dir: &Path) {
        let path = dir.join(format!("{}.json", self.active_locale));
        let Ok(raw) = tokio::fs::read_to_string(&path).await else {
            log::debug!("no translation file at {}", path.display());
            return;
        };
        self.merge_dictionary(&path, &raw);
    }

    fn merge_dictionary(&mut self, path: &Path, raw: &str) {
        log::debug!("loading translation {}", path.display());
        let parsed: HashMap<String, String> = match serde_json::from_str(raw) {
            Ok(map) => map,
            Err(err) => {
                log::error!("bad translation file {}: {err}", path.display());
                return;
            }
        };
        self.dictionary
            .entry(self.active_locale.clone())
            .or_default()
            .extend(parsed);
    }

    /// Translate a string for the active locale, falling back to the input.
    pub fn translate(&self, key: &str) -> String {
        self.dictionary
            .get(&self.active_locale)
            .and_then(|dict| dict.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Loads a view's localization dictionary from its asset directory. A short
/// settle delay follows every first load so the screen does not flicker
/// through a half-initialized layout.
pub struct DictionaryResources {
    assets_root: PathBuf,
    i18n: Rc<RefCell<Localization>>,
    settle_delay: Duration,
}

impl DictionaryResources {
    pub fn new(assets_root: PathBuf, i18n: Rc<RefCell<Localization>>) -> Self {
        Self {
            assets_root,
            i18n,
            settle_delay: Duration::from_millis(50),
        }
    }
}

#[async_trait(?Send)]
impl ViewResources for DictionaryResources {
    async fn load(&self, view: &ViewName) -> anyhow::Result<()> {
        let locale_dir = view.base_dir(&self.assets_root).join("locale");
        self.i18n
            .borrow_mut()
            .load_dictionary_async(&locale_dir)
            .await;
        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }
}
