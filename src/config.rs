//! Application configuration, loaded from a TOML file with every field
//! optional and defaulted.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Platform whose interface implementations to install. Currently only
    /// `Desktop` exists.
    pub platform: String,

    /// Root path first shown in the video browser.
    pub media_search_path: String,

    /// Two-letter ISO locale for translations.
    pub locale: String,

    /// Directory holding locale dictionaries and per-view assets.
    pub assets_root: PathBuf,

    /// Patterns for artwork lookup. Available macros:
    /// `{path}` full path to folder or movie, `{dir}` parent directory,
    /// `{name}` file name without suffix, `{suffix}` suffix with the dot.
    pub folder_image_path_pattern: String,
    pub thumbnail_image_path_pattern: String,
    pub movie_sheet_image_path_pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            platform: "Desktop".to_string(),
            media_search_path: "/tmp/media".to_string(),
            locale: "en".to_string(),
            assets_root: PathBuf::from("assets"),
            folder_image_path_pattern: "{path}/folder.jpg".to_string(),
            thumbnail_image_path_pattern: "{dir}/_MovieSheets/{name}/thumb.jpg".to_string(),
            movie_sheet_image_path_pattern: "{dir}/_MovieSheets/{name}/sheet.jpg".to_string(),
        }
    }
}

impl Config {
    /// Load the config from an explicit path, or from the default location
    /// (`<config dir>/telecine/config.toml`). A missing file yields the
    /// defaults; a malformed file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match dirs::config_dir() {
                Some(dir) => dir.join("telecine").join("config.toml"),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// Expand an artwork path pattern for a media path.
pub fn expand_image_pattern(pattern: &str, media_path: &str) -> String {
    let path = Path::new(media_path);
    let dir = path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|s| format!(".{}", s.to_string_lossy()))
        .unwrap_or_default();

    pattern
        .replace("{path}", media_path)
        .replace("{dir}", &dir)
        .replace("{name}", &name)
        .replace("{suffix}", &suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_macros_expand() {
        assert_eq!(
            expand_image_pattern("{dir}/_MovieSheets/{name}/thumb.jpg", "/media/films/Alien.mkv"),
            "/media/films/_MovieSheets/Alien/thumb.jpg"
        );
        assert_eq!(
            expand_image_pattern("{path}/folder.jpg", "/media/films"),
            "/media/films/folder.jpg"
        );
        assert_eq!(
            expand_image_pattern("{name}{suffix}", "/a/b/Clip.avi"),
            "Clip.avi"
        );
    }

    #[test]
    fn config_defaults_parse_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.platform, "Desktop");
        assert_eq!(config.locale, "en");
    }

    #[test]
    fn kebab_case_keys_round_trip() {
        let toml = "media-search-path = \"/srv/media\"\nlocale = \"de\"\n";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.media_search_path, "/srv/media");
        assert_eq!(config.locale, "de");
    }
}
