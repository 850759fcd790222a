use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::fm::SortMode;
use crate::core::search::DEFAULT_BATCH_SIZE;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    pub show_hidden: bool,
    pub sort_mode: SortMode,
    pub search_batch_size: usize,
    pub cache_capacity: usize,
    pub message_timeout_ms: u64,
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/faro/config.toml`, overridable
    /// with the `FARO_CONFIG` environment variable.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(custom) = std::env::var("FARO_CONFIG") {
            return Some(PathBuf::from(custom));
        }
        dirs::config_dir().map(|d| d.join("faro").join("config.toml"))
    }

    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Config::default();
        };
        match fs::read_to_string(&path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
        {
            Some(cfg) => cfg,
            None => Config::default(),
        }
    }

    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            show_hidden: false,
            sort_mode: SortMode::Name,
            search_batch_size: DEFAULT_BATCH_SIZE,
            cache_capacity: 100,
            message_timeout_ms: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert!(!cfg.show_hidden);
        assert_eq!(cfg.sort_mode, SortMode::Name);
        assert_eq!(cfg.search_batch_size, 50);
        assert_eq!(cfg.message_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn partial_toml_fills_missing_fields() {
        let cfg: Config = toml::from_str("show_hidden = true").unwrap();
        assert!(cfg.show_hidden);
        assert_eq!(cfg.cache_capacity, 100);
    }

    #[test]
    fn sort_mode_parses_lowercase() {
        let cfg: Config = toml::from_str("sort_mode = \"modified\"").unwrap();
        assert_eq!(cfg.sort_mode, SortMode::Modified);
    }
}
