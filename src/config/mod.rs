use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::members::fetch::DEFAULT_SOURCE_URL;
use crate::table::{PageSize, Query, SortDirection, SortField};

/// Optional colour overrides, each a `#RRGGBB` or `#RGB` string
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_dim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_selected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the member list is fetched from at startup
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Rows per page on startup (0 means all rows)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Sizes offered when cycling rows-per-page ("All" is always appended)
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,

    /// Compact rows
    #[serde(default)]
    pub dense: bool,

    #[serde(default)]
    pub sort_field: SortField,

    #[serde(default)]
    pub sort_descending: bool,

    #[serde(default)]
    pub theme: ThemeConfig,
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_page_size() -> usize {
    5
}

fn default_page_size_options() -> Vec<usize> {
    vec![5, 10, 25]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
            dense: false,
            sort_field: SortField::default(),
            sort_descending: false,
            theme: ThemeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Get the default config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("roster");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from `path` (or the default location), creating a default
    /// file when none exists. Unreadable or invalid files fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Ok(p) => p,
                Err(_) => return Ok(AppConfig::default()),
            },
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config {}: {}", path.display(), e),
                },
                Err(e) => tracing::warn!("Failed to read config {}: {}", path.display(), e),
            }
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save_to(&path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&self.cleaned())?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Copy with unusable page-size options removed and the rest sorted
    fn cleaned(&self) -> Self {
        let mut clean = self.clone();
        clean.page_size_options.retain(|&n| n > 0);
        clean.page_size_options.sort_unstable();
        clean.page_size_options.dedup();
        if clean.page_size_options.is_empty() {
            clean.page_size_options = default_page_size_options();
        }
        clean
    }

    pub fn initial_page_size(&self) -> PageSize {
        match self.page_size {
            0 => PageSize::All,
            n => PageSize::Rows(n),
        }
    }

    /// Page sizes offered in the UI, smallest first, ending with All
    pub fn page_sizes(&self) -> Vec<PageSize> {
        let mut sizes: Vec<PageSize> = self
            .cleaned()
            .page_size_options
            .into_iter()
            .map(PageSize::Rows)
            .collect();
        sizes.push(PageSize::All);
        sizes
    }

    /// Starting query for the table
    pub fn initial_query(&self) -> Query {
        Query {
            filter: String::new(),
            sort_field: self.sort_field,
            direction: if self.sort_descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
            page: 0,
            page_size: self.initial_page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            source_url: "file:///tmp/members.json".to_string(),
            page_size: 10,
            page_size_options: vec![10, 50],
            dense: true,
            sort_field: SortField::Email,
            sort_descending: true,
            theme: ThemeConfig {
                accent: Some("#FFC107".to_string()),
                ..ThemeConfig::default()
            },
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.source_url, deserialized.source_url);
        assert_eq!(deserialized.sort_field, SortField::Email);
        assert_eq!(config.theme, deserialized.theme);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("dense = true\nsort_field = \"role\"\n").unwrap();

        assert!(config.dense);
        assert_eq!(config.sort_field, SortField::Role);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
    }

    #[test]
    fn test_page_sizes_cleaned() {
        let config = AppConfig {
            page_size_options: vec![25, 0, 5, 25],
            ..AppConfig::default()
        };

        assert_eq!(
            config.page_sizes(),
            vec![PageSize::Rows(5), PageSize::Rows(25), PageSize::All]
        );
    }

    #[test]
    fn test_initial_query() {
        let config = AppConfig {
            page_size: 0,
            sort_descending: true,
            ..AppConfig::default()
        };
        let query = config.initial_query();

        assert_eq!(query.page_size, PageSize::All);
        assert_eq!(query.direction, SortDirection::Descending);
        assert_eq!(query.sort_field, SortField::Name);
    }

    #[test]
    fn test_load_creates_default_file() {
        let path = std::env::temp_dir().join(format!("roster-test-{}.toml", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.page_size, 5);
        assert!(path.exists(), "Default config should be written");

        let _ = std::fs::remove_file(&path);
    }
}
