//! Configuration module for Tabvault.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, and defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::tab_list::InsertPosition;

/// Top-level configuration for Tabvault.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub merge: MergeConfig,
    pub sync: SyncConfig,
    pub recycle: RecycleConfig,
    pub logging: LoggingConfig,
}

/// Merge and dedup policy flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// When true, groups with identical names stay distinct entries during
    /// a merge instead of being combined.
    pub allow_duplicate_groups: bool,
    /// When true, tabs with identical urls are kept; when false, dedup
    /// keeps the first occurrence.
    pub allow_duplicate_tabs: bool,
    /// Where unmatched entities from the other side are appended.
    pub insert_position: InsertPosition,
}

/// Auto-sync timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Minutes between auto-sync ticks.
    pub auto_interval_minutes: u64,
}

/// Recycle bin retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecycleConfig {
    /// Hours a deleted entry survives before the sweep purges it.
    pub retention_hours: i64,
    /// Minutes between purge sweeps.
    pub sweep_interval_minutes: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            allow_duplicate_groups: false,
            allow_duplicate_tabs: false,
            insert_position: InsertPosition::Top,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_interval_minutes: 30,
        }
    }
}

impl Default for RecycleConfig {
    fn default() -> Self {
        Self {
            retention_hours: crate::domain::recycle_bin::DEFAULT_RETENTION_HOURS,
            sweep_interval_minutes: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.merge.allow_duplicate_groups);
        assert!(!config.merge.allow_duplicate_tabs);
        assert_eq!(config.merge.insert_position, InsertPosition::Top);
        assert_eq!(config.sync.auto_interval_minutes, 30);
        assert_eq!(config.recycle.retention_hours, 24);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_yaml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "merge:\n  allow_duplicate_tabs: true\nsync:\n  auto_interval_minutes: 5\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.merge.allow_duplicate_tabs);
        assert!(!config.merge.allow_duplicate_groups);
        assert_eq!(config.sync.auto_interval_minutes, 5);
        assert_eq!(config.recycle.sweep_interval_minutes, 60);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/tabvault.yaml"));
        assert_eq!(config.sync.auto_interval_minutes, 30);
    }
}
