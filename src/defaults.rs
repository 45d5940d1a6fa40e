//! User defaults read from `config.toml`.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use serde::Deserialize;
use staledu_core::Units;

/// Optional overrides for the built-in scan defaults.
///
/// ```toml
/// max_depth = 3
/// atime_days = 90
/// units = "TB"
/// cost_rate = 0.0008
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserDefaults {
    pub max_depth: Option<u32>,
    pub atime_days: Option<u32>,
    pub units: Option<Units>,
    pub cost_rate: Option<f64>,
}

impl UserDefaults {
    /// Get the default config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("staledu").join("config.toml"))
    }

    /// Load the default config file. A missing file yields empty defaults;
    /// an unreadable or malformed one is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::config_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_else(|err| {
            tracing::warn!("ignoring {}: {err:#}", path.display());
            Self::default()
        })
    }

    /// Load defaults from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).wrap_err_with(|| format!("Failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_file() {
        let defaults: UserDefaults = toml::from_str(
            r#"
            max_depth = 3
            atime_days = 90
            units = "t"
            cost_rate = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(defaults.max_depth, Some(3));
        assert_eq!(defaults.atime_days, Some(90));
        assert_eq!(defaults.units, Some(Units::Terabytes));
        assert_eq!(defaults.cost_rate, Some(0.5));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let defaults: UserDefaults = toml::from_str("").unwrap();
        assert_eq!(defaults, UserDefaults::default());
    }

    #[test]
    fn test_rejects_bad_units_and_unknown_keys() {
        assert!(toml::from_str::<UserDefaults>(r#"units = "zz""#).is_err());
        assert!(toml::from_str::<UserDefaults>("depth = 2").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "atime_days = 7\n").unwrap();

        let defaults = UserDefaults::load_from(&path).unwrap();
        assert_eq!(defaults.atime_days, Some(7));
        assert!(UserDefaults::load_from(&temp.path().join("missing.toml")).is_err());
    }
}
