// config.rs - The `.policylens/config.toml` file.
//
// Every table is optional; a missing file means built-in defaults. The
// config is loaded once at startup and handed to commands by reference.
//
// ```toml
// [scoring]
// category_cap = 25.0
//
// [scoring.weights]
// sharing = 2.0
// vague = 0.5
//
// [bands]
// min_a = 85.0
//
// [cookies]
// missing_opt_out_penalty = 8.0
// ```

use std::path::Path;

use anyhow::Context;
use pl_cookies::CookieAuditConfig;
use pl_grade::GradeBands;
use pl_policy::ScoringConfig;
use pl_report::AuditSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LensConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub bands: GradeBands,
    #[serde(default)]
    pub cookies: CookieAuditConfig,
}

impl LensConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: LensConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config
            .settings()
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config, or return defaults if the file doesn't exist.
    /// A file that exists but is invalid is still an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn settings(&self) -> AuditSettings {
        AuditSettings {
            scoring: self.scoring,
            bands: self.bands,
            cookies: self.cookies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = LensConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, LensConfig::default());
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[scoring.weights]\nsharing = 3.0\n\n[cookies]\nmissing_opt_out_penalty = 4.0\n",
        )
        .unwrap();

        let config = LensConfig::load(&path).unwrap();
        assert_eq!(config.scoring.weights.sharing, 3.0);
        assert_eq!(config.scoring.weights.vague, 0.5);
        assert_eq!(config.scoring.category_cap, 25.0);
        assert_eq!(config.cookies.missing_opt_out_penalty, 4.0);
        assert_eq!(config.cookies.consent_penalty_cap, 45.0);
        assert_eq!(config.bands, GradeBands::default());
    }

    #[test]
    fn inconsistent_bands_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        // C's own point score (50) would grade as D.
        std::fs::write(&path, "[bands]\nmin_a = 90.0\nmin_b = 75.0\nmin_c = 60.0\nmin_d = 40.0\n")
            .unwrap();
        let err = LensConfig::load_or_default(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid config"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring\n").unwrap();
        assert!(LensConfig::load(&path).is_err());
    }
}
