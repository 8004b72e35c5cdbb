//! Load runtime configuration.

use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::policy::Policy;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogCfg {
    pub path: String, // YAML list of properties; relative to the working dir
}

impl Default for CatalogCfg {
    fn default() -> Self {
        Self {
            path: "properties.yaml".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub currency: String, // display prefix only, no conversion
    pub catalog: CatalogCfg,
    pub policy: Policy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency: "AED".to_string(),
            catalog: CatalogCfg::default(),
            policy: Policy::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&s).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(s: &str) -> anyhow::Result<Self> {
        // an empty file is valid and means "all defaults"
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.policy.limits.check()?;
        Ok(cfg)
    }

    /// Explicit path first, then ./config.yaml, then the platform config dir.
    pub fn locate(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(p) = explicit {
            return Some(PathBuf::from(p));
        }
        let local = PathBuf::from("config.yaml");
        if local.exists() {
            return Some(local);
        }
        ProjectDirs::from("ae", "realty", "realty-calc")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .filter(|p| p.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_all_defaults() {
        let cfg = AppConfig::from_yaml("").unwrap();
        assert_eq!(cfg.currency, "AED");
        assert_eq!(cfg.catalog.path, "properties.yaml");
        assert_eq!(cfg.policy, Policy::default());
    }

    #[test]
    fn overrides_policy_values() {
        let cfg = AppConfig::from_yaml(
            "currency: USD\npolicy:\n  fees:\n    mortgage_processing_cap: 12000\n  limits:\n    max_term_years: 30\n",
        )
        .unwrap();
        assert_eq!(cfg.currency, "USD");
        assert_eq!(cfg.policy.fees.mortgage_processing_cap, 12_000.0);
        assert_eq!(cfg.policy.limits.max_term_years, 30);
        assert_eq!(cfg.policy.fees.registration_rate, 0.04);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(AppConfig::from_yaml("policy: [1, 2").is_err());
    }

    #[test]
    fn oversized_year_limits_are_rejected_at_load() {
        let err = AppConfig::from_yaml("policy:\n  limits:\n    max_term_years: 4294967295\n")
            .unwrap_err();
        assert!(err.to_string().contains("max_term_years"));
    }

    #[test]
    fn explicit_path_wins() {
        let p = AppConfig::locate(Some("/etc/realty/custom.yaml")).unwrap();
        assert_eq!(p, PathBuf::from("/etc/realty/custom.yaml"));
    }
}
