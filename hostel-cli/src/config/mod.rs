//! Configuration
//!
//! Read from `config.toml` in the user config directory (or an explicit
//! path), then overridden by `HOSTEL_*` environment variables. Every field
//! has a default, so a missing file is not an error.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ingest::layout::SheetLayout;

const APP_DIR: &str = "hostel-cli";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub baas: BaasConfig,
    pub layout: SheetLayout,
    pub fees: FeeConfig,
}

/// Connection to the BaaS document database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaasConfig {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: String,
    pub database_id: String,
    pub collections: Collections,
}

impl Default for BaasConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            api_key: String::new(),
            database_id: String::new(),
            collections: Collections::default(),
        }
    }
}

/// Collection ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collections {
    pub rooms: String,
    pub management_costs: String,
    pub students: String,
    pub hostel_meal_fee: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            rooms: "rooms".to_string(),
            management_costs: "management_costs".to_string(),
            students: "students".to_string(),
            hostel_meal_fee: "hostel_meal_fee".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Added to every student's meal fee
    pub hostel_fixed_fee: f64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            hostel_fixed_fee: 1500.0,
        }
    }
}

/// `<config dir>/hostel-cli/config.toml`
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

impl Config {
    /// Load the file (if any) and apply environment overrides.
    ///
    /// An explicitly given path must exist; the default path may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = default_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    log::debug!("No config file at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override settings from `HOSTEL_*` variables, looked up through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let baas = &mut self.baas;
        let string_overrides: [(&str, &mut String); 8] = [
            ("HOSTEL_BAAS_ENDPOINT", &mut baas.endpoint),
            ("HOSTEL_BAAS_PROJECT_ID", &mut baas.project_id),
            ("HOSTEL_BAAS_API_KEY", &mut baas.api_key),
            ("HOSTEL_BAAS_DATABASE_ID", &mut baas.database_id),
            ("HOSTEL_ROOMS_COLLECTION_ID", &mut baas.collections.rooms),
            ("HOSTEL_COSTS_COLLECTION_ID", &mut baas.collections.management_costs),
            ("HOSTEL_STUDENTS_COLLECTION_ID", &mut baas.collections.students),
            ("HOSTEL_MEAL_FEE_COLLECTION_ID", &mut baas.collections.hostel_meal_fee),
        ];
        for (key, field) in string_overrides {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                log::debug!("{} set from environment", key);
                *field = value;
            }
        }

        if let Some(value) = lookup("HOSTEL_FIXED_FEE").filter(|v| !v.is_empty()) {
            self.fees.hostel_fixed_fee = value
                .trim()
                .parse()
                .with_context(|| format!("HOSTEL_FIXED_FEE is not a number: '{}'", value))?;
        }

        Ok(())
    }
}
