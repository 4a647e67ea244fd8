// File: ./src/config.rs
// Loads settings, rule tables and the roster from TOML through an explicit context.
use crate::context::AppContext;
use crate::model::Roster;
use crate::rewrite::RuleTables;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PRODUCT_ID: &str = "-//Fixturecal//Fixture Calendar//EN";
pub const DEFAULT_ROUND_BASE_URL: &str = "https://www.hockeyvictoria.org.au/games/";

fn default_product_id() -> String {
    DEFAULT_PRODUCT_ID.to_string()
}

fn default_round_base_url() -> String {
    DEFAULT_ROUND_BASE_URL.to_string()
}

fn default_max_concurrent() -> usize {
    5
}

fn default_batch_delay_ms() -> u64 {
    100
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_product_id")]
    pub product_id: String,
    /// Prefix for round links; the `<season>/<grade>` id and `/round/<n>` are appended.
    #[serde(default = "default_round_base_url")]
    pub round_base_url: String,
    #[serde(default)]
    pub calendars_homepage: Option<String>,

    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    // Overrides for the context's data directories.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            product_id: default_product_id(),
            round_base_url: default_round_base_url(),
            calendars_homepage: None,
            max_concurrent: default_max_concurrent(),
            batch_delay_ms: default_batch_delay_ms(),
            download_dir: None,
            output_dir: None,
        }
    }
}

fn load_toml<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file '{}'", what, path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {} file '{}'", what, path.display()))
}

impl Settings {
    /// Loads `config.toml`; a missing file yields the defaults.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        if !path.exists() {
            log::info!(
                "No settings file at '{}', using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        load_toml(&path, "settings")
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        crate::storage::atomic_write(&path, toml_str)?;
        Ok(())
    }

    pub fn download_dir(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.download_dir {
            Some(dir) => Ok(dir.clone()),
            None => ctx.get_download_dir(),
        }
    }

    pub fn output_dir(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => ctx.get_output_dir(),
        }
    }
}

/// Loads `rules.toml`. Rule tables are required.
pub fn load_rule_tables(ctx: &dyn AppContext) -> Result<RuleTables> {
    let path = ctx.get_rules_path()?;
    load_toml(&path, "rules")
}

/// Loads `roster.toml`.
pub fn load_roster(ctx: &dyn AppContext) -> Result<Roster> {
    let path = ctx.get_roster_path()?;
    load_toml(&path, "roster")
}
