// File: ./src/context.rs
//! Where fixturecal keeps its files.
//!
//! Two roots matter: a config root holding `config.toml`, `rules.toml` and
//! `roster.toml`, and a data root holding raw downloads, processed calendars
//! and the run report. Everything that reads or writes those files takes a
//! `&dyn AppContext`.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_SUBDIR: &str = "config";
const DATA_SUBDIR: &str = "data";

pub trait AppContext: Send + Sync + std::fmt::Debug {
    fn get_data_dir(&self) -> Result<PathBuf>;
    fn get_config_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("config.toml"))
    }

    fn get_rules_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("rules.toml"))
    }

    fn get_roster_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("roster.toml"))
    }

    /// Raw calendars as fetched from upstream.
    fn get_download_dir(&self) -> Result<PathBuf> {
        Ok(self.get_data_dir()?.join("downloads"))
    }

    fn get_output_dir(&self) -> Result<PathBuf> {
        Ok(self.get_data_dir()?.join("processed"))
    }

    fn get_report_path(&self) -> Result<PathBuf> {
        Ok(self.get_data_dir()?.join("report.json"))
    }
}

fn created(dir: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create fixturecal directory '{}'", dir.display()))?;
    Ok(dir)
}

/// Per-user platform directories, or `<root>/config` and `<root>/data`
/// when `--root` is given.
#[derive(Clone, Debug)]
pub struct StandardContext {
    root: Option<PathBuf>,
}

impl StandardContext {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn resolve(&self, subdir: &str, platform: fn(&ProjectDirs) -> &Path) -> Result<PathBuf> {
        let dir = match &self.root {
            Some(root) => root.join(subdir),
            None => {
                let dirs = ProjectDirs::from("org", "fixturecal", "fixturecal").ok_or_else(|| {
                    anyhow::anyhow!("No home directory; pass --root to choose one")
                })?;
                platform(&dirs).to_path_buf()
            }
        };
        created(dir)
    }
}

impl AppContext for StandardContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        self.resolve(DATA_SUBDIR, ProjectDirs::data_dir)
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        self.resolve(CONFIG_SUBDIR, ProjectDirs::config_dir)
    }
}

/// Throwaway workspace for tests; the whole tree goes away on drop.
#[derive(Debug)]
pub struct TestContext {
    workspace: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let workspace =
            std::env::temp_dir().join(format!("fixturecal_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&workspace).expect("test workspace");
        Self { workspace }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        created(self.workspace.join(DATA_SUBDIR))
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        created(self.workspace.join(CONFIG_SUBDIR))
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.workspace);
    }
}
