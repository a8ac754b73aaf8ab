// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::rates::RateTable;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Ledgerbook", "ledgerbook"));

pub const DATA_DIR_ENV: &str = "LEDGERBOOK_DATA_DIR";
pub const ENDPOINT_ENV: &str = "LEDGERBOOK_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the live store, the archive tree and local preferences live.
    pub data_dir: Option<PathBuf>,
    /// Tenant label: names the live store and every archive file.
    pub tenant: String,
    /// Root container for the year folders, relative to `data_dir`.
    pub archive_folder: String,
    /// Remote endpoint; when unset the CLI talks to the local store directly.
    pub endpoint: Option<String>,
    pub bind: String,
    pub lock_timeout_ms: u64,
    pub refresh_delay_ms: u64,
    pub request_timeout_ms: Option<u64>,
    pub rates: RateTable,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            tenant: "LEDGER".to_string(),
            archive_folder: "archive".to_string(),
            endpoint: None,
            bind: "127.0.0.1:8787".to_string(),
            lock_timeout_ms: 10_000,
            refresh_delay_ms: 2_500,
            request_timeout_ms: None,
            rates: RateTable::default(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

impl Config {
    /// Load `path` (or the platform default location) and apply environment
    /// overrides. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        let mut cfg = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Read config {}", path.display()))?;
            Config::from_toml(&raw).with_context(|| format!("Parse config {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Config::default()
        };
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            cfg.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            cfg.endpoint = Some(endpoint).filter(|e| !e.trim().is_empty());
        }
        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Config> {
        let mut cfg: Config = toml::from_str(raw)?;
        cfg.rates = RateTable::default().merged(&cfg.rates);
        Ok(cfg)
    }

    /// A config rooted at an explicit directory, mostly for tests and tooling.
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Config {
        Config {
            data_dir: Some(dir.into()),
            ..Config::default()
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        let dir = match &self.data_dir {
            Some(d) => d.clone(),
            None => project_dirs()?.data_dir().to_path_buf(),
        };
        fs::create_dir_all(&dir).context("Failed to create data dir")?;
        Ok(dir)
    }

    pub fn prefs_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("prefs.json"))
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
