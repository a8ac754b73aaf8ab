// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};

/// Where each physical store lives on disk:
///
/// ```text
/// <data_dir>/<tenant>                          live store
/// <data_dir>/<archive_folder>/<YYYY>/<YYYY> <tenant>   archive for YYYY
/// <data_dir>/<archive_folder>/.trash/           replaced archives
/// ```
#[derive(Debug, Clone)]
pub struct StoreLayout {
    data_dir: PathBuf,
    tenant: String,
    archive_folder: String,
}

impl StoreLayout {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        tenant: impl Into<String>,
        archive_folder: impl Into<String>,
    ) -> Self {
        StoreLayout {
            data_dir: data_dir.into(),
            tenant: tenant.into(),
            archive_folder: archive_folder.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn live_path(&self) -> PathBuf {
        self.data_dir.join(&self.tenant)
    }

    pub fn archive_root(&self) -> PathBuf {
        self.data_dir.join(&self.archive_folder)
    }

    pub fn year_dir(&self, year: &str) -> PathBuf {
        self.archive_root().join(year)
    }

    /// Canonical archive name for `year`: `"{year} {tenant}"`.
    pub fn archive_name(&self, year: &str) -> String {
        format!("{} {}", year, self.tenant)
    }

    pub fn archive_path(&self, year: &str) -> PathBuf {
        self.year_dir(year).join(self.archive_name(year))
    }

    pub fn trash_dir(&self) -> PathBuf {
        self.archive_root().join(".trash")
    }
}
