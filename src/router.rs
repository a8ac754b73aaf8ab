// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};
use crate::layout::StoreLayout;

/// The physical store a read should go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreHandle {
    Live(PathBuf),
    Archive { year: String, path: PathBuf },
}

impl StoreHandle {
    pub fn path(&self) -> &PathBuf {
        match self {
            StoreHandle::Live(p) => p,
            StoreHandle::Archive { path, .. } => path,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, StoreHandle::Live(_))
    }
}

/// Pick the store for a read of `year`.
///
/// | year                         | target          |
/// |------------------------------|-----------------|
/// | none                         | live            |
/// | 4 chars, archive present     | that archive    |
/// | 4 chars, no archive          | live            |
/// | lookup error                 | live (logged)   |
///
/// Writes never come through here; they always hit the live store.
pub fn resolve_read_target(layout: &StoreLayout, year: Option<&str>) -> StoreHandle {
    let live = StoreHandle::Live(layout.live_path());
    let Some(year) = year.map(str::trim).filter(|y| y.chars().count() == 4) else {
        return live;
    };
    match locate_archive(layout, year) {
        Ok(Some(path)) => StoreHandle::Archive {
            year: year.to_string(),
            path,
        },
        Ok(None) => {
            tracing::debug!(year, "no archive, reading live store");
            live
        }
        Err(err) => {
            tracing::warn!(year, error = %err, "archive lookup failed, reading live store");
            live
        }
    }
}

/// Find the archive file for `year` inside its year container, if any.
pub fn locate_archive(layout: &StoreLayout, year: &str) -> LedgerResult<Option<PathBuf>> {
    let dir = layout.year_dir(year);
    if !dir.is_dir() {
        return Ok(None);
    }
    let wanted = layout.archive_name(year);
    let entries = fs::read_dir(&dir)
        .map_err(|e| LedgerError::ArchiveLocate(format!("{}: {}", dir.display(), e)))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| LedgerError::ArchiveLocate(format!("{}: {}", dir.display(), e)))?;
        if entry.file_name().to_str() == Some(wanted.as_str()) && entry.path().is_file() {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}
