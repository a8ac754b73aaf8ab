// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::RecordStore;
use crate::error::{LedgerError, LedgerResult};
use crate::layout::StoreLayout;
use crate::years::is_year;

/// Where an archive run put its copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveReceipt {
    pub year: String,
    pub name: String,
    pub path: PathBuf,
    /// Previous archive for the same year, now in the trash.
    pub trashed: Option<PathBuf>,
}

impl ArchiveReceipt {
    pub fn message(&self) -> String {
        format!("Backup created: {}", self.name)
    }
}

/// Copy the whole live store into the container for `year`, replacing any
/// earlier archive of that year. The old copy is trashed only once the year
/// container is known to exist, and the new copy is written last.
pub fn archive_year(
    layout: &StoreLayout,
    live: &RecordStore,
    year: &str,
) -> LedgerResult<ArchiveReceipt> {
    let year = year.trim();
    if year.is_empty() {
        return Err(LedgerError::InvalidRequest("Year is required".into()));
    }
    if !is_year(year) {
        return Err(LedgerError::InvalidRequest(format!("Invalid year '{}'", year)));
    }

    let dir = layout.year_dir(year);
    fs::create_dir_all(&dir)?;

    let name = layout.archive_name(year);
    let path = dir.join(&name);
    let trashed = if path.exists() {
        Some(move_to_trash(layout, &path, &name)?)
    } else {
        None
    };

    if let Err(err) = live.copy_to(&path) {
        if path.exists() {
            let _ = fs::remove_file(&path);
        }
        tracing::error!(year, error = %err, "archive copy failed");
        return Err(err);
    }
    tracing::info!(year, path = %path.display(), "archive written");
    Ok(ArchiveReceipt {
        year: year.to_string(),
        name,
        path,
        trashed,
    })
}

fn move_to_trash(layout: &StoreLayout, path: &Path, name: &str) -> LedgerResult<PathBuf> {
    let trash = layout.trash_dir();
    fs::create_dir_all(&trash)?;
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6f");
    let dest = trash.join(format!("{}.{}", name, stamp));
    fs::rename(path, &dest)?;
    tracing::debug!(from = %path.display(), to = %dest.display(), "previous archive trashed");
    Ok(dest)
}

/// Archives currently sitting in the trash, oldest first.
pub fn trashed_archives(layout: &StoreLayout) -> LedgerResult<Vec<PathBuf>> {
    let trash = layout.trash_dir();
    if !trash.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(&trash)? {
        out.push(entry?.path());
    }
    out.sort();
    Ok(out)
}
