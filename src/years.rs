// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::LedgerResult;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

pub fn is_year(s: &str) -> bool {
    YEAR_RE.is_match(s)
}

/// Sort year labels newest first, comparing numerically.
pub fn sort_years_desc(years: &mut [String]) {
    years.sort_by(|a, b| {
        let (x, y) = (a.parse::<u32>().ok(), b.parse::<u32>().ok());
        y.cmp(&x).then_with(|| b.cmp(a))
    });
}

/// Years that have a container under `root`, newest first. Only immediate
/// sub-directories named with exactly four digits count. A scan failure
/// yields an empty list: the result only feeds a year selector.
pub fn list_years(root: &Path) -> Vec<String> {
    match scan(root) {
        Ok(years) => years,
        Err(err) => {
            tracing::warn!(root = %root.display(), error = %err, "year scan failed");
            Vec::new()
        }
    }
}

fn scan(root: &Path) -> LedgerResult<Vec<String>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut years = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_year(name) {
                years.push(name.to_string());
            }
        }
    }
    sort_years_desc(&mut years);
    Ok(years)
}
