// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::TxType;

pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl Default for Categories {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        Categories {
            income: owned(&["Sales", "Reimbursements", "Interest Income", "Other"]),
            expense: owned(&[
                "Advertising",
                "Cost of Goods Sold (COGS)",
                "Office Supplies",
                "Rent",
                "Utilities",
                "Contractors",
                "Software Subscriptions",
                "Travel",
                "Shipping",
            ]),
        }
    }
}

impl Categories {
    pub fn for_type(&self, t: TxType) -> &[String] {
        match t {
            TxType::Income => &self.income,
            TxType::Expense => &self.expense,
        }
    }

    fn for_type_mut(&mut self, t: TxType) -> &mut Vec<String> {
        match t {
            TxType::Income => &mut self.income,
            TxType::Expense => &mut self.expense,
        }
    }
}

/// Client-side preferences: the category taxonomy and description history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub categories: Categories,
    #[serde(rename = "descriptionHistory", default)]
    pub description_history: Vec<String>,
}

impl Preferences {
    /// Missing or unreadable files fall back to defaults.
    pub fn load(path: &Path) -> Preferences {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Preferences::default(),
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "ignoring corrupt preferences");
            Preferences::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Write preferences {}", path.display()))
    }

    /// Returns false for blank or already known names.
    pub fn add_category(&mut self, t: TxType, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let list = self.categories.for_type_mut(t);
        if list.iter().any(|c| c == name) {
            return false;
        }
        list.push(name.to_string());
        true
    }

    /// Most recent first, no duplicates, at most `HISTORY_LIMIT` entries.
    pub fn remember_description(&mut self, description: &str) {
        let d = description.trim();
        if d.is_empty() {
            return;
        }
        self.description_history.retain(|h| h != d);
        self.description_history.insert(0, d.to_string());
        self.description_history.truncate(HISTORY_LIMIT);
    }

    /// History entries starting with `prefix`, case-insensitively.
    pub fn suggest(&self, prefix: &str) -> Vec<&str> {
        let p = prefix.to_lowercase();
        self.description_history
            .iter()
            .filter(|h| h.to_lowercase().starts_with(&p))
            .map(String::as_str)
            .collect()
    }
}
