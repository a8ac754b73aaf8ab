// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::Ctx;
use crate::models::TxType;
use crate::prefs::Preferences;
use crate::utils::pretty_table;

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    let path = ctx.config.prefs_path()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let t = sub.get_one::<String>("type").unwrap().parse::<TxType>()?;
            let name = sub.get_one::<String>("name").unwrap();
            let mut prefs = Preferences::load(&path);
            if prefs.add_category(t, name) {
                prefs.save(&path)?;
                println!("Added {} category '{}'", t, name.trim());
            } else {
                println!("Category '{}' already exists or is blank", name.trim());
            }
        }
        Some(("list", sub)) => {
            let prefs = Preferences::load(&path);
            let only = sub
                .get_one::<String>("type")
                .map(|s| s.parse::<TxType>())
                .transpose()?;
            let mut data = Vec::new();
            for t in [TxType::Income, TxType::Expense] {
                if only.is_some_and(|o| o != t) {
                    continue;
                }
                for c in prefs.categories.for_type(t) {
                    data.push(vec![t.to_string(), c.clone()]);
                }
            }
            println!("{}", pretty_table(&["Type", "Category"], data));
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_history(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    let prefs = Preferences::load(&ctx.config.prefs_path()?);
    let prefix = m.get_one::<String>("prefix").map(String::as_str).unwrap_or("");
    let data = prefs
        .suggest(prefix)
        .into_iter()
        .map(|d| vec![d.to_string()])
        .collect();
    println!("{}", pretty_table(&["Description"], data));
    Ok(())
}
