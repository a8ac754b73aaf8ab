// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::Ctx;
use crate::utils::{parse_year, pretty_table};

pub fn handle_years(ctx: &Ctx) -> Result<()> {
    let years = ctx.client.load_years()?;
    if years.is_empty() {
        println!("No archived years yet.");
        return Ok(());
    }
    let rows = years.into_iter().map(|y| vec![y]).collect();
    println!("{}", pretty_table(&["Year"], rows));
    Ok(())
}

pub fn handle_year(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("add", sub)) = m.subcommand() {
        let year = parse_year(sub.get_one::<String>("year").unwrap())?;
        ctx.client.load_years()?;
        if ctx.client.add_year(&year)? {
            println!(
                "Year {} selected for this run only; it persists once `backup --year {}` archives it",
                year, year
            );
        } else {
            println!("Year {} is already listed; selected it", year);
        }
    }
    Ok(())
}

pub fn handle_backup(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    let year = parse_year(m.get_one::<String>("year").unwrap())?;
    match &ctx.service {
        // Local store: the receipt is available, so report it.
        Some(service) => {
            let receipt = service.backup(Some(&year))?;
            println!("{} ({})", receipt.message(), receipt.path.display());
            if let Some(old) = receipt.trashed {
                println!("Previous archive moved to {}", old.display());
            }
        }
        None => {
            ctx.client.backup(&year)?;
            println!(
                "Backup for {} sent; check the '{}/{}' folder shortly",
                year, ctx.config.archive_folder, year
            );
        }
    }
    Ok(())
}
