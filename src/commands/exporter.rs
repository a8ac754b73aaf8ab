// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use std::path::Path;

use super::Ctx;
use crate::models::{HEADERS, Transaction};

pub fn handle(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }
    let rows = ctx.load_year(sub.get_one::<String>("year"))?;
    write_rows(&rows, &fmt, Path::new(out))?;
    println!(
        "Exported {} transaction(s) for {} to {}",
        rows.len(),
        ctx.client.selected_year(),
        out
    );
    Ok(())
}

pub fn write_rows(rows: &[Transaction], fmt: &str, out: &Path) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(HEADERS)?;
            for t in rows {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_string(),
                    t.r#type.to_string(),
                    t.category.clone(),
                    t.document_owner.clone(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.currency.to_string(),
                    t.usd_value.to_string(),
                    t.invoice_no.clone(),
                    t.created_at.to_rfc3339(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(rows)?)?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    Ok(())
}
