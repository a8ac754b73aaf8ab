// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::Ctx;
use crate::summary::{Summary, summarize};
use crate::utils::{maybe_print_json, pretty_table};

pub fn year_summary(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<Summary> {
    let rows = ctx.load_year(sub.get_one::<String>("year"))?;
    Ok(summarize(&rows))
}

pub fn handle(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let s = year_summary(ctx, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &s)? {
        return Ok(());
    }

    let mut data = Vec::new();
    for (label, part) in [("income", &s.income), ("expense", &s.expense)] {
        for (cat, total) in &part.categories {
            data.push(vec![label.to_string(), cat.clone(), format!("{:.2}", total)]);
        }
        data.push(vec![label.to_string(), "TOTAL".into(), format!("{:.2}", part.total)]);
    }
    data.push(vec!["net".into(), String::new(), format!("{:.2}", s.net)]);
    println!("Year {}", ctx.client.selected_year());
    println!("{}", pretty_table(&["Type", "Category", "USD"], data));
    Ok(())
}
