// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};

use super::Ctx;
use crate::models::{Currency, Transaction, TransactionInput, TxType};
use crate::prefs::Preferences;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("rm", sub)) => remove(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

/// Read the transaction fields shared by `add` and `edit`. Flags left out
/// fall back to `base`, the row being edited.
pub fn input_from_args(
    sub: &clap::ArgMatches,
    base: Option<&TransactionInput>,
) -> Result<TransactionInput> {
    let opt = |name: &str| sub.get_one::<String>(name).map(|s| s.trim().to_string());
    let missing = |name: &str| anyhow!("--{} is required", name);
    let text = |name: &str, stored: Option<&String>| {
        opt(name).or_else(|| stored.cloned()).unwrap_or_default()
    };
    Ok(TransactionInput {
        date: match opt("date") {
            Some(s) => parse_date(&s)?,
            None => base.map(|b| b.date).ok_or_else(|| missing("date"))?,
        },
        r#type: match opt("type") {
            Some(s) => s.parse::<TxType>()?,
            None => base.map(|b| b.r#type).ok_or_else(|| missing("type"))?,
        },
        category: text("category", base.map(|b| &b.category)),
        document_owner: text("owner", base.map(|b| &b.document_owner)),
        description: text("description", base.map(|b| &b.description)),
        amount: match opt("amount") {
            Some(s) => parse_decimal(&s)?,
            None => base.map(|b| b.amount).ok_or_else(|| missing("amount"))?,
        },
        currency: match opt("currency") {
            Some(s) => s.parse::<Currency>()?,
            None => base.map(|b| b.currency).unwrap_or(Currency::USD),
        },
        invoice_no: text("invoice", base.map(|b| &b.invoice_no)),
    })
}

/// Keep the local taxonomy and description history in step with what was
/// just entered.
fn remember(ctx: &Ctx, input: &TransactionInput) -> Result<()> {
    let path = ctx.config.prefs_path()?;
    let mut prefs = Preferences::load(&path);
    if prefs.add_category(input.r#type, &input.category) {
        println!("New {} category '{}'", input.r#type, input.category);
    }
    prefs.remember_description(&input.description);
    prefs.save(&path)
}

fn add(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let input = input_from_args(sub, None)?;
    input.validate()?;
    remember(ctx, &input)?;
    let estimate = ctx.config.rates.to_usd(input.amount, input.currency);
    ctx.client.create(&input)?;
    println!(
        "Recorded {} {} on {} ({}, ~{})",
        input.r#type,
        fmt_money(&input.amount, input.currency.code()),
        input.date,
        input.category,
        fmt_money(&estimate, "USD")
    );
    Ok(())
}

fn edit(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    let stored = ctx
        .load_year(sub.get_one::<String>("year"))?
        .into_iter()
        .find(|t| t.id == id)
        .map(|t| t.input());
    if stored.is_none() {
        tracing::debug!(
            %id,
            year = %ctx.client.selected_year(),
            "row not in view, every field must be given"
        );
    }
    let input = input_from_args(sub, stored.as_ref())?;
    input.validate()?;
    remember(ctx, &input)?;
    ctx.client.update(&id, &input)?;
    println!("Update sent for {}", id);
    Ok(())
}

fn remove(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let ids: Vec<String> = sub
        .get_many::<String>("id")
        .unwrap_or_default()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    ctx.client.delete(&ids)?;
    println!("Delete sent for {} transaction(s)", ids.len());
    Ok(())
}

pub fn query_rows(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let mut rows = ctx.load_year(sub.get_one::<String>("year"))?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn list(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ctx, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.r#type.to_string(),
                    t.category.clone(),
                    t.document_owner.clone(),
                    t.description.clone(),
                    format!("{:.2}", t.amount),
                    t.currency.to_string(),
                    format!("{:.2}", t.usd_value),
                    t.invoice_no.clone(),
                    t.id.clone(),
                ]
            })
            .collect();
        println!("Year {}", ctx.client.selected_year());
        println!(
            "{}",
            pretty_table(
                &[
                    "Date", "Type", "Category", "Owner", "Description", "Amount", "CCY", "USD",
                    "Invoice", "ID",
                ],
                rows,
            )
        );
    }
    Ok(())
}
