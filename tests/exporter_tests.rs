// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgerbook::commands::{Ctx, exporter};
use ledgerbook::config::Config;
use ledgerbook::models::{Currency, HEADERS, TransactionInput, TxType};
use ledgerbook::{cli, utils::parse_date};
use rust_decimal::Decimal;
use tempfile::{TempDir, tempdir};

fn seeded() -> (TempDir, Ctx) {
    let dir = tempdir().unwrap();
    let mut cfg = Config::with_data_dir(dir.path().join("data"));
    cfg.tenant = "ACME".to_string();
    let ctx = Ctx::local(cfg).unwrap();
    let service = ctx.service.as_ref().unwrap();
    service
        .create(&TransactionInput {
            date: parse_date("2025-01-02").unwrap(),
            r#type: TxType::Expense,
            category: "Office Supplies".to_string(),
            document_owner: "Dana".to_string(),
            description: "Corner Shop".to_string(),
            amount: Decimal::new(1234, 2),
            currency: Currency::EUR,
            invoice_no: "INV-7".to_string(),
        })
        .unwrap();
    (dir, ctx)
}

fn run_export(ctx: &Ctx, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["ledgerbook", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(ctx, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_streams_pretty_json() {
    let (dir, ctx) = seeded();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&ctx, &["--format", "json", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["Date"], "2025-01-02");
    assert_eq!(row["Type"], "expense");
    assert_eq!(row["Category"], "Office Supplies");
    assert_eq!(row["Document Owner"], "Dana");
    assert_eq!(row["Currency"], "EUR");
    assert_eq!(row["Invoice No"], "INV-7");
    assert!(!row["ID"].as_str().unwrap().is_empty());
}

#[test]
fn export_csv_starts_with_header_row() {
    let (dir, ctx) = seeded();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&ctx, &["--format", "CSV", "--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, HEADERS.map(String::from).to_vec());
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][5], "Corner Shop");
    assert_eq!(&records[0][8], "12.96");
}

#[test]
fn unknown_format_writes_nothing() {
    let (dir, ctx) = seeded();
    let out_path = dir.path().join("export.xml");
    let out_str = out_path.to_string_lossy().to_string();

    let err = run_export(&ctx, &["--format", "xml", "--out", &out_str]).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out_path.exists());
}
