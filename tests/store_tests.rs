// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerbook::db::{RecordStore, StoredRow};
use ledgerbook::error::LedgerError;
use ledgerbook::locate::find_row_index;
use ledgerbook::models::{Currency, HEADERS, TransactionInput, TxType};
use ledgerbook::rates::RateTable;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashSet;
use tempfile::{TempDir, tempdir};

fn setup() -> (TempDir, RecordStore) {
    let dir = tempdir().unwrap();
    let store = RecordStore::open(&dir.path().join("LEDGER")).unwrap();
    (dir, store)
}

fn input(category: &str, amount: &str, currency: Currency) -> TransactionInput {
    TransactionInput {
        date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        r#type: TxType::Expense,
        category: category.to_string(),
        document_owner: "Ahmet".to_string(),
        description: format!("{} payment", category),
        amount: amount.parse().unwrap(),
        currency,
        invoice_no: "INV-1".to_string(),
    }
}

#[test]
fn bootstrap_writes_header_row() {
    let (_dir, store) = setup();
    assert_eq!(store.header().unwrap(), HEADERS.to_vec());
}

#[test]
fn append_assigns_unique_ids_and_lists_newest_first() {
    let (_dir, store) = setup();
    let rates = RateTable::default();
    let mut ids = Vec::new();
    for i in 0..20 {
        ids.push(
            store
                .append(&input(&format!("Cat{}", i), "10", Currency::USD), &rates)
                .unwrap(),
        );
    }
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), 20);

    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), 20);
    assert_eq!(listed[0].id, ids[19]);
    assert_eq!(listed[0].category, "Cat19");
    assert_eq!(listed[19].id, ids[0]);
}

#[test]
fn update_replaces_fields_but_keeps_id_and_timestamp() {
    let (_dir, store) = setup();
    let rates = RateTable::default();
    let id = store.append(&input("Rent", "100", Currency::CAD), &rates).unwrap();
    let before = store.list_all().unwrap().remove(0);
    assert_eq!(before.usd_value, Decimal::new(7500, 2));

    let mut changed = input("Travel", "200", Currency::EUR);
    changed.r#type = TxType::Income;
    changed.document_owner = String::new();
    store.update_by_id(&id, &changed, &rates).unwrap();

    let after = store.list_all().unwrap().remove(0);
    assert_eq!(after.id, id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.category, "Travel");
    assert_eq!(after.r#type, TxType::Income);
    assert_eq!(after.document_owner, "");
    assert_eq!(after.currency, Currency::EUR);
    assert_eq!(after.usd_value.to_string(), "210.00");
}

#[test]
fn update_and_delete_report_missing_ids() {
    let (_dir, store) = setup();
    let rates = RateTable::default();
    store.append(&input("Rent", "1", Currency::USD), &rates).unwrap();

    let err = store
        .update_by_id("nope", &input("Rent", "2", Currency::USD), &rates)
        .unwrap_err();
    assert!(matches!(err, LedgerError::IdNotFound(ref id) if id == "nope"));
    let err = store.delete_by_id("nope").unwrap_err();
    assert!(matches!(err, LedgerError::IdNotFound(_)));
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn delete_by_id_removes_only_the_target_row() {
    let (_dir, store) = setup();
    let rates = RateTable::default();
    let a = store.append(&input("A", "1", Currency::USD), &rates).unwrap();
    let b = store.append(&input("B", "2", Currency::USD), &rates).unwrap();
    let c = store.append(&input("C", "3", Currency::USD), &rates).unwrap();

    store.delete_by_id(&b).unwrap();
    let left: Vec<String> = store.list_all().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(left, vec![c, a]);
}

#[test]
fn negative_amounts_are_rejected() {
    let (_dir, store) = setup();
    let err = store
        .append(&input("Rent", "-5", Currency::USD), &RateTable::default())
        .unwrap_err();
    assert!(err.to_string().contains("non-negative"));
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn row_locator_returns_first_match_in_snapshot() {
    let (_dir, store) = setup();
    let rates = RateTable::default();
    store.append(&input("A", "1", Currency::USD), &rates).unwrap();
    let b = store.append(&input("B", "2", Currency::USD), &rates).unwrap();

    let mut rows: Vec<StoredRow> = store.snapshot().unwrap();
    assert_eq!(find_row_index(&rows, &b), Some(1));
    assert_eq!(find_row_index(&rows, "missing"), None);

    // a duplicated id resolves to the earliest physical row
    let mut dup = rows[1].clone();
    dup.pos = 99;
    rows.insert(0, dup);
    assert_eq!(find_row_index(&rows, &b), Some(0));
}

#[test]
fn legacy_store_gains_document_owner_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("LEDGER");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE header(position INTEGER PRIMARY KEY, name TEXT NOT NULL);
            INSERT INTO header(position, name) VALUES
                (1,'ID'),(2,'Date'),(3,'Type'),(4,'Category'),(5,'Description'),(6,'Amount'),
                (7,'Currency'),(8,'USD Value'),(9,'Invoice No'),(10,'Timestamp');
            CREATE TABLE rows(
                pos INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL,
                date TEXT NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                amount TEXT NOT NULL,
                currency TEXT NOT NULL,
                usd_value TEXT NOT NULL,
                invoice_no TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );
            INSERT INTO rows(id, date, type, category, description, amount, currency, usd_value, invoice_no, created_at)
            VALUES ('old-1', '2024-03-01', 'income', 'Sales', 'Etsy payout', '50', 'USD', '50.00', '', '2024-03-01 10:00:00+00:00');
            "#,
        )
        .unwrap();
    }

    let store = RecordStore::open(&path).unwrap();
    assert_eq!(store.header().unwrap(), HEADERS.to_vec());
    let rows = store.list_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "old-1");
    assert_eq!(rows[0].document_owner, "");
    assert_eq!(rows[0].description, "Etsy payout");
}
