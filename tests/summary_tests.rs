// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use ledgerbook::models::{Currency, Transaction, TxType};
use ledgerbook::summary::summarize;
use rust_decimal::Decimal;

fn tx(t: TxType, category: &str, usd: &str) -> Transaction {
    Transaction {
        id: category.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        r#type: t,
        category: category.to_string(),
        document_owner: String::new(),
        description: String::new(),
        amount: usd.parse().unwrap(),
        currency: Currency::USD,
        usd_value: usd.parse().unwrap(),
        invoice_no: String::new(),
        created_at: Utc::now(),
    }
}

#[test]
fn totals_per_type_and_category() {
    let rows = vec![
        tx(TxType::Income, "Sales", "100.00"),
        tx(TxType::Income, "Sales", "50.50"),
        tx(TxType::Income, "", "4.50"),
        tx(TxType::Expense, "Rent", "80.00"),
        tx(TxType::Expense, "Shipping", "12.25"),
    ];
    let s = summarize(&rows);
    assert_eq!(s.income.categories["Sales"], Decimal::new(15050, 2));
    assert_eq!(s.income.categories["Other"], Decimal::new(450, 2));
    assert_eq!(s.income.total, Decimal::new(15500, 2));
    assert_eq!(s.expense.total, Decimal::new(9225, 2));
    assert_eq!(s.net, Decimal::new(6275, 2));
}

#[test]
fn empty_view_sums_to_zero() {
    let s = summarize(&[]);
    assert!(s.income.categories.is_empty());
    assert_eq!(s.net, Decimal::ZERO);
}
