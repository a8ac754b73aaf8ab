// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Transaction, TxType};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeSummary {
    pub categories: BTreeMap<String, Decimal>,
    pub total: Decimal,
}

/// USD totals per type and category for one view of the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub income: TypeSummary,
    pub expense: TypeSummary,
    pub net: Decimal,
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut s = Summary::default();
    for t in transactions {
        let bucket = match t.r#type {
            TxType::Income => &mut s.income,
            TxType::Expense => &mut s.expense,
        };
        let category = if t.category.trim().is_empty() {
            "Other".to_string()
        } else {
            t.category.clone()
        };
        *bucket.categories.entry(category).or_insert(Decimal::ZERO) += t.usd_value;
        bucket.total += t.usd_value;
    }
    s.net = s.income.total - s.expense.total;
    s
}
