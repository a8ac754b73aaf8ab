// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Column headers of a store, in physical column order. They double as the
/// JSON field names of a transaction on the wire.
pub const HEADERS: [&str; 11] = [
    "ID",
    "Date",
    "Type",
    "Category",
    "Document Owner",
    "Description",
    "Amount",
    "Currency",
    "USD Value",
    "Invoice No",
    "Timestamp",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }
}

impl FromStr for TxType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            other => Err(LedgerError::InvalidRequest(format!(
                "Unknown transaction type '{}' (use income|expense)",
                other
            ))),
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    USD,
    CAD,
    TRY,
    CNY,
    EUR,
    GBP,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::USD,
        Currency::CAD,
        Currency::TRY,
        Currency::CNY,
        Currency::EUR,
        Currency::GBP,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::CAD => "CAD",
            Currency::TRY => "TRY",
            Currency::CNY => "CNY",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }
}

impl FromStr for Currency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| LedgerError::InvalidRequest(format!("Unsupported currency '{}'", s)))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

macro_rules! text_column {
    ($ty:ty, $render:ident) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.$render()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: LedgerError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_column!(TxType, as_str);
text_column!(Currency, code);

/// The full set of user-supplied fields of a transaction. Create and update
/// both carry every field; `id`, `usdValue` and the timestamp are never taken
/// from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub date: NaiveDate,
    pub r#type: TxType,
    pub category: String,
    #[serde(default)]
    pub document_owner: String,
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    pub currency: Currency,
    #[serde(default)]
    pub invoice_no: String,
}

impl TransactionInput {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(LedgerError::InvalidRequest(format!(
                "Amount must be non-negative, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// One ledger entry as stored and as served to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Type")]
    pub r#type: TxType,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Document Owner", default)]
    pub document_owner: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
    #[serde(rename = "Currency")]
    pub currency: Currency,
    #[serde(rename = "USD Value")]
    pub usd_value: Decimal,
    #[serde(rename = "Invoice No", default)]
    pub invoice_no: String,
    #[serde(rename = "Timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// The editable part of the row, e.g. to prefill an update.
    pub fn input(&self) -> TransactionInput {
        TransactionInput {
            date: self.date,
            r#type: self.r#type,
            category: self.category.clone(),
            document_owner: self.document_owner.clone(),
            description: self.description.clone(),
            amount: self.amount,
            currency: self.currency,
            invoice_no: self.invoice_no.clone(),
        }
    }
}
