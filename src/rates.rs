// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Currency;

/// Currency -> USD conversion rates (1 unit of the currency = `rate` USD).
///
/// A single table is shared by the write path, where it fixes `usdValue`, and
/// by the client, where it only produces a display estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: BTreeMap<String, Decimal>,
}

impl Default for RateTable {
    fn default() -> Self {
        let rates = [
            ("USD", Decimal::ONE),
            ("CAD", Decimal::new(75, 2)),
            ("TRY", Decimal::new(30, 3)),
            ("CNY", Decimal::new(14, 2)),
            ("EUR", Decimal::new(105, 2)),
            ("GBP", Decimal::new(125, 2)),
        ]
        .into_iter()
        .map(|(c, r)| (c.to_string(), r))
        .collect();
        RateTable { rates }
    }
}

impl RateTable {
    /// Rate for `ccy`; a currency missing from the table converts 1:1.
    pub fn rate(&self, ccy: Currency) -> Decimal {
        self.rates.get(ccy.code()).copied().unwrap_or(Decimal::ONE)
    }

    pub fn set_rate(&mut self, ccy: Currency, rate: Decimal) {
        self.rates.insert(ccy.code().to_string(), rate);
    }

    /// Overlay configured rates on top of the defaults.
    pub fn merged(mut self, overrides: &RateTable) -> Self {
        for (code, rate) in &overrides.rates {
            self.rates.insert(code.to_ascii_uppercase(), *rate);
        }
        self
    }

    pub fn to_usd(&self, amount: Decimal, ccy: Currency) -> Decimal {
        let mut usd = (amount * self.rate(ccy))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        usd.rescale(2);
        usd
    }
}
