// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::StoredRow;

/// Index within `rows` of the first row whose ID equals `id`.
///
/// Positions are only meaningful for the snapshot they were computed from:
/// callers re-read the store before every lookup that feeds a destructive
/// operation and never keep an index across mutations.
pub fn find_row_index(rows: &[StoredRow], id: &str) -> Option<usize> {
    rows.iter().position(|r| r.tx.id == id)
}
