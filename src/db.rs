// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{Connection, OpenFlags, Row, params};
use rust_decimal::Decimal;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::locate::find_row_index;
use crate::models::{HEADERS, Transaction, TransactionInput};
use crate::rates::RateTable;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS header(
        position INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );

    -- pos is the physical row position; rows are never reordered
    CREATE TABLE IF NOT EXISTS rows(
        pos INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL,
        date TEXT NOT NULL,
        type TEXT NOT NULL,
        category TEXT NOT NULL,
        document_owner TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        usd_value TEXT NOT NULL,
        invoice_no TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL
    );
"#;

const SELECT_ROWS: &str = "SELECT pos, id, date, type, category, document_owner, description, \
     amount, currency, usd_value, invoice_no, created_at FROM rows ORDER BY pos";

/// A data row together with its physical position in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub pos: i64,
    pub tx: Transaction,
}

/// One tabular store: a header row plus data rows identified by opaque IDs.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open (creating if needed) a writable store and bring its schema up to date.
    pub fn open(path: &Path) -> LedgerResult<RecordStore> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))?;
        tracing::trace!(path = %path.display(), %mode, "opened store");
        let store = RecordStore { conn };
        store.setup()?;
        Ok(store)
    }

    /// Open an already bootstrapped store without touching its schema.
    pub fn open_existing(path: &Path) -> LedgerResult<RecordStore> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(RecordStore { conn })
    }

    /// Open an existing store for reading only. Archives are opened this way.
    pub fn open_read_only(path: &Path) -> LedgerResult<RecordStore> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(RecordStore { conn })
    }

    fn setup(&self) -> LedgerResult<()> {
        self.conn.execute_batch(SCHEMA)?;

        // Stores created before the owner column existed.
        let has_owner = self
            .conn
            .prepare("SELECT 1 FROM pragma_table_info('rows') WHERE name='document_owner'")?
            .exists([])?;
        if !has_owner {
            tracing::info!("adding Document Owner column to legacy store");
            self.conn.execute(
                "ALTER TABLE rows ADD COLUMN document_owner TEXT NOT NULL DEFAULT ''",
                [],
            )?;
        }

        let header = self.header()?;
        if header.first().map(String::as_str) != Some("ID") {
            self.write_header(&HEADERS.map(String::from))?;
        } else if !header.iter().any(|h| h == "Document Owner") {
            let mut upgraded = header;
            let at = upgraded
                .iter()
                .position(|h| h == "Category")
                .map(|i| i + 1)
                .unwrap_or(4)
                .min(upgraded.len());
            upgraded.insert(at, "Document Owner".to_string());
            self.write_header(&upgraded)?;
        }
        Ok(())
    }

    fn write_header(&self, names: &[String]) -> LedgerResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM header", [])?;
        for (i, name) in names.iter().enumerate() {
            tx.execute(
                "INSERT INTO header(position, name) VALUES (?1, ?2)",
                params![i as i64 + 1, name],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn header(&self) -> LedgerResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM header ORDER BY position")?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Every data row in physical order.
    pub fn snapshot(&self) -> LedgerResult<Vec<StoredRow>> {
        let mut stmt = self.conn.prepare(SELECT_ROWS)?;
        let rows = stmt.query_map([], stored_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// All transactions, newest first (reverse physical order).
    pub fn list_all(&self) -> LedgerResult<Vec<Transaction>> {
        Ok(self
            .snapshot()?
            .into_iter()
            .rev()
            .map(|r| r.tx)
            .collect())
    }

    /// Append a fully specified row and return its freshly assigned ID.
    pub fn append(&self, input: &TransactionInput, rates: &RateTable) -> LedgerResult<String> {
        input.validate()?;
        let id = Uuid::new_v4().to_string();
        let usd_value = rates.to_usd(input.amount, input.currency);
        self.conn.execute(
            "INSERT INTO rows(id, date, type, category, document_owner, description, amount, currency, usd_value, invoice_no, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id,
                input.date,
                input.r#type,
                input.category,
                input.document_owner,
                input.description,
                input.amount.to_string(),
                input.currency,
                usd_value.to_string(),
                input.invoice_no,
                Utc::now(),
            ],
        )?;
        Ok(id)
    }

    /// Replace every field of the row at `pos` except `id` and the timestamp.
    /// `usdValue` is recomputed from the new amount and currency.
    pub fn update_at(
        &self,
        pos: i64,
        input: &TransactionInput,
        rates: &RateTable,
    ) -> LedgerResult<bool> {
        input.validate()?;
        let usd_value = rates.to_usd(input.amount, input.currency);
        let changed = self.conn.execute(
            "UPDATE rows SET date=?1, type=?2, category=?3, document_owner=?4, description=?5,
                 amount=?6, currency=?7, usd_value=?8, invoice_no=?9
             WHERE pos=?10",
            params![
                input.date,
                input.r#type,
                input.category,
                input.document_owner,
                input.description,
                input.amount.to_string(),
                input.currency,
                usd_value.to_string(),
                input.invoice_no,
                pos,
            ],
        )?;
        Ok(changed == 1)
    }

    pub fn delete_at(&self, pos: i64) -> LedgerResult<bool> {
        let changed = self.conn.execute("DELETE FROM rows WHERE pos=?1", params![pos])?;
        Ok(changed == 1)
    }

    /// Resolve `id` against a fresh snapshot, then update that row.
    pub fn update_by_id(
        &self,
        id: &str,
        input: &TransactionInput,
        rates: &RateTable,
    ) -> LedgerResult<()> {
        let pos = self.locate(id)?;
        if !self.update_at(pos, input, rates)? {
            return Err(LedgerError::IdNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Resolve `id` against a fresh snapshot, then delete that row.
    pub fn delete_by_id(&self, id: &str) -> LedgerResult<()> {
        let pos = self.locate(id)?;
        if !self.delete_at(pos)? {
            return Err(LedgerError::IdNotFound(id.to_string()));
        }
        Ok(())
    }

    fn locate(&self, id: &str) -> LedgerResult<i64> {
        let rows = self.snapshot()?;
        find_row_index(&rows, id)
            .map(|i| rows[i].pos)
            .ok_or_else(|| LedgerError::IdNotFound(id.to_string()))
    }

    /// Write a consistent copy of the whole store to `dest`, which must not
    /// exist yet. The copy uses rollback journaling so it can be opened
    /// read-only later.
    pub fn copy_to(&self, dest: &Path) -> LedgerResult<()> {
        self.conn
            .execute("VACUUM INTO ?1", params![dest.to_string_lossy()])?;
        let copy = Connection::open(dest)?;
        let _mode: String =
            copy.pragma_update_and_check(None, "journal_mode", "DELETE", |r| r.get(0))?;
        Ok(())
    }
}

fn decimal_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = r.get(idx)?;
    raw.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn stored_row(r: &Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        pos: r.get(0)?,
        tx: Transaction {
            id: r.get(1)?,
            date: r.get(2)?,
            r#type: r.get(3)?,
            category: r.get(4)?,
            document_owner: r.get(5)?,
            description: r.get(6)?,
            amount: decimal_at(r, 7)?,
            currency: r.get(8)?,
            usd_value: decimal_at(r, 9)?,
            invoice_no: r.get(10)?,
            created_at: r.get(11)?,
        },
    })
}
