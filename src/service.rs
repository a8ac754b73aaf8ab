// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Context;
use std::fs;
use std::time::Duration;

use crate::archive::{ArchiveReceipt, archive_year};
use crate::config::Config;
use crate::db::RecordStore;
use crate::error::{LedgerError, LedgerResult};
use crate::layout::StoreLayout;
use crate::lock::WriteGate;
use crate::models::{Transaction, TransactionInput};
use crate::protocol::{Reply, Request};
use crate::rates::RateTable;
use crate::router::resolve_read_target;
use crate::years::list_years;

/// Outcome of a batch delete. Missing IDs do not stop the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub missing: Vec<String>,
}

/// Server side of the ledger: reads are routed per year, writes go to the
/// live store behind the write gate.
#[derive(Debug)]
pub struct LedgerService {
    layout: StoreLayout,
    gate: WriteGate,
    rates: RateTable,
}

impl LedgerService {
    /// Bootstrap (or upgrade) the live store and get ready to serve.
    pub fn open(layout: StoreLayout, rates: RateTable, lock_timeout: Duration) -> LedgerResult<Self> {
        fs::create_dir_all(layout.data_dir())?;
        RecordStore::open(&layout.live_path())?;
        tracing::debug!(live = %layout.live_path().display(), "live store ready");
        Ok(LedgerService {
            layout,
            gate: WriteGate::new(lock_timeout),
            rates,
        })
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let layout = StoreLayout::new(cfg.data_dir()?, &cfg.tenant, &cfg.archive_folder);
        LedgerService::open(layout, cfg.rates.clone(), cfg.lock_timeout())
            .context("Open live store")
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn gate(&self) -> &WriteGate {
        &self.gate
    }

    /// Transactions for `year`, newest first. Falls back to the live store
    /// when there is no usable archive for that year.
    pub fn read(&self, year: Option<&str>) -> LedgerResult<Vec<Transaction>> {
        let target = resolve_read_target(&self.layout, year);
        if target.is_live() {
            return self.live()?.list_all();
        }
        match RecordStore::open_read_only(target.path()).and_then(|s| s.list_all()) {
            Ok(rows) => Ok(rows),
            Err(err) => {
                tracing::warn!(
                    archive = %target.path().display(),
                    error = %err,
                    "archive unreadable, reading live store"
                );
                self.live()?.list_all()
            }
        }
    }

    pub fn years(&self) -> Vec<String> {
        list_years(&self.layout.archive_root())
    }

    fn live(&self) -> LedgerResult<RecordStore> {
        RecordStore::open_existing(&self.layout.live_path())
    }

    pub fn create(&self, input: &TransactionInput) -> LedgerResult<String> {
        let _guard = self.gate.acquire()?;
        let id = self.live()?.append(input, &self.rates)?;
        tracing::info!(%id, "transaction created");
        Ok(id)
    }

    pub fn update(&self, id: &str, input: &TransactionInput) -> LedgerResult<()> {
        let _guard = self.gate.acquire()?;
        self.live()?.update_by_id(id, input, &self.rates)?;
        tracing::info!(id, "transaction updated");
        Ok(())
    }

    /// Delete IDs one at a time, re-reading the rows before each deletion
    /// since every deletion shifts the positions after it.
    pub fn delete(&self, ids: &[String]) -> LedgerResult<DeleteReport> {
        let _guard = self.gate.acquire()?;
        let store = self.live()?;
        let mut report = DeleteReport::default();
        for id in ids {
            match store.delete_by_id(id) {
                Ok(()) => report.deleted.push(id.clone()),
                Err(LedgerError::IdNotFound(missing)) => {
                    tracing::warn!(id = %missing, "delete target not found");
                    report.missing.push(missing);
                }
                Err(err) => return Err(err),
            }
        }
        tracing::info!(
            deleted = report.deleted.len(),
            missing = report.missing.len(),
            "batch delete finished"
        );
        Ok(report)
    }

    pub fn backup(&self, year: Option<&str>) -> LedgerResult<ArchiveReceipt> {
        let year = year
            .map(str::trim)
            .filter(|y| !y.is_empty())
            .ok_or_else(|| LedgerError::InvalidRequest("Year is required".into()))?;
        let _guard = self.gate.acquire()?;
        archive_year(&self.layout, &self.live()?, year)
    }

    /// Run a write request and fold any failure into an error reply.
    pub fn handle(&self, request: Request) -> Reply {
        let action = request.action();
        let outcome = match request {
            Request::Create { input } => self.create(&input).map(Reply::created),
            Request::Update { id, input } => self.update(&id, &input).map(|_| Reply::success()),
            Request::Delete { ids } => self.delete(&ids).map(|report| {
                let mut reply = Reply::success();
                if !report.missing.is_empty() {
                    reply = reply.with_message(format!(
                        "{} deleted; ID not found: {}",
                        report.deleted.len(),
                        report.missing.join(", ")
                    ));
                }
                reply.missing = report.missing;
                reply
            }),
            Request::Backup { year } => self
                .backup(year.as_deref())
                .map(|receipt| Reply::success().with_message(receipt.message())),
        };
        outcome.unwrap_or_else(|err| {
            tracing::warn!(action, error = %err, "write request failed");
            Reply::error(&err)
        })
    }

    pub fn handle_json(&self, raw: &str) -> Reply {
        match Request::from_json(raw) {
            Ok(request) => self.handle(request),
            Err(err) => Reply::error(&err),
        }
    }
}
