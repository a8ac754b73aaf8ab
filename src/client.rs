// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Local};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Transaction, TransactionInput};
use crate::protocol::Request;
use crate::service::LedgerService;
use crate::utils::http_client;
use crate::years::sort_years_desc;

/// How the client reaches the ledger endpoint.
pub trait Transport: Send + Sync + 'static {
    /// `GET ?year=Y`; the raw JSON so a non-array answer can be tolerated.
    fn fetch_transactions(&self, year: &str) -> LedgerResult<Value>;
    /// `GET ?action=getYears`.
    fn fetch_years(&self) -> LedgerResult<Value>;
    /// Fire a write. The reply body is not inspected.
    fn post(&self, body: &Value) -> LedgerResult<()>;
}

pub struct HttpTransport {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> LedgerResult<Self> {
        Ok(HttpTransport {
            endpoint: endpoint.into(),
            client: http_client(timeout)?,
        })
    }
}

impl Transport for HttpTransport {
    fn fetch_transactions(&self, year: &str) -> LedgerResult<Value> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("year", year)])
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    fn fetch_years(&self) -> LedgerResult<Value> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("action", "getYears")])
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    fn post(&self, body: &Value) -> LedgerResult<()> {
        self.client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(serde_json::to_string(body)?)
            .send()?;
        Ok(())
    }
}

/// Talks to a service in the same process, without HTTP.
pub struct LocalTransport {
    service: Arc<LedgerService>,
}

impl LocalTransport {
    pub fn new(service: Arc<LedgerService>) -> Self {
        LocalTransport { service }
    }
}

impl Transport for LocalTransport {
    fn fetch_transactions(&self, year: &str) -> LedgerResult<Value> {
        match self.service.read(Some(year)) {
            Ok(rows) => Ok(serde_json::to_value(rows)?),
            Err(err) => Ok(serde_json::to_value(crate::protocol::Reply::error(&err))?),
        }
    }

    fn fetch_years(&self) -> LedgerResult<Value> {
        Ok(serde_json::to_value(self.service.years())?)
    }

    fn post(&self, body: &Value) -> LedgerResult<()> {
        let reply = self.service.handle_json(&body.to_string());
        tracing::trace!(?reply, "local write answered");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    LoadFailed(String),
}

#[derive(Debug)]
struct View {
    selected_year: String,
    years: Vec<String>,
    transactions: Vec<Transaction>,
    load: LoadState,
}

/// Local view of one year's transactions, kept in step with the endpoint.
///
/// Every read is tagged with a generation number and only the most recently
/// issued read may land, so a slow answer for an old year selection cannot
/// overwrite a newer one. After a write the view is re-read once after
/// `refresh_delay`, on a detached timer.
pub struct SyncClient<T: Transport> {
    transport: Arc<T>,
    view: Arc<Mutex<View>>,
    generation: Arc<AtomicU64>,
    refresh_delay: Duration,
}

impl<T: Transport> Clone for SyncClient<T> {
    fn clone(&self) -> Self {
        SyncClient {
            transport: Arc::clone(&self.transport),
            view: Arc::clone(&self.view),
            generation: Arc::clone(&self.generation),
            refresh_delay: self.refresh_delay,
        }
    }
}

impl<T: Transport> SyncClient<T> {
    /// Starts out on the current calendar year, nothing loaded.
    pub fn new(transport: T, refresh_delay: Duration) -> Self {
        SyncClient {
            transport: Arc::new(transport),
            view: Arc::new(Mutex::new(View {
                selected_year: Local::now().year().to_string(),
                years: Vec::new(),
                transactions: Vec::new(),
                load: LoadState::Idle,
            })),
            generation: Arc::new(AtomicU64::new(0)),
            refresh_delay,
        }
    }

    pub fn selected_year(&self) -> String {
        self.view.lock().selected_year.clone()
    }

    pub fn years(&self) -> Vec<String> {
        self.view.lock().years.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.view.lock().transactions.clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.view.lock().load.clone()
    }

    /// Refresh the list of archive years. An empty or unusable answer keeps
    /// the current list.
    pub fn load_years(&self) -> LedgerResult<Vec<String>> {
        match self.transport.fetch_years()? {
            Value::Array(items) => {
                let years: Vec<String> = items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect();
                let mut view = self.view.lock();
                if !years.is_empty() {
                    view.years = years;
                }
                Ok(view.years.clone())
            }
            other => {
                tracing::warn!(response = %other, "year list was not an array");
                Ok(self.years())
            }
        }
    }

    /// Switch to `year` and read it.
    pub fn select_year(&self, year: &str) -> LedgerResult<()> {
        self.view.lock().selected_year = year.to_string();
        self.refresh()
    }

    /// Add a year to the local list and select it. Nothing is created on the
    /// endpoint; the year only becomes real once it is archived.
    /// Returns false if the year was already listed.
    pub fn add_year(&self, year: &str) -> LedgerResult<bool> {
        let year = year.trim();
        if year.is_empty() {
            return Err(LedgerError::InvalidRequest("Year is required".into()));
        }
        let added = {
            let mut view = self.view.lock();
            if view.years.iter().any(|y| y == year) {
                false
            } else {
                view.years.push(year.to_string());
                sort_years_desc(&mut view.years);
                true
            }
        };
        self.select_year(year)?;
        Ok(added)
    }

    /// Read the selected year into the view.
    pub fn refresh(&self) -> LedgerResult<()> {
        let year = self.selected_year();
        load_into(&*self.transport, &self.view, &self.generation, &year)
    }

    pub fn create(&self, input: &TransactionInput) -> LedgerResult<()> {
        self.write(Request::Create {
            input: input.clone(),
        })
    }

    pub fn update(&self, id: &str, input: &TransactionInput) -> LedgerResult<()> {
        self.write(Request::Update {
            id: id.to_string(),
            input: input.clone(),
        })
    }

    pub fn delete(&self, ids: &[String]) -> LedgerResult<()> {
        self.write(Request::Delete { ids: ids.to_vec() })
    }

    /// Ask the endpoint to archive `year`. The year is sent as given, not
    /// replaced by the selected one.
    pub fn backup(&self, year: &str) -> LedgerResult<()> {
        let body = Request::Backup {
            year: Some(year.to_string()),
        }
        .to_body(None)?;
        self.transport.post(&body)
    }

    fn write(&self, request: Request) -> LedgerResult<()> {
        let year = self.selected_year();
        let body = request.to_body(Some(&year))?;
        if let Err(err) = self.transport.post(&body) {
            tracing::error!(action = request.action(), error = %err, "write failed");
            return Err(err);
        }
        self.schedule_refresh();
        Ok(())
    }

    /// Re-read the selected year after `refresh_delay`. Nothing keeps a handle
    /// to the timer; if the selection moves on first, the re-read is dropped.
    pub fn schedule_refresh(&self) {
        let transport = Arc::clone(&self.transport);
        let view = Arc::clone(&self.view);
        let generation = Arc::clone(&self.generation);
        let delay = self.refresh_delay;
        let year = self.selected_year();
        thread::spawn(move || {
            thread::sleep(delay);
            if view.lock().selected_year != year {
                tracing::debug!(%year, "selection changed, skipping delayed refresh");
                return;
            }
            if let Err(err) = load_into(&*transport, &view, &generation, &year) {
                tracing::warn!(%year, error = %err, "delayed refresh failed");
            }
        });
    }
}

fn load_into<T: Transport + ?Sized>(
    transport: &T,
    view: &Mutex<View>,
    generation: &AtomicU64,
    year: &str,
) -> LedgerResult<()> {
    let ticket = generation.fetch_add(1, Ordering::SeqCst) + 1;
    {
        let mut v = view.lock();
        if generation.load(Ordering::SeqCst) == ticket {
            v.load = LoadState::Loading;
        }
    }

    let response = transport.fetch_transactions(year);

    let mut view = view.lock();
    if generation.load(Ordering::SeqCst) != ticket {
        tracing::debug!(year, ticket, "discarding superseded read");
        return Ok(());
    }
    match response {
        Ok(Value::Array(items)) => {
            match serde_json::from_value::<Vec<Transaction>>(Value::Array(items)) {
                Ok(rows) => view.transactions = rows,
                Err(err) => {
                    let err = LedgerError::MalformedResponse(err.to_string());
                    tracing::warn!(year, error = %err, "treating read as empty");
                    view.transactions.clear();
                }
            }
            view.load = LoadState::Loaded;
            Ok(())
        }
        Ok(other) => {
            let err = LedgerError::MalformedResponse(format!("expected an array, got {}", other));
            tracing::warn!(year, error = %err, "treating read as empty");
            view.transactions.clear();
            view.load = LoadState::Loaded;
            Ok(())
        }
        Err(err) => {
            tracing::error!(year, error = %err, "read failed");
            view.load = LoadState::LoadFailed(err.to_string());
            Err(err)
        }
    }
}

impl Transport for Box<dyn Transport> {
    fn fetch_transactions(&self, year: &str) -> LedgerResult<Value> {
        (**self).fetch_transactions(year)
    }

    fn fetch_years(&self) -> LedgerResult<Value> {
        (**self).fetch_years()
    }

    fn post(&self, body: &Value) -> LedgerResult<()> {
        (**self).post(body)
    }
}
