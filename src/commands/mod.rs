// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod archive;
pub mod categories;
pub mod exporter;
pub mod reports;
pub mod serve;
pub mod transactions;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::client::{HttpTransport, LocalTransport, SyncClient, Transport};
use crate::config::Config;
use crate::models::Transaction;
use crate::service::LedgerService;

/// What every command runs against: the sync client and, when working on the
/// local store, the service behind it.
pub struct Ctx {
    pub config: Config,
    pub client: SyncClient<Box<dyn Transport>>,
    pub service: Option<Arc<LedgerService>>,
}

impl Ctx {
    pub fn connect(config: Config) -> Result<Ctx> {
        match config.endpoint.clone() {
            Some(endpoint) => {
                let transport = HttpTransport::new(endpoint, config.request_timeout())
                    .context("Build HTTP client")?;
                let client = SyncClient::new(
                    Box::new(transport) as Box<dyn Transport>,
                    config.refresh_delay(),
                );
                Ok(Ctx {
                    config,
                    client,
                    service: None,
                })
            }
            None => Ctx::local(config),
        }
    }

    pub fn local(config: Config) -> Result<Ctx> {
        let service = Arc::new(LedgerService::from_config(&config)?);
        let transport = LocalTransport::new(Arc::clone(&service));
        let client = SyncClient::new(
            Box::new(transport) as Box<dyn Transport>,
            config.refresh_delay(),
        );
        Ok(Ctx {
            config,
            client,
            service: Some(service),
        })
    }

    /// Select `year` (or keep the current selection) and return its rows.
    pub fn load_year(&self, year: Option<&String>) -> Result<Vec<Transaction>> {
        match year {
            Some(y) => self.client.select_year(y.trim())?,
            None => self.client.refresh()?,
        }
        Ok(self.client.transactions())
    }
}
