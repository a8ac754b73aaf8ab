// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::Config;
use crate::server::LedgerServer;
use crate::service::LedgerService;

pub fn handle(config: &Config, m: &clap::ArgMatches) -> Result<()> {
    let bind = m
        .get_one::<String>("bind")
        .cloned()
        .unwrap_or_else(|| config.bind.clone());
    let service = Arc::new(LedgerService::from_config(config)?);
    let server = LedgerServer::bind(&bind, service).context("Start ledger endpoint")?;
    server.run();
    Ok(())
}
