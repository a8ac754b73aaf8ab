// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use ledgerbook::commands::{self, Ctx};
use ledgerbook::config::Config;
use ledgerbook::{cli, service::LedgerService};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut config = Config::load(matches.get_one::<String>("config").map(Path::new))?;
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        config.endpoint = Some(endpoint.clone());
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            let service = LedgerService::from_config(&config)?;
            println!(
                "Live store ready at {}",
                service.layout().live_path().display()
            );
        }
        Some(("serve", sub)) => commands::serve::handle(&config, sub)?,
        Some((name, sub)) => {
            let ctx = Ctx::connect(config)?;
            match name {
                "tx" => commands::transactions::handle(&ctx, sub)?,
                "years" => commands::archive::handle_years(&ctx)?,
                "year" => commands::archive::handle_year(&ctx, sub)?,
                "backup" => commands::archive::handle_backup(&ctx, sub)?,
                "summary" => commands::reports::handle(&ctx, sub)?,
                "export" => commands::exporter::handle(&ctx, sub)?,
                "category" => commands::categories::handle(&ctx, sub)?,
                "history" => commands::categories::handle_history(&ctx, sub)?,
                _ => {}
            }
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
