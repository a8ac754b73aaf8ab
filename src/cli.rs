// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn year_arg(required: bool) -> Arg {
    Arg::new("year")
        .long("year")
        .help("Four-digit year (defaults to the current year)")
        .required(required)
}

/// Transaction fields. `add` needs the core ones; `edit` keeps the stored
/// value for anything left out.
fn tx_fields(cmd: Command, is_add: bool) -> Command {
    let currency = Arg::new("currency")
        .long("currency")
        .help("USD, CAD, TRY, CNY, EUR or GBP");
    cmd.arg(
        Arg::new("date")
            .long("date")
            .required(is_add)
            .help("YYYY-MM-DD"),
    )
    .arg(
        Arg::new("type")
            .long("type")
            .required(is_add)
            .value_parser(["income", "expense"]),
    )
    .arg(Arg::new("category").long("category").required(is_add))
    .arg(Arg::new("amount").long("amount").required(is_add))
    .arg(if is_add {
        currency.default_value("USD")
    } else {
        currency
    })
    .arg(Arg::new("owner").long("owner").help("Document owner"))
    .arg(Arg::new("description").long("description"))
    .arg(Arg::new("invoice").long("invoice").help("Invoice number"))
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
        .arg(
            Arg::new("jsonl")
                .long("jsonl")
                .action(ArgAction::SetTrue)
                .conflicts_with("json"),
        )
}

pub fn build_cli() -> Command {
    Command::new("ledgerbook")
        .about("Year-partitioned income/expense ledger")
        .version(crate_version!())
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to config.toml"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .global(true)
                .help("Remote ledger endpoint; local store when omitted"),
        )
        .subcommand(Command::new("init").about("Create or upgrade the live store"))
        .subcommand(
            Command::new("serve")
                .about("Serve the ledger over HTTP")
                .arg(Arg::new("bind").long("bind").help("Address to listen on")),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(tx_fields(
                    Command::new("add").about("Record a transaction"),
                    true,
                ))
                .subcommand(tx_fields(
                    Command::new("edit")
                        .about("Change a transaction; omitted fields keep their stored value")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(year_arg(false).help("Year view to look the row up in")),
                    false,
                ))
                .subcommand(
                    Command::new("rm").about("Delete transactions").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .action(ArgAction::Append),
                    ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(year_arg(false))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(Command::new("years").about("List archived years"))
        .subcommand(
            Command::new("year").about("Year selector").subcommand(
                Command::new("add")
                    .about("Select a year that has no archive yet (this run only; not saved)")
                    .arg(Arg::new("year").required(true)),
            ),
        )
        .subcommand(
            Command::new("backup")
                .about("Archive the live store for a year")
                .arg(year_arg(true)),
        )
        .subcommand(json_flags(
            Command::new("summary")
                .about("USD totals per category")
                .arg(year_arg(false)),
        ))
        .subcommand(
            Command::new("export")
                .about("Export a year view")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .required(true)
                        .help("csv or json"),
                )
                .arg(Arg::new("out").long("out").required(true))
                .arg(year_arg(false)),
        )
        .subcommand(
            Command::new("category")
                .about("Local category taxonomy")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("list").arg(
                        Arg::new("type")
                            .long("type")
                            .value_parser(["income", "expense"]),
                    ),
                ),
        )
        .subcommand(
            Command::new("history")
                .about("Description history")
                .arg(Arg::new("prefix").long("prefix")),
        )
}
