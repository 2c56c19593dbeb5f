// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Month as YYYY-MM (defaults to the current month)")
}

fn rates_file_arg() -> Arg {
    Arg::new("rates-file")
        .long("rates-file")
        .help("Read exchange rates from a JSON file instead of the rate service")
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Personal income and expense ledger with multi-currency display")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Record, list and revert transactions")
                .subcommand(
                    Command::new("income")
                        .about("Record income")
                        .arg(Arg::new("amount").required(true))
                        .arg(month_arg()),
                )
                .subcommand(
                    Command::new("expense")
                        .about("Record an expense")
                        .arg(Arg::new("amount").required(true))
                        .arg(Arg::new("category").long("category").short('c').required(true))
                        .arg(month_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(month_arg())
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("revert")
                        .about("Undo a transaction")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("icon").long("icon").default_value("tag"))
                        .arg(Arg::new("color").long("color").default_value("#94a3b8")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("icon").long("icon"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("currency")
                .about("Show or change the display currency")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .about("Convert every stored amount into a new currency")
                        .arg(Arg::new("currency").required(true))
                        .arg(rates_file_arg()),
                ),
        )
        .subcommand(
            Command::new("fx")
                .about("Exchange rates")
                .subcommand(
                    Command::new("convert")
                        .arg(Arg::new("amount").required(true))
                        .arg(Arg::new("from").required(true))
                        .arg(Arg::new("to").required(true))
                        .arg(rates_file_arg()),
                )
                .subcommand(json_flags(Command::new("rates").arg(rates_file_arg()))),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries")
                .subcommand(json_flags(Command::new("month").arg(month_arg())))
                .subcommand(json_flags(
                    Command::new("period").arg(
                        Arg::new("months")
                            .long("months")
                            .default_value("3")
                            .help("Number of months back, or 'all'"),
                    ),
                )),
        )
        .subcommand(
            Command::new("receipt")
                .about("Turn receipts into expenses")
                .subcommand(
                    Command::new("scan")
                        .about("Send raw QR data to the receipt service")
                        .arg(Arg::new("raw").required(true))
                        .arg(Arg::new("category").long("category").short('c').required(true))
                        .arg(month_arg())
                        .arg(rates_file_arg()),
                )
                .subcommand(
                    Command::new("add")
                        .about("Record an already parsed receipt")
                        .arg(Arg::new("total").long("total").required(true))
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(Arg::new("vendor").long("vendor").default_value(""))
                        .arg(Arg::new("category").long("category").short('c').required(true))
                        .arg(month_arg())
                        .arg(rates_file_arg()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(Command::new("snapshot").arg(Arg::new("out").long("out").required(true)))
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(Arg::new("format").long("format").default_value("csv")),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(Command::new("snapshot").arg(Arg::new("file").long("file").required(true))),
        )
        .subcommand(Command::new("doctor").about("Check cached totals against the transaction list"))
        .subcommand(Command::new("reset").about("Erase all data and restore default categories"))
}
