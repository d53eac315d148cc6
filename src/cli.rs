// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print as pretty JSON")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Month to operate on (defaults to the current month)")
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .about("Monthly personal-finance tracker")
        .subcommand_required(false)
        .subcommand(
            Command::new("dashboard")
                .about("Show the summary and transactions for a month")
                .arg(month_arg())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_name("income|expense"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("date").long("date").required(true).value_name("YYYY-MM-DD"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .about("List a month's transactions")
                        .arg(month_arg())
                        .arg(json_flag()),
                ),
        )
        .subcommand(
            Command::new("target")
                .about("Manage income goals and expense ceilings")
                .subcommand(
                    Command::new("set")
                        .about("Create a target")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_name("income|expense"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(
                    Command::new("update")
                        .about("Change a target's amount")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a target")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(Command::new("list").about("List targets").arg(json_flag())),
        )
        .subcommand(
            Command::new("notify")
                .about("Manage notifications")
                .subcommand(Command::new("list").about("List notifications").arg(json_flag()))
                .subcommand(
                    Command::new("read")
                        .about("Mark a notification as read")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a notification")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(Command::new("clear-read").about("Delete all read notifications")),
        )
}
