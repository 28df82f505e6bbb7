// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

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

fn yes_flag() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Skip the confirmation question")
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).help("Record id")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Month as YYYY-MM (defaults to the current month)")
}

fn year_arg() -> Arg {
    Arg::new("year")
        .long("year")
        .value_parser(value_parser!(i32))
        .help("Calendar year (defaults to the current year)")
}

fn tx_command() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("expense")
                        .help("income|expense"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD (defaults to today)"),
                )
                .arg(Arg::new("description").long("description").short('d'))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .short('c')
                        .help("Category id or name"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions")
                .arg(month_arg())
                .arg(year_arg().conflicts_with("month"))
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .conflicts_with_all(["month", "year"])
                        .help("Every transaction regardless of date"),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("all")
                        .help("all|income|expense"),
                )
                .arg(Arg::new("search").long("search").short('s'))
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .default_value("date")
                        .help("date|amount|description"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Change fields of a transaction")
                .arg(id_arg())
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("description").long("description").short('d'))
                .arg(Arg::new("category").long("category").short('c'))
                .arg(
                    Arg::new("uncategorized")
                        .long("uncategorized")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("category")
                        .help("Clear the category"),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(id_arg())
                .arg(yes_flag()),
        )
}

fn category_command() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("color").long("color").default_value("#A85252"))
                .arg(Arg::new("icon").long("icon").default_value("📁"))
                .arg(Arg::new("budget").long("budget").default_value("0"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("expense")
                        .help("expense|income|both"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list").arg(
                Arg::new("type")
                    .long("type")
                    .help("Only categories usable for income|expense"),
            ),
        ))
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("color").long("color"))
                .arg(Arg::new("icon").long("icon"))
                .arg(Arg::new("budget").long("budget"))
                .arg(Arg::new("type").long("type")),
        )
        .subcommand(Command::new("rm").arg(id_arg()).arg(yes_flag()))
}

fn goal_command() -> Command {
    Command::new("goal")
        .about("Savings goals")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(
                    Arg::new("deadline")
                        .long("deadline")
                        .required(true)
                        .help("YYYY-MM-DD"),
                ),
        )
        .subcommand(json_flags(Command::new("list").arg(month_arg())))
        .subcommand(
            Command::new("deposit")
                .about("Add (or with a negative value, withdraw) an amount")
                .arg(id_arg())
                .arg(
                    Arg::new("amount")
                        .required(true)
                        .allow_negative_numbers(true)
                        .help("Signed amount, e.g. 10, 50, 100 or -25"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("target").long("target"))
                .arg(Arg::new("deadline").long("deadline"))
                .arg(Arg::new("saved").long("saved")),
        )
        .subcommand(Command::new("rm").arg(id_arg()).arg(yes_flag()))
}

fn recurring_command() -> Command {
    Command::new("recurring")
        .about("Recurring transaction templates (stored, never applied automatically)")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("description").long("description").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("type").long("type").default_value("expense"))
                .arg(
                    Arg::new("frequency")
                        .long("frequency")
                        .default_value("monthly")
                        .help("weekly|biweekly|monthly|yearly"),
                )
                .arg(
                    Arg::new("day")
                        .long("day")
                        .default_value("1")
                        .value_parser(value_parser!(u32)),
                )
                .arg(Arg::new("category").long("category").short('c')),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(Command::new("toggle").arg(id_arg()))
        .subcommand(Command::new("rm").arg(id_arg()).arg(yes_flag()))
}

fn tag_command() -> Command {
    Command::new("tag")
        .about("Manage tags")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("color").long("color")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(Command::new("rm").arg(id_arg()).arg(yes_flag()))
}

fn report_command() -> Command {
    Command::new("report")
        .about("Dashboards and analysis")
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Month balance, income and expenses")
                .arg(month_arg()),
        ))
        .subcommand(json_flags(
            Command::new("insights")
                .about("Month pace, projection and largest expenses")
                .arg(month_arg()),
        ))
        .subcommand(json_flags(
            Command::new("annual")
                .about("Month-by-month breakdown of a year")
                .arg(year_arg()),
        ))
        .subcommand(json_flags(
            Command::new("categories")
                .about("Spending per category against budget")
                .arg(month_arg()),
        ))
        .subcommand(json_flags(
            Command::new("compare")
                .about("Income vs expenses for each month of a year")
                .arg(year_arg()),
        ))
}

fn export_command() -> Command {
    Command::new("export")
        .about("Export transactions for spreadsheets or other tools")
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .default_value("csv")
                .help("csv|json"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .short('o')
                .help("Output file (defaults to financas_<date>.<format>)"),
        )
}

fn backup_command() -> Command {
    Command::new("backup")
        .about("Full backup and restore")
        .subcommand(
            Command::new("create").arg(
                Arg::new("out")
                    .long("out")
                    .short('o')
                    .help("Output file (defaults to backup_financas_<date>.json)"),
            ),
        )
        .subcommand(
            Command::new("restore")
                .about("Replace current data with a backup file")
                .arg(Arg::new("path").required(true))
                .arg(yes_flag()),
        )
}

fn config_command() -> Command {
    Command::new("config")
        .about("Settings")
        .subcommand(Command::new("show"))
        .subcommand(
            Command::new("set")
                .arg(Arg::new("key").required(true).help("currency_symbol"))
                .arg(Arg::new("value").required(true)),
        )
}

pub fn build_cli() -> Command {
    command!()
        .name("pocketbook")
        .subcommand(Command::new("init").about("Create the data file and seed defaults"))
        .subcommand(tx_command())
        .subcommand(category_command())
        .subcommand(goal_command())
        .subcommand(recurring_command())
        .subcommand(tag_command())
        .subcommand(report_command())
        .subcommand(export_command())
        .subcommand(backup_command())
        .subcommand(config_command())
}
