// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{
    TOP_N, annual_summary, category_spending, month_insights, spending_distribution,
    top_expenses, totals,
};
use crate::models::Transaction;
use crate::period::{Period, filter_month};
use crate::store::{Store, load_categories};
use crate::utils::{
    category_name, fmt_money, fmt_signed, get_currency_symbol, maybe_print_json, opt_arg,
    pretty_table,
};
use anyhow::Result;
use chrono::{Datelike, Local};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard(conn, sub)?,
        Some(("insights", sub)) => insights(conn, sub)?,
        Some(("annual", sub)) => annual(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("compare", sub)) => compare(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn selected_period(sub: &clap::ArgMatches) -> Result<Period> {
    match opt_arg(sub, "month") {
        Some(m) => Period::parse(m),
        None => Ok(Period::current()),
    }
}

fn selected_year(sub: &clap::ArgMatches) -> i32 {
    sub.get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| Local::now().year())
}

/// Shown as `—` in tables when a month has nothing.
fn or_dash(d: &Decimal, s: String) -> String {
    if d.is_zero() { "—".to_string() } else { s }
}

fn dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = selected_period(sub)?;
    let store: Store<Transaction> = Store::load(conn)?;
    let t = totals(&filter_month(store.items(), period));
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        return Ok(());
    }
    let symbol = get_currency_symbol(conn)?;
    println!("Balance for {}: {}", period, fmt_signed(&t.balance, &symbol));
    println!(
        "{}",
        pretty_table(
            &["", "Amount", "Entries"],
            vec![
                vec![
                    "Income".into(),
                    format!("+{}", fmt_money(&t.income, &symbol)),
                    t.income_count.to_string(),
                ],
                vec![
                    "Expenses".into(),
                    format!("−{}", fmt_money(&t.expenses, &symbol)),
                    t.expense_count.to_string(),
                ],
            ],
        )
    );
    Ok(())
}

fn insights(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = selected_period(sub)?;
    let store: Store<Transaction> = Store::load(conn)?;
    let month_txs = filter_month(store.items(), period);
    let today = Local::now().date_naive();
    let ins = month_insights(&month_txs, period, today);
    let top = top_expenses(&month_txs, TOP_N);

    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &json!({ "insights": ins, "topExpenses": top }),
    )? {
        return Ok(());
    }

    let symbol = get_currency_symbol(conn)?;
    // pace widgets only make sense while the month is running
    if ins.is_current_month {
        println!(
            "{}",
            pretty_table(
                &["Metric", "Value"],
                vec![
                    vec![
                        "Month progress".into(),
                        format!(
                            "{:.0}% (day {} of {})",
                            ins.month_progress, ins.current_day, ins.days_in_month
                        ),
                    ],
                    vec![
                        "Daily average".into(),
                        fmt_money(&ins.daily_average, &symbol),
                    ],
                    vec![
                        "Projected expenses".into(),
                        fmt_money(&ins.projected_expenses, &symbol),
                    ],
                    vec![
                        "Available per day".into(),
                        format!(
                            "{} ({} days left)",
                            fmt_money(&ins.daily_budget, &symbol),
                            ins.days_remaining
                        ),
                    ],
                ],
            )
        );
    }

    if top.is_empty() {
        println!("No expenses in {}", period);
        return Ok(());
    }
    let categories = load_categories(conn)?;
    let rows = top
        .iter()
        .enumerate()
        .map(|(i, t)| {
            vec![
                (i + 1).to_string(),
                t.date.format("%d %b").to_string(),
                t.description.clone(),
                category_name(categories.items(), t.category_id).to_string(),
                format!("−{}", fmt_money(&t.amount, &symbol)),
            ]
        })
        .collect();
    println!("Largest expenses");
    println!(
        "{}",
        pretty_table(&["#", "Date", "Description", "Category", "Amount"], rows)
    );
    Ok(())
}

fn annual(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = selected_year(sub);
    let store: Store<Transaction> = Store::load(conn)?;
    let summary = annual_summary(store.items(), year);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let symbol = get_currency_symbol(conn)?;

    println!("Year {}", year);
    println!(
        "{}",
        pretty_table(
            &["", "Income", "Expenses", "Balance", "Transactions"],
            vec![
                vec![
                    "Total".into(),
                    format!("+{}", fmt_money(&summary.totals.income, &symbol)),
                    format!("−{}", fmt_money(&summary.totals.expenses, &symbol)),
                    fmt_signed(&summary.totals.balance, &symbol),
                    summary.totals.transactions.to_string(),
                ],
                vec![
                    "Monthly average".into(),
                    fmt_money(&summary.average.income, &symbol),
                    fmt_money(&summary.average.expenses, &symbol),
                    fmt_signed(&summary.average.balance, &symbol),
                    String::new(),
                ],
            ],
        )
    );

    let rows = summary
        .months
        .iter()
        .map(|m| {
            vec![
                m.label.to_string(),
                or_dash(&m.income, format!("+{}", fmt_money(&m.income, &symbol))),
                or_dash(&m.expenses, format!("−{}", fmt_money(&m.expenses, &symbol))),
                or_dash(&m.balance, fmt_signed(&m.balance, &symbol)),
                m.count.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Balance", "Count"], rows)
    );
    if let (Some(best), Some(worst)) = (&summary.best_month, &summary.worst_month) {
        println!(
            "Best month: {} ({})  Worst month: {} ({})",
            best.label,
            fmt_signed(&best.balance, &symbol),
            worst.label,
            fmt_signed(&worst.balance, &symbol)
        );
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = selected_period(sub)?;
    let store: Store<Transaction> = Store::load(conn)?;
    let cats = load_categories(conn)?;
    let month_txs = filter_month(store.items(), period);
    let report = category_spending(&month_txs, cats.items());
    let shares = spending_distribution(&report);

    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &json!({ "categories": report, "distribution": shares }),
    )? {
        return Ok(());
    }
    let symbol = get_currency_symbol(conn)?;
    let rows = report
        .rows
        .iter()
        .map(|r| {
            vec![
                format!("{} {}", r.icon, r.name),
                fmt_money(&r.spent, &symbol),
                fmt_money(&r.budget, &symbol),
                if r.budget.is_zero() {
                    String::new()
                } else if r.over_budget() {
                    format!("over by {}", fmt_money(&(r.spent - r.budget), &symbol))
                } else {
                    format!("{} left", fmt_money(&r.remaining(), &symbol))
                },
            ]
        })
        .collect();
    println!("Spending vs budget, {}", period);
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Budget", "Status"], rows)
    );
    if !report.uncategorized.is_zero() {
        println!(
            "Uncategorized: {}",
            fmt_money(&report.uncategorized, &symbol)
        );
    }
    if !shares.is_empty() {
        let rows = shares
            .iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    fmt_money(&s.spent, &symbol),
                    format!("{:.1}%", s.percent),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Spent", "Share"], rows)
        );
    }
    Ok(())
}

fn compare(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = selected_year(sub);
    let store: Store<Transaction> = Store::load(conn)?;
    let summary = annual_summary(store.items(), year);
    let series: Vec<_> = summary
        .months
        .iter()
        .map(|m| json!({ "month": m.label, "income": m.income, "expenses": m.expenses }))
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        return Ok(());
    }
    let symbol = get_currency_symbol(conn)?;
    let peak = summary
        .months
        .iter()
        .flat_map(|m| [m.income, m.expenses])
        .max()
        .unwrap_or(Decimal::ZERO);
    let bar = |d: &Decimal| -> String {
        if peak.is_zero() {
            return String::new();
        }
        let n = (*d * Decimal::from(20) / peak).round().to_u32().unwrap_or(0);
        "▇".repeat(n as usize)
    };
    let rows = summary
        .months
        .iter()
        .map(|m| {
            vec![
                m.label.to_string(),
                fmt_money(&m.income, &symbol),
                bar(&m.income),
                fmt_money(&m.expenses, &symbol),
                bar(&m.expenses),
            ]
        })
        .collect();
    println!("Income vs expenses, {}", year);
    println!(
        "{}",
        pretty_table(&["Month", "Income", "", "Expenses", ""], rows)
    );
    Ok(())
}
