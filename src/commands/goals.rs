// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::totals;
use crate::commands::confirmer;
use crate::error::validation;
use crate::goals::{GoalStatus, Transition, apply_delta, status};
use crate::models::{SavingsGoal, Transaction};
use crate::period::{Period, filter_month};
use crate::store::Store;
use crate::utils::{
    arg, check_amount, fmt_money, fmt_signed, get_currency_symbol, maybe_print_json, non_empty,
    opt_arg, parse_date, parse_decimal, parse_id, parse_non_negative, parse_positive, pretty_table,
};
use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

const BAR_WIDTH: u32 = 20;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("deposit", sub)) => deposit(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let mut store: Store<SavingsGoal> = Store::load(conn)?;
            match store.remove(conn, id, confirmer(sub))? {
                Some(g) => println!("Removed goal '{}'", g.name),
                None => println!("Aborted"),
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn new_goal(
    store: &Store<SavingsGoal>,
    name: &str,
    target: Decimal,
    deadline: NaiveDate,
    today: NaiveDate,
) -> Result<SavingsGoal> {
    if target <= Decimal::ZERO {
        return Err(validation("Target must be greater than zero").into());
    }
    check_amount(target)?;
    if deadline < today {
        return Err(validation(format!("Deadline {} is already in the past", deadline)).into());
    }
    Ok(SavingsGoal {
        id: store.next_id(),
        name: non_empty(name, "Goal name")?,
        target,
        deadline,
        saved: Decimal::ZERO,
        created_at: Utc::now(),
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut store: Store<SavingsGoal> = Store::load(conn)?;
    let goal = new_goal(
        &store,
        arg(sub, "name")?,
        parse_positive(arg(sub, "target")?, "Target")?,
        parse_date(arg(sub, "deadline")?)?,
        Local::now().date_naive(),
    )?;
    let goal = store.insert(conn, goal)?;
    println!("Created goal '{}' (id {})", goal.name, goal.id);
    Ok(())
}

/// Apply a signed delta to a goal's saved amount and persist it.
pub fn adjust_saved(
    conn: &Connection,
    store: &mut Store<SavingsGoal>,
    id: i64,
    delta: Decimal,
) -> Result<Transition> {
    let transition = store.modify(conn, id, |g| Ok(apply_delta(g, delta)))?;
    tracing::debug!(id, %delta, completed = transition.now_completed, "goal adjusted");
    Ok(transition)
}

fn deposit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    let delta = parse_decimal(arg(sub, "amount")?)?;
    let mut store: Store<SavingsGoal> = Store::load(conn)?;
    let transition = adjust_saved(conn, &mut store, id, delta)?;
    let goal = store.require(id)?;
    let symbol = get_currency_symbol(conn)?;
    println!(
        "'{}': {} / {}",
        goal.name,
        fmt_money(&goal.saved, &symbol),
        fmt_money(&goal.target, &symbol)
    );
    if transition.just_completed() {
        println!("🎉 Congratulations! Goal '{}' reached!", goal.name);
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    let mut store: Store<SavingsGoal> = Store::load(conn)?;
    store.modify(conn, id, |g| {
        if let Some(name) = opt_arg(sub, "name") {
            g.name = non_empty(name, "Goal name")?;
        }
        if let Some(target) = opt_arg(sub, "target") {
            g.target = parse_positive(target, "Target")?;
        }
        if let Some(deadline) = opt_arg(sub, "deadline") {
            g.deadline = parse_date(deadline)?;
        }
        if let Some(saved) = opt_arg(sub, "saved") {
            g.saved = parse_non_negative(saved, "Saved amount")?;
        }
        Ok(())
    })?;
    println!("Updated goal {}", id);
    Ok(())
}

#[derive(Serialize)]
struct GoalView<'a> {
    #[serde(flatten)]
    goal: &'a SavingsGoal,
    status: GoalStatus,
}

fn progress_bar(status: &GoalStatus) -> String {
    let pct = status.bar_percent();
    let filled = (pct * Decimal::from(BAR_WIDTH) / Decimal::ONE_HUNDRED)
        .floor()
        .to_u32()
        .unwrap_or(0)
        .min(BAR_WIDTH);
    format!(
        "{}{} {:.0}%",
        "█".repeat(filled as usize),
        "░".repeat((BAR_WIDTH - filled) as usize),
        status.progress
    )
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let store: Store<SavingsGoal> = Store::load(conn)?;
    let now = Local::now().naive_local();
    let views: Vec<GoalView> = store
        .items()
        .iter()
        .map(|g| GoalView {
            goal: g,
            status: status(g, now),
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &views)? {
        return Ok(());
    }

    let period = match opt_arg(sub, "month") {
        Some(m) => Period::parse(m)?,
        None => Period::current(),
    };
    let txs: Store<Transaction> = Store::load(conn)?;
    let savings = totals(&filter_month(txs.items(), period)).balance;
    let symbol = get_currency_symbol(conn)?;
    println!("Savings in {}: {}", period, fmt_signed(&savings, &symbol));

    if views.is_empty() {
        println!("No goals yet. Create one with `pocketbook goal add`.");
        return Ok(());
    }
    let rows = views
        .iter()
        .map(|v| {
            vec![
                v.goal.id.to_string(),
                v.goal.name.clone(),
                format!(
                    "{} / {}",
                    fmt_money(&v.goal.saved, &symbol),
                    fmt_money(&v.goal.target, &symbol)
                ),
                progress_bar(&v.status),
                v.goal.deadline.to_string(),
                v.status.describe(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Goal", "Saved", "Progress", "Deadline", "Status"],
            rows
        )
    );
    Ok(())
}
