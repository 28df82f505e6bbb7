// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::confirmer;
use crate::error::{FinanceError, validation};
use crate::models::{Category, Frequency, RecurringTemplate, TxType};
use crate::store::{Store, load_categories};
use crate::utils::{
    arg, category_name, check_amount, find_category, fmt_money, get_currency_symbol,
    maybe_print_json, non_empty, opt_arg, parse_id, parse_positive, pretty_table,
};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("toggle", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let mut store: Store<RecurringTemplate> = Store::load(conn)?;
            let active = toggle(conn, &mut store, id)?;
            println!(
                "Recurring {} is now {}",
                id,
                if active { "active" } else { "paused" }
            );
        }
        Some(("rm", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let mut store: Store<RecurringTemplate> = Store::load(conn)?;
            match store.remove(conn, id, confirmer(sub))? {
                Some(r) => println!("Removed recurring '{}'", r.description),
                None => println!("Aborted"),
            }
        }
        _ => {}
    }
    Ok(())
}

/// Templates are only stored; nothing turns them into transactions.
pub fn new_template(
    id: i64,
    description: &str,
    amount: Decimal,
    tx_type: TxType,
    frequency: Frequency,
    day_of_month: u32,
    category: Option<&Category>,
) -> Result<RecurringTemplate, FinanceError> {
    if amount <= Decimal::ZERO {
        return Err(validation("Amount must be greater than zero"));
    }
    check_amount(amount)?;
    if !(1..=31).contains(&day_of_month) {
        return Err(validation(format!(
            "Day of month must be between 1 and 31, got {}",
            day_of_month
        )));
    }
    // only expense templates carry a category
    let category_id = match (tx_type, category) {
        (TxType::Expense, Some(c)) => {
            if !c.r#type.applies_to(TxType::Expense) {
                return Err(FinanceError::CategoryNotApplicable {
                    category: c.name.clone(),
                    tx_type: tx_type.to_string(),
                });
            }
            Some(c.id)
        }
        _ => None,
    };
    Ok(RecurringTemplate {
        id,
        description: non_empty(description, "Description")?,
        amount,
        r#type: tx_type,
        frequency,
        day_of_month,
        category_id,
        active: true,
        created_at: Utc::now(),
    })
}

/// Flip `active`, returning the new value.
pub fn toggle(conn: &Connection, store: &mut Store<RecurringTemplate>, id: i64) -> Result<bool> {
    store.modify(conn, id, |r| {
        r.active = !r.active;
        Ok(r.active)
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let categories = load_categories(conn)?;
    let category = match opt_arg(sub, "category") {
        Some(key) => Some(find_category(categories.items(), key)?),
        None => None,
    };
    let mut store: Store<RecurringTemplate> = Store::load(conn)?;
    let template = new_template(
        store.next_id(),
        arg(sub, "description")?,
        parse_positive(arg(sub, "amount")?, "Amount")?,
        arg(sub, "type")?.parse()?,
        arg(sub, "frequency")?.parse()?,
        sub.get_one::<u32>("day").copied().unwrap_or(1),
        category,
    )?;
    let template = store.insert(conn, template)?;
    println!(
        "Added recurring '{}' ({}, id {})",
        template.description,
        template.frequency.label(),
        template.id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let store: Store<RecurringTemplate> = Store::load(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &store.items())? {
        return Ok(());
    }
    let categories = load_categories(conn)?;
    let symbol = get_currency_symbol(conn)?;
    let rows = store
        .items()
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.description.clone(),
                r.r#type.to_string(),
                fmt_money(&r.amount, &symbol),
                r.frequency.label().to_string(),
                r.day_of_month.to_string(),
                if r.category_id.is_some() {
                    category_name(categories.items(), r.category_id).to_string()
                } else {
                    String::new()
                },
                if r.active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Description", "Type", "Amount", "Frequency", "Day", "Category", "Active"],
            rows
        )
    );
    Ok(())
}
