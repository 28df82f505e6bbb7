// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::confirmer;
use crate::error::{FinanceError, validation};
use crate::models::{Category, Transaction, TxType};
use crate::period::{Period, filter_month, filter_year};
use crate::store::{Store, load_categories};
use crate::utils::{
    arg, category_name, check_amount, find_category, fmt_money, get_currency_symbol,
    maybe_print_json, opt_arg, parse_date, parse_id, parse_positive, pretty_table,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Validate and assemble a transaction. An empty description falls back to
/// the category name, then to the type label. Both `tx add` and `tx edit` go
/// through here.
pub fn build_transaction(
    id: i64,
    date: NaiveDate,
    amount: Decimal,
    tx_type: TxType,
    description: Option<&str>,
    category: Option<&Category>,
) -> Result<Transaction, FinanceError> {
    if amount <= Decimal::ZERO {
        return Err(validation(format!(
            "Amount must be greater than zero, got {}",
            amount
        )));
    }
    check_amount(amount)?;
    if let Some(cat) = category {
        if !cat.r#type.applies_to(tx_type) {
            return Err(FinanceError::CategoryNotApplicable {
                category: cat.name.clone(),
                tx_type: tx_type.to_string(),
            });
        }
    }
    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .or_else(|| category.map(|c| c.name.clone()))
        .unwrap_or_else(|| tx_type.label().to_string());
    Ok(Transaction {
        id,
        date,
        description,
        amount,
        r#type: tx_type,
        category_id: category.map(|c| c.id),
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_positive(arg(sub, "amount")?, "Amount")?;
    let tx_type: TxType = arg(sub, "type")?.parse()?;
    let date = match opt_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let categories = load_categories(conn)?;
    let category = match opt_arg(sub, "category") {
        Some(key) => Some(find_category(categories.items(), key)?),
        None => None,
    };

    let mut store: Store<Transaction> = Store::load(conn)?;
    let tx = build_transaction(
        store.next_id(),
        date,
        amount,
        tx_type,
        opt_arg(sub, "description"),
        category,
    )?;
    let tx = store.insert(conn, tx)?;
    tracing::info!(id = tx.id, kind = %tx.r#type, "transaction recorded");
    println!(
        "Recorded {} {} on {} '{}' (id {})",
        tx.r#type,
        fmt_money(&tx.amount, &get_currency_symbol(conn)?),
        tx.date,
        tx.description,
        tx.id
    );
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
    /// Largest first.
    Amount,
    /// Alphabetical.
    Description,
}

impl std::str::FromStr for SortKey {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "description" => Ok(SortKey::Description),
            other => Err(validation(format!(
                "Invalid sort '{}', expected date|amount|description",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// `None` keeps both types.
    pub r#type: Option<TxType>,
    pub search: Option<String>,
    pub sort: SortKey,
    pub limit: Option<usize>,
}

/// Type filter, case-insensitive description search, then a stable sort.
pub fn query(transactions: &[Transaction], q: &ListQuery) -> Vec<Transaction> {
    let needle = q.search.as_deref().map(str::to_lowercase);
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| q.r#type.is_none_or(|ty| t.r#type == ty))
        .filter(|t| match &needle {
            Some(n) => t.description.to_lowercase().contains(n),
            None => true,
        })
        .cloned()
        .collect();
    match q.sort {
        SortKey::Date => out.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::Amount => out.sort_by(|a, b| b.amount.cmp(&a.amount)),
        SortKey::Description => {
            out.sort_by_key(|t| t.description.to_lowercase());
        }
    }
    if let Some(limit) = q.limit {
        out.truncate(limit);
    }
    out
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub r#type: String,
    pub category: String,
    pub amount: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let store: Store<Transaction> = Store::load(conn)?;
    let categories = load_categories(conn)?;

    let scoped = if sub.get_flag("all") {
        store.items().to_vec()
    } else if let Some(year) = sub.get_one::<i32>("year") {
        filter_year(store.items(), *year)
    } else {
        let period = match opt_arg(sub, "month") {
            Some(m) => Period::parse(m)?,
            None => Period::current(),
        };
        filter_month(store.items(), period)
    };

    let r#type = match arg(sub, "type")?.trim().to_lowercase().as_str() {
        "all" => None,
        other => Some(other.parse::<TxType>()?),
    };
    let q = ListQuery {
        r#type,
        search: opt_arg(sub, "search").map(str::to_string),
        sort: arg(sub, "sort")?.parse()?,
        limit: sub.get_one::<usize>("limit").copied(),
    };

    Ok(query(&scoped, &q)
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            category: category_name(categories.items(), t.category_id).to_string(),
            r#type: t.r#type.to_string(),
            amount: format!("{:.2}", t.amount),
            description: t.description,
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Type", "Category", "Amount"],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    let categories = load_categories(conn)?;
    let mut store: Store<Transaction> = Store::load(conn)?;
    let current = store.require(id)?.clone();

    let amount = match opt_arg(sub, "amount") {
        Some(a) => parse_positive(a, "Amount")?,
        None => current.amount,
    };
    let tx_type = match opt_arg(sub, "type") {
        Some(t) => t.parse()?,
        None => current.r#type,
    };
    let date = match opt_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => current.date,
    };
    let mut dangling = None;
    let category = if sub.get_flag("uncategorized") {
        None
    } else if let Some(key) = opt_arg(sub, "category") {
        Some(find_category(categories.items(), key)?)
    } else {
        match current.category_id {
            // a kept category that no longer fits the type is dropped
            Some(cid) => match categories.get(cid) {
                Some(cat) if cat.r#type.applies_to(tx_type) => Some(cat),
                Some(_) => None,
                None => {
                    dangling = Some(cid);
                    None
                }
            },
            None => None,
        }
    };
    let description = opt_arg(sub, "description").unwrap_or(current.description.as_str());

    let mut updated = build_transaction(id, date, amount, tx_type, Some(description), category)?;
    if dangling.is_some() {
        updated.category_id = dangling;
    }
    store.replace(conn, updated)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    let mut store: Store<Transaction> = Store::load(conn)?;
    match store.remove(conn, id, confirmer(sub))? {
        Some(t) => println!("Removed transaction {} '{}'", t.id, t.description),
        None => println!("Aborted"),
    }
    Ok(())
}
