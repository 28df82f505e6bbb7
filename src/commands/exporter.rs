// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::totals;
use crate::error::FinanceError;
use crate::models::{Category, Transaction};
use crate::store::{Store, load_categories};
use crate::utils::{arg, category_name, fmt_date_pt, opt_arg};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde_json::{Value, json};
use std::io::Write;

pub const CSV_HEADER: [&str; 5] = ["Data", "Descrição", "Tipo", "Categoria", "Valor"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let fmt = arg(m, "format")?.trim().to_lowercase();
    if fmt != "csv" && fmt != "json" {
        return Err(FinanceError::UnknownFormat(fmt).into());
    }
    let out = match opt_arg(m, "out") {
        Some(p) => p.to_string(),
        None => format!("financas_{}.{}", Utc::now().format("%Y-%m-%d"), fmt),
    };

    let txs: Store<Transaction> = Store::load(conn)?;
    let categories = load_categories(conn)?;
    let file = std::fs::File::create(&out).with_context(|| format!("Create {}", out))?;
    if fmt == "csv" {
        write_csv(file, txs.items(), categories.items())?;
    } else {
        let doc = json_export(txs.items(), categories.items(), Utc::now());
        write_pretty(file, &doc)?;
    }
    tracing::info!(path = %out, format = %fmt, count = txs.len(), "exported transactions");
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}

/// One row per transaction, category resolved by id, amount with two decimals.
pub fn write_csv<W: Write>(w: W, transactions: &[Transaction], categories: &[Category]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(CSV_HEADER)?;
    for t in transactions {
        wtr.write_record([
            fmt_date_pt(t.date),
            t.description.clone(),
            t.r#type.label().to_string(),
            category_name(categories, t.category_id).to_string(),
            format!("{:.2}", t.amount),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn json_export(
    transactions: &[Transaction],
    categories: &[Category],
    exported_at: DateTime<Utc>,
) -> Value {
    let t = totals(transactions);
    json!({
        "exportDate": exported_at.to_rfc3339(),
        "transactions": transactions,
        "categories": categories,
        "stats": {
            "totalTransactions": transactions.len(),
            "totalIncome": t.income,
            "totalExpenses": t.expenses,
        }
    })
}

pub(crate) fn write_pretty<W: Write, T: serde::Serialize>(mut w: W, v: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut w, v)?;
    w.flush()?;
    Ok(())
}
