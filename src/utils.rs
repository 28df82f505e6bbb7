// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::{FinanceError, validation};
use crate::models::{Category, MAX_AMOUNT, UNCATEGORIZED};

pub const CURRENCY_SYMBOL_KEY: &str = "currency_symbol";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "€";

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid")
});

/// Value of an argument clap already enforces as required.
pub fn arg<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    m.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("Missing argument '{}'", id))
}

pub fn opt_arg<'a>(m: &'a clap::ArgMatches, id: &str) -> Option<&'a str> {
    m.get_one::<String>(id)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Any decimal whose magnitude stays within `MAX_AMOUNT`.
pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let d = s
        .trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))?;
    check_amount(d)?;
    Ok(d)
}

pub fn check_amount(d: Decimal) -> Result<(), FinanceError> {
    if d.abs() > MAX_AMOUNT {
        return Err(validation(format!(
            "Amount {} is larger than the maximum of {}",
            d, MAX_AMOUNT
        )));
    }
    Ok(())
}

/// Amounts on transactions, templates and goal targets must be strictly positive.
pub fn parse_positive(s: &str, what: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d <= Decimal::ZERO {
        return Err(validation(format!("{} must be greater than zero, got {}", what, d)).into());
    }
    Ok(d)
}

pub fn parse_non_negative(s: &str, what: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d < Decimal::ZERO {
        return Err(validation(format!("{} cannot be negative, got {}", what, d)).into());
    }
    Ok(d)
}

pub fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", s))
}

pub fn validate_color(s: &str) -> Result<String, FinanceError> {
    let s = s.trim();
    if HEX_COLOR.is_match(s) {
        Ok(s.to_uppercase())
    } else {
        Err(validation(format!("Invalid color '{}', expected #RRGGBB", s)))
    }
}

pub fn non_empty(s: &str, what: &str) -> Result<String, FinanceError> {
    let s = s.trim();
    if s.is_empty() {
        Err(validation(format!("{} cannot be empty", what)))
    } else {
        Ok(s.to_string())
    }
}

pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    format!("{:.2}{}", d.round_dp(2), symbol)
}

/// `+12.00€` / `−12.00€`, matching the dashboard sign convention.
pub fn fmt_signed(d: &Decimal, symbol: &str) -> String {
    if d.is_sign_negative() && !d.is_zero() {
        format!("−{}", fmt_money(&d.abs(), symbol))
    } else {
        format!("+{}", fmt_money(d, symbol))
    }
}

/// Day/month/year as written in Portuguese locales.
pub fn fmt_date_pt(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Resolve a category by id or, failing that, by case-insensitive name.
pub fn find_category<'a>(categories: &'a [Category], key: &str) -> Result<&'a Category> {
    let key = key.trim();
    if let Ok(id) = key.parse::<i64>() {
        if let Some(c) = categories.iter().find(|c| c.id == id) {
            return Ok(c);
        }
    }
    categories
        .iter()
        .find(|c| c.name.to_lowercase() == key.to_lowercase())
        .ok_or_else(|| FinanceError::UnknownCategory(key.to_string()).into())
}

/// Name for a category id, falling back to the uncategorized label when it does not resolve.
pub fn category_name(categories: &[Category], id: Option<i64>) -> &str {
    id.and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.as_str())
        .unwrap_or(UNCATEGORIZED)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_currency_symbol(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, CURRENCY_SYMBOL_KEY)?
        .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
