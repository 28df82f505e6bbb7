// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::db_path;
use crate::error::{FinanceError, validation};
use crate::utils::{CURRENCY_SYMBOL_KEY, arg, get_currency_symbol, pretty_table, set_setting};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![
                vec!["database".to_string(), db_path()?.display().to_string()],
                vec![CURRENCY_SYMBOL_KEY.to_string(), get_currency_symbol(conn)?],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set", sub)) => {
            let key = arg(sub, "key")?.trim();
            let value = arg(sub, "value")?.trim();
            set(conn, key, value)?;
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}

pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    match key {
        CURRENCY_SYMBOL_KEY => {
            if value.is_empty() {
                return Err(validation("Currency symbol cannot be empty").into());
            }
            set_setting(conn, key, value)
        }
        other => Err(FinanceError::UnknownSetting(other.to_string()).into()),
    }
}
