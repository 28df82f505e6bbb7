// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Backup files carry each stored list as an opaque JSON string, exactly as it
//! sits in the database, so a restore can put it back byte for byte.

use crate::commands::confirmer;
use crate::commands::exporter::write_pretty;
use crate::db::{load_blob, save_blob};
use crate::error::FinanceError;
use crate::models::{Category, RecurringTemplate, SavingsGoal, Tag, Transaction};
use crate::store::{AppState, Confirm, Record};
use crate::utils::{arg, opt_arg};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

pub const BACKUP_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub export_date: Option<String>,
    #[serde(default)]
    pub transactions: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub savings_goals: Option<String>,
    #[serde(default)]
    pub recurring_transactions: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl Backup {
    /// Every list present in the file, with the blob key and a parse check.
    fn fields(&self) -> Vec<Field<'_>> {
        let all: [(&'static str, &Option<String>, Check); 5] = [
            (Transaction::KEY, &self.transactions, check_list::<Transaction>),
            (Category::KEY, &self.categories, check_list::<Category>),
            (SavingsGoal::KEY, &self.savings_goals, check_list::<SavingsGoal>),
            (
                RecurringTemplate::KEY,
                &self.recurring_transactions,
                check_list::<RecurringTemplate>,
            ),
            (Tag::KEY, &self.tags, check_list::<Tag>),
        ];
        all.into_iter()
            .filter_map(|(key, raw, check)| {
                raw.as_deref()
                    .filter(|s| !s.is_empty())
                    .map(|raw| Field { key, raw, check })
            })
            .collect()
    }
}

type Check = fn(&str) -> Result<(), FinanceError>;

struct Field<'a> {
    key: &'static str,
    raw: &'a str,
    check: Check,
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => {
            let now = Utc::now();
            let out = match opt_arg(sub, "out") {
                Some(p) => p.to_string(),
                None => format!("backup_financas_{}.json", now.format("%Y-%m-%d")),
            };
            let backup = create_backup(conn, now)?;
            let file = std::fs::File::create(&out).with_context(|| format!("Create {}", out))?;
            write_pretty(file, &backup)?;
            tracing::info!(path = %out, "backup written");
            println!("Backup written to {}", out);
        }
        Some(("restore", sub)) => {
            let path = arg(sub, "path")?;
            let raw =
                std::fs::read_to_string(path).with_context(|| format!("Read backup {}", path))?;
            let backup = parse_backup(&raw)?;
            match restore(conn, &backup, confirmer(sub))? {
                Some(state) => println!(
                    "Backup restored: {} transactions, {} categories, {} goals, {} recurring, {} tags",
                    state.transactions.len(),
                    state.categories.len(),
                    state.goals.len(),
                    state.recurring.len(),
                    state.tags.len()
                ),
                None => println!("Aborted"),
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn create_backup(conn: &Connection, now: DateTime<Utc>) -> Result<Backup> {
    Ok(Backup {
        version: Some(BACKUP_VERSION.to_string()),
        export_date: Some(now.to_rfc3339()),
        transactions: load_blob(conn, Transaction::KEY)?,
        categories: load_blob(conn, Category::KEY)?,
        savings_goals: load_blob(conn, SavingsGoal::KEY)?,
        recurring_transactions: load_blob(conn, RecurringTemplate::KEY)?,
        tags: load_blob(conn, Tag::KEY)?,
    })
}

pub fn parse_backup(raw: &str) -> Result<Backup, FinanceError> {
    let backup: Backup =
        serde_json::from_str(raw).map_err(|e| FinanceError::InvalidBackup(e.to_string()))?;
    if let Some(v) = backup.version.as_deref() {
        if v != BACKUP_VERSION {
            tracing::warn!(version = v, "backup version differs, restoring anyway");
        }
    }
    Ok(backup)
}

fn check_list<T: Record>(raw: &str) -> Result<(), FinanceError> {
    serde_json::from_str::<Vec<T>>(raw)
        .map(|_| ())
        .map_err(|e| FinanceError::InvalidBackup(format!("{}: {}", T::KEY, e)))
}

/// Overwrite every list present in `backup`; lists it lacks stay as they are.
/// All lists are checked before anything is written, and the writes share one
/// SQL transaction. Returns the reloaded state, or `None` if declined.
pub fn restore(
    conn: &mut Connection,
    backup: &Backup,
    confirm: &dyn Confirm,
) -> Result<Option<AppState>> {
    let fields = backup.fields();
    for f in &fields {
        (f.check)(f.raw)?;
    }
    if !confirm.confirm("This replaces all current data. Continue?")? {
        return Ok(None);
    }

    let tx = conn.transaction()?;
    for f in &fields {
        save_blob(&tx, f.key, f.raw)?;
    }
    tx.commit()?;
    tracing::info!(restored = fields.len(), "backup restored");

    Ok(Some(AppState::load(conn)?))
}

