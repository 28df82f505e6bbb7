// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Whole-list stores persisted as JSON blobs.
//!
//! Each store owns one list and writes the entire list back to its blob after
//! every successful mutation. Nothing is cached between invocations; callers
//! load, mutate, and drop.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{BufRead, Write};

use crate::db::{load_blob, save_blob};
use crate::error::FinanceError;
use crate::models::{
    Category, RecurringTemplate, SavingsGoal, Tag, Transaction, default_categories, default_tags,
};

pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Blob key the list is stored under.
    const KEY: &'static str;
    /// Human name used in prompts and errors.
    const KIND: &'static str;

    fn id(&self) -> i64;
}

/// Asked before any destructive mutation. Returning `false` aborts it.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Interactive y/N question on the terminal.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let mut out = std::io::stdout();
        write!(out, "{} [y/N] ", prompt)?;
        out.flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        let answer = line.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

#[derive(Debug, Clone)]
pub struct Store<T: Record> {
    items: Vec<T>,
}

impl<T: Record> Store<T> {
    /// Load the list; a missing blob is an empty list.
    pub fn load(conn: &Connection) -> Result<Self> {
        let items = match load_blob(conn, T::KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt '{}' data", T::KEY))?,
            None => Vec::new(),
        };
        Ok(Self { items })
    }

    /// Load the list, seeding and persisting `seed` when nothing was stored yet.
    pub fn load_or_seed(conn: &Connection, seed: impl FnOnce() -> Vec<T>) -> Result<Self> {
        if load_blob(conn, T::KEY)?.is_some() {
            return Self::load(conn);
        }
        let store = Self { items: seed() };
        store.save(conn)?;
        tracing::info!(key = T::KEY, count = store.items.len(), "seeded defaults");
        Ok(store)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|it| it.id() == id)
    }

    pub fn require(&self, id: i64) -> Result<&T, FinanceError> {
        self.get(id).ok_or(FinanceError::NotFound { kind: T::KIND, id })
    }

    /// Fresh identity: creation time in millis, bumped past any existing id.
    pub fn next_id(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let max = self.items.iter().map(Record::id).max().unwrap_or(0);
        now.max(max + 1)
    }

    pub fn insert(&mut self, conn: &Connection, item: T) -> Result<&T> {
        self.items.push(item);
        self.save(conn)?;
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Replace the record with the same id wholesale.
    pub fn replace(&mut self, conn: &Connection, item: T) -> Result<()> {
        let id = item.id();
        let slot = self
            .items
            .iter_mut()
            .find(|it| it.id() == id)
            .ok_or(FinanceError::NotFound { kind: T::KIND, id })?;
        *slot = item;
        self.save(conn)
    }

    /// Apply `f` to a copy of the record; the copy is stored only if `f` succeeds.
    pub fn modify<R>(
        &mut self,
        conn: &Connection,
        id: i64,
        f: impl FnOnce(&mut T) -> Result<R>,
    ) -> Result<R> {
        let mut draft = self.require(id)?.clone();
        let out = f(&mut draft)?;
        self.replace(conn, draft)?;
        Ok(out)
    }

    /// Remove by id after confirmation. `Ok(None)` means the user declined.
    pub fn remove(
        &mut self,
        conn: &Connection,
        id: i64,
        confirm: &dyn Confirm,
    ) -> Result<Option<T>> {
        let pos = self
            .items
            .iter()
            .position(|it| it.id() == id)
            .ok_or(FinanceError::NotFound { kind: T::KIND, id })?;
        if !confirm.confirm(&format!("Delete {} {}?", T::KIND.to_lowercase(), id))? {
            tracing::debug!(key = T::KEY, id, "delete declined");
            return Ok(None);
        }
        let removed = self.items.remove(pos);
        self.save(conn)?;
        tracing::info!(key = T::KEY, id, "deleted");
        Ok(Some(removed))
    }

    fn save(&self, conn: &Connection) -> Result<()> {
        let raw = serde_json::to_string(&self.items)?;
        save_blob(conn, T::KEY, &raw)?;
        tracing::debug!(key = T::KEY, count = self.items.len(), "saved");
        Ok(())
    }
}

pub fn load_categories(conn: &Connection) -> Result<Store<Category>> {
    Store::load_or_seed(conn, default_categories)
}

pub fn load_tags(conn: &Connection) -> Result<Store<Tag>> {
    Store::load_or_seed(conn, default_tags)
}

/// Every store, loaded together. Views receive the pieces they need by reference.
pub struct AppState {
    pub transactions: Store<Transaction>,
    pub categories: Store<Category>,
    pub goals: Store<SavingsGoal>,
    pub recurring: Store<RecurringTemplate>,
    pub tags: Store<Tag>,
}

impl AppState {
    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(Self {
            transactions: Store::load(conn)?,
            categories: load_categories(conn)?,
            goals: Store::load(conn)?,
            recurring: Store::load(conn)?,
            tags: load_tags(conn)?,
        })
    }
}
