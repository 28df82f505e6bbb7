// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::fmt;

use crate::error::validation;
use crate::models::Transaction;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// A calendar month. `month0` is zero-based (January = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub year: i32,
    pub month0: u32,
}

impl Period {
    pub fn new(year: i32, month0: u32) -> Result<Self> {
        if month0 > 11 {
            return Err(validation(format!("Invalid month index {}", month0)).into());
        }
        Ok(Self { year, month0 })
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> Result<Self> {
        let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
        Ok(Self::of(d))
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn days_in_month(&self) -> u32 {
        let next = if self.month0 == 11 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month0 + 2, 1)
        };
        next.and_then(|d| d.pred_opt())
            .map(|d| d.day())
            .unwrap_or(31)
    }

    pub fn label(&self) -> &'static str {
        MONTH_LABELS[self.month0 as usize]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

pub fn filter_month(transactions: &[Transaction], period: Period) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| period.contains(t.date))
        .cloned()
        .collect()
}

pub fn filter_year(transactions: &[Transaction], year: i32) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.year() == year)
        .cloned()
        .collect()
}

/// Twelve buckets, January first, holding the year's transactions in input order.
pub fn bucket_by_month(transactions: &[Transaction], year: i32) -> Vec<Vec<Transaction>> {
    let mut buckets: Vec<Vec<Transaction>> = vec![Vec::new(); 12];
    for t in transactions.iter().filter(|t| t.date.year() == year) {
        buckets[t.date.month0() as usize].push(t.clone());
    }
    buckets
}
