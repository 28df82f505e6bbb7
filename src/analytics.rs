// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregates over an in-memory transaction slice.
//!
//! Everything here is a pure function of its inputs. Empty input yields zeroed
//! aggregates and every division is guarded, so nothing in this module fails.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Category, Transaction};
use crate::period::{MONTH_LABELS, Period, bucket_by_month};

/// How many entries the largest-expenses list holds.
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut t = Totals::default();
    for tx in transactions {
        if tx.is_income() {
            t.income += tx.amount;
            t.income_count += 1;
        } else {
            t.expenses += tx.amount;
            t.expense_count += 1;
        }
    }
    t.balance = t.income - t.expenses;
    t
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category_id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub spent: Decimal,
    /// Zero for categories that cannot hold expenses.
    pub budget: Decimal,
}

impl CategorySpend {
    pub fn remaining(&self) -> Decimal {
        self.budget - self.spent
    }

    pub fn over_budget(&self) -> bool {
        self.budget > Decimal::ZERO && self.spent > self.budget
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    /// One row per category, in category order, including zero spend.
    pub rows: Vec<CategorySpend>,
    /// Expenses with no category or a category id that no longer resolves.
    pub uncategorized: Decimal,
}

pub fn category_spending(transactions: &[Transaction], categories: &[Category]) -> CategoryReport {
    let rows = categories
        .iter()
        .map(|cat| {
            let spent = transactions
                .iter()
                .filter(|t| t.is_expense() && t.category_id == Some(cat.id))
                .map(|t| t.amount)
                .sum();
            CategorySpend {
                category_id: cat.id,
                name: cat.name.clone(),
                icon: cat.icon.clone(),
                color: cat.color.clone(),
                spent,
                budget: if cat.r#type.has_budget() {
                    cat.budget
                } else {
                    Decimal::ZERO
                },
            }
        })
        .collect();
    let uncategorized = transactions
        .iter()
        .filter(|t| t.is_expense())
        .filter(|t| match t.category_id {
            Some(id) => !categories.iter().any(|c| c.id == id),
            None => true,
        })
        .map(|t| t.amount)
        .sum();
    CategoryReport {
        rows,
        uncategorized,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub name: String,
    pub color: String,
    pub spent: Decimal,
    pub percent: Decimal,
}

/// Percentage split of categorised spending. Categories with nothing spent are left out.
pub fn spending_distribution(report: &CategoryReport) -> Vec<Share> {
    let with_spend: Vec<&CategorySpend> = report
        .rows
        .iter()
        .filter(|r| r.spent > Decimal::ZERO)
        .collect();
    let total: Decimal = with_spend.iter().map(|r| r.spent).sum();
    with_spend
        .into_iter()
        .map(|r| Share {
            name: r.name.clone(),
            color: r.color.clone(),
            spent: r.spent,
            percent: if total.is_zero() {
                Decimal::ZERO
            } else {
                r.spent * Decimal::ONE_HUNDRED / total
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month0: u32,
    pub label: &'static str,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct YearTotals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
    pub transactions: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyAverage {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualSummary {
    pub year: i32,
    pub months: Vec<MonthSummary>,
    pub totals: YearTotals,
    /// Year totals over a fixed twelve months, whatever the number of active months.
    pub average: MonthlyAverage,
    pub best_month: Option<MonthSummary>,
    pub worst_month: Option<MonthSummary>,
}

pub fn annual_summary(all: &[Transaction], year: i32) -> AnnualSummary {
    let months: Vec<MonthSummary> = bucket_by_month(all, year)
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let t = totals(bucket);
            MonthSummary {
                month0: i as u32,
                label: MONTH_LABELS[i],
                income: t.income,
                expenses: t.expenses,
                balance: t.balance,
                count: bucket.len(),
            }
        })
        .collect();

    let mut totals = YearTotals::default();
    for m in &months {
        totals.income += m.income;
        totals.expenses += m.expenses;
        totals.balance += m.balance;
        totals.transactions += m.count;
    }
    let twelve = Decimal::from(12);
    let average = MonthlyAverage {
        income: totals.income / twelve,
        expenses: totals.expenses / twelve,
        balance: totals.balance / twelve,
    };

    // strict comparisons keep the earliest month on ties
    let active = || months.iter().filter(|m| m.count > 0);
    let best_month = active()
        .fold(None::<&MonthSummary>, |best, m| match best {
            Some(b) if m.balance <= b.balance => Some(b),
            _ => Some(m),
        })
        .cloned();
    let worst_month = active()
        .fold(None::<&MonthSummary>, |worst, m| match worst {
            Some(w) if m.balance >= w.balance => Some(w),
            _ => Some(m),
        })
        .cloned();

    AnnualSummary {
        year,
        months,
        totals,
        average,
        best_month,
        worst_month,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthInsights {
    pub period: String,
    pub is_current_month: bool,
    pub days_in_month: u32,
    pub current_day: u32,
    pub days_remaining: u32,
    pub month_progress: Decimal,
    pub income: Decimal,
    pub expenses: Decimal,
    pub daily_average: Decimal,
    pub projected_expenses: Decimal,
    /// What can still be spent per remaining day; zero once the month is over.
    pub daily_budget: Decimal,
}

/// Pace metrics for `period`. A month other than the one containing `today`
/// counts as fully elapsed.
pub fn month_insights(month_txs: &[Transaction], period: Period, today: NaiveDate) -> MonthInsights {
    let days_in_month = period.days_in_month();
    let is_current_month = period.contains(today);
    let current_day = if is_current_month {
        today.day()
    } else {
        days_in_month
    };
    let days_remaining = days_in_month.saturating_sub(current_day);

    let t = totals(month_txs);
    let daily_average = if current_day > 0 {
        t.expenses / Decimal::from(current_day)
    } else {
        Decimal::ZERO
    };
    let projected_expenses = t.expenses + daily_average * Decimal::from(days_remaining);
    let daily_budget = if days_remaining > 0 {
        (t.income - t.expenses) / Decimal::from(days_remaining)
    } else {
        Decimal::ZERO
    };
    let month_progress = if days_in_month > 0 {
        Decimal::from(current_day) * Decimal::ONE_HUNDRED / Decimal::from(days_in_month)
    } else {
        Decimal::ZERO
    };

    MonthInsights {
        period: period.to_string(),
        is_current_month,
        days_in_month,
        current_day,
        days_remaining,
        month_progress,
        income: t.income,
        expenses: t.expenses,
        daily_average,
        projected_expenses,
        daily_budget,
    }
}

/// Largest expenses first, at most `n`. Equal amounts keep their input order.
pub fn top_expenses(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut expenses: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense())
        .cloned()
        .collect();
    expenses.sort_by(|a, b| b.amount.cmp(&a.amount));
    expenses.truncate(n);
    expenses
}
