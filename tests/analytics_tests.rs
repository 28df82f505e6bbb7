// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::analytics::{
    annual_summary, category_spending, month_insights, spending_distribution, top_expenses,
    totals,
};
use pocketbook::models::{Category, CategoryType, Transaction, TxType};
use pocketbook::period::{Period, filter_month, filter_year};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tx(id: i64, d: &str, amount: &str, ty: TxType, cat: Option<i64>) -> Transaction {
    Transaction {
        id,
        date: date(d),
        description: format!("tx {}", id),
        amount: dec(amount),
        r#type: ty,
        category_id: cat,
    }
}

fn sample() -> Vec<Transaction> {
    vec![
        tx(1, "2024-01-05", "100", TxType::Income, None),
        tx(2, "2024-01-06", "40", TxType::Expense, Some(1)),
        tx(3, "2024-02-01", "30", TxType::Expense, Some(2)),
    ]
}

fn category(id: i64, name: &str, budget: &str, ty: CategoryType) -> Category {
    Category {
        id,
        name: name.to_string(),
        color: "#A85252".to_string(),
        icon: "📁".to_string(),
        budget: dec(budget),
        r#type: ty,
    }
}

#[test]
fn january_totals() {
    let jan = filter_month(&sample(), Period::new(2024, 0).unwrap());
    let t = totals(&jan);
    assert_eq!(t.income, dec("100"));
    assert_eq!(t.expenses, dec("40"));
    assert_eq!(t.balance, dec("60"));
    assert_eq!(t.income_count, 1);
    assert_eq!(t.expense_count, 1);
}

#[test]
fn empty_input_is_all_zero() {
    let t = totals(&[]);
    assert_eq!(t.income, Decimal::ZERO);
    assert_eq!(t.expenses, Decimal::ZERO);
    assert_eq!(t.balance, Decimal::ZERO);
}

#[test]
fn month_filter_is_idempotent() {
    let all = sample();
    let p = Period::parse("2024-01").unwrap();
    let once = filter_month(&all, p);
    let twice = filter_month(&once, p);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
}

#[test]
fn year_filter_drops_other_years() {
    let mut all = sample();
    all.push(tx(4, "2023-12-31", "5", TxType::Expense, None));
    assert_eq!(filter_year(&all, 2024).len(), 3);
    assert_eq!(filter_year(&all, 2023).len(), 1);
}

#[test]
fn annual_breakdown_matches_monthly_balances() {
    let s = annual_summary(&sample(), 2024);
    assert_eq!(s.months.len(), 12);
    assert_eq!(s.months[0].balance, dec("60"));
    assert_eq!(s.months[1].balance, dec("-30"));
    assert_eq!(s.totals.balance, dec("30"));
    assert_eq!(s.totals.transactions, 3);

    let summed: Decimal = s.months.iter().map(|m| m.balance).sum();
    assert_eq!(summed, s.totals.balance);

    // always twelve, even with two active months
    assert_eq!(s.average.balance, dec("2.5"));
    assert_eq!(s.average.income, dec("100") / Decimal::from(12));

    assert_eq!(s.best_month.as_ref().unwrap().month0, 0);
    assert_eq!(s.worst_month.as_ref().unwrap().month0, 1);
}

#[test]
fn best_and_worst_ignore_empty_months() {
    // only expenses: every active month is negative, while empty months sit at zero
    let txs = vec![
        tx(1, "2024-03-10", "20", TxType::Expense, None),
        tx(2, "2024-07-10", "50", TxType::Expense, None),
    ];
    let s = annual_summary(&txs, 2024);
    assert_eq!(s.best_month.unwrap().month0, 2);
    assert_eq!(s.worst_month.unwrap().month0, 6);
}

#[test]
fn best_month_ties_keep_first() {
    let txs = vec![
        tx(1, "2024-05-01", "10", TxType::Income, None),
        tx(2, "2024-03-01", "10", TxType::Income, None),
    ];
    let s = annual_summary(&txs, 2024);
    assert_eq!(s.best_month.unwrap().label, "Mar");
    assert_eq!(s.worst_month.unwrap().label, "Mar");
}

#[test]
fn empty_year_has_no_best_or_worst() {
    let s = annual_summary(&sample(), 2019);
    assert!(s.best_month.is_none());
    assert!(s.worst_month.is_none());
    assert_eq!(s.totals.balance, Decimal::ZERO);
    assert_eq!(s.average.expenses, Decimal::ZERO);
}

#[test]
fn insights_for_running_month() {
    let period = Period::parse("2024-01").unwrap();
    let jan = filter_month(&sample(), period);
    let ins = month_insights(&jan, period, date("2024-01-10"));
    assert!(ins.is_current_month);
    assert_eq!(ins.days_in_month, 31);
    assert_eq!(ins.current_day, 10);
    assert_eq!(ins.days_remaining, 21);
    assert_eq!(ins.daily_average, dec("4"));
    assert_eq!(ins.projected_expenses, dec("124"));
    assert_eq!(ins.daily_budget, dec("60") / Decimal::from(21));
}

#[test]
fn insights_for_past_month_treat_it_as_elapsed() {
    let period = Period::parse("2024-02").unwrap();
    let feb = filter_month(&sample(), period);
    let ins = month_insights(&feb, period, date("2024-06-15"));
    assert!(!ins.is_current_month);
    assert_eq!(ins.days_in_month, 29);
    assert_eq!(ins.current_day, 29);
    assert_eq!(ins.days_remaining, 0);
    assert_eq!(ins.daily_budget, Decimal::ZERO);
    assert_eq!(ins.projected_expenses, dec("30"));
    assert_eq!(ins.month_progress, dec("100"));
}

#[test]
fn top_expenses_capped_and_descending() {
    let txs = vec![
        tx(1, "2024-01-01", "10", TxType::Expense, None),
        tx(2, "2024-01-02", "80", TxType::Expense, None),
        tx(3, "2024-01-03", "500", TxType::Income, None),
        tx(4, "2024-01-04", "25", TxType::Expense, None),
        tx(5, "2024-01-05", "80", TxType::Expense, None),
        tx(6, "2024-01-06", "5", TxType::Expense, None),
        tx(7, "2024-01-07", "60", TxType::Expense, None),
        tx(8, "2024-01-08", "1", TxType::Expense, None),
    ];
    let top = top_expenses(&txs, 5);
    assert_eq!(top.len(), 5);
    assert!(top.windows(2).all(|w| w[0].amount >= w[1].amount));
    assert!(top.iter().all(|t| t.is_expense()));
    // equal amounts keep input order
    assert_eq!(top[0].id, 2);
    assert_eq!(top[1].id, 5);
    assert_eq!(top.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 5, 7, 4, 1]);
}

#[test]
fn category_breakdown_keeps_zero_rows_but_not_in_distribution() {
    let cats = vec![
        category(1, "Food", "500", CategoryType::Expense),
        category(2, "Transport", "300", CategoryType::Expense),
        category(3, "Health", "200", CategoryType::Expense),
        category(4, "Salary", "999", CategoryType::Income),
    ];
    let mut txs = sample();
    txs.push(tx(9, "2024-01-20", "60", TxType::Expense, Some(1)));
    txs.push(tx(10, "2024-01-21", "7", TxType::Expense, Some(42)));
    txs.push(tx(11, "2024-01-22", "3", TxType::Expense, None));

    let report = category_spending(&txs, &cats);
    assert_eq!(report.rows.len(), 4);
    assert_eq!(report.rows[0].spent, dec("100"));
    assert_eq!(report.rows[1].spent, dec("30"));
    assert_eq!(report.rows[2].spent, Decimal::ZERO);
    // income categories carry no budget
    assert_eq!(report.rows[3].budget, Decimal::ZERO);
    assert_eq!(report.uncategorized, dec("10"));

    let shares = spending_distribution(&report);
    let names: Vec<&str> = shares.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Food", "Transport"]);
    let total: Decimal = shares.iter().map(|s| s.percent).sum();
    assert_eq!(total.round_dp(6), dec("100"));
}
