// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FinanceError, validation};
use crate::store::Record;

/// Label used wherever a transaction's category id does not resolve.
pub const UNCATEGORIZED: &str = "Sem categoria";

/// Largest amount accepted anywhere (10^12). Keeps every sum far from `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    /// Label used in exports and as the fallback description.
    pub fn label(self) -> &'static str {
        match self {
            TxType::Income => "Receita",
            TxType::Expense => "Despesa",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxType::Income => f.write_str("income"),
            TxType::Expense => f.write_str("expense"),
        }
    }
}

impl FromStr for TxType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            other => Err(validation(format!(
                "Invalid type '{}', expected income|expense",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    #[default]
    Expense,
    Income,
    Both,
}

impl CategoryType {
    pub fn applies_to(self, tx: TxType) -> bool {
        matches!(
            (self, tx),
            (CategoryType::Both, _)
                | (CategoryType::Expense, TxType::Expense)
                | (CategoryType::Income, TxType::Income)
        )
    }

    /// Budgets only mean something for categories that can hold expenses.
    pub fn has_budget(self) -> bool {
        self.applies_to(TxType::Expense)
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CategoryType::Expense => "expense",
            CategoryType::Income => "income",
            CategoryType::Both => "both",
        };
        f.write_str(s)
    }
}

impl FromStr for CategoryType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(CategoryType::Expense),
            "income" => Ok(CategoryType::Income),
            "both" => Ok(CategoryType::Both),
            other => Err(validation(format!(
                "Invalid category type '{}', expected expense|income|both",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn label(self) -> &'static str {
        match self {
            Frequency::Weekly => "Semanal",
            Frequency::Biweekly => "Quinzenal",
            Frequency::Monthly => "Mensal",
            Frequency::Yearly => "Anual",
        }
    }
}

impl FromStr for Frequency {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(validation(format!(
                "Invalid frequency '{}', expected weekly|biweekly|monthly|yearly",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TxType,
    pub category_id: Option<i64>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.r#type == TxType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TxType::Expense
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub budget: Decimal,
    #[serde(default)]
    pub r#type: CategoryType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: i64,
    pub name: String,
    pub target: Decimal,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub saved: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTemplate {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TxType,
    pub frequency: Frequency,
    pub day_of_month: u32,
    pub category_id: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
}

impl Record for Transaction {
    const KEY: &'static str = "transactions";
    const KIND: &'static str = "Transaction";
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Category {
    const KEY: &'static str = "categories";
    const KIND: &'static str = "Category";
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for SavingsGoal {
    const KEY: &'static str = "savingsGoals";
    const KIND: &'static str = "Goal";
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for RecurringTemplate {
    const KEY: &'static str = "recurringTransactions";
    const KIND: &'static str = "Recurring template";
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Tag {
    const KEY: &'static str = "tags";
    const KIND: &'static str = "Tag";
    fn id(&self) -> i64 {
        self.id
    }
}

pub const TAG_PALETTE: [&str; 8] = [
    "#A85252", "#8A7866", "#7FA87F", "#D4A574", "#8B3D3D", "#C46B6B", "#6B2D2D", "#A89787",
];

pub fn default_categories() -> Vec<Category> {
    let seed = [
        (1, "Alimentação", "#A85252", "🍽", 500),
        (2, "Transporte", "#8A7866", "🚗", 300),
        (3, "Saúde", "#7FA87F", "💊", 200),
        (4, "Lazer", "#D4A574", "🎭", 150),
        (5, "Educação", "#8B3D3D", "📚", 250),
        (6, "Casa", "#C46B6B", "🏠", 800),
    ];
    seed.into_iter()
        .map(|(id, name, color, icon, budget)| Category {
            id,
            name: name.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
            budget: Decimal::from(budget),
            r#type: CategoryType::Expense,
        })
        .collect()
}

pub fn default_tags() -> Vec<Tag> {
    [
        (1, "Essencial", "#A85252"),
        (2, "Lazer", "#7FA87F"),
        (3, "Investimento", "#8A7866"),
    ]
    .into_iter()
    .map(|(id, name, color)| Tag {
        id,
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}
