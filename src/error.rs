// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Category '{0}' not found")]
    UnknownCategory(String),

    #[error("Category '{category}' cannot be used for {tx_type} transactions")]
    CategoryNotApplicable { category: String, tx_type: String },

    #[error("Invalid backup file: {0}")]
    InvalidBackup(String),

    #[error("Unknown format: {0} (use csv|json)")]
    UnknownFormat(String),

    #[error("Unknown setting '{0}'")]
    UnknownSetting(String),
}

pub fn validation(msg: impl Into<String>) -> FinanceError {
    FinanceError::Validation(msg.into())
}
