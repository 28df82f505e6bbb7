// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod transactions;
pub mod categories;
pub mod goals;
pub mod recurring;
pub mod tags;
pub mod reports;
pub mod exporter;
pub mod backup;
pub mod config;

use crate::store::{AssumeYes, Confirm, StdinConfirm};

/// `--yes` skips the question; otherwise ask on the terminal.
pub fn confirmer(m: &clap::ArgMatches) -> &'static dyn Confirm {
    if m.get_flag("yes") {
        &AssumeYes
    } else {
        &StdinConfirm
    }
}
