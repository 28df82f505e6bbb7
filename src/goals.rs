// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::SavingsGoal;

const SECS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalStatus {
    /// saved / target * 100, not capped.
    pub progress: Decimal,
    /// Whole days until the deadline, rounded up. Negative once it has passed.
    pub days_left: i64,
    pub is_overdue: bool,
    pub is_completed: bool,
}

impl GoalStatus {
    /// Progress clamped for drawing a bar.
    pub fn bar_percent(&self) -> Decimal {
        self.progress.min(Decimal::ONE_HUNDRED)
    }

    pub fn describe(&self) -> String {
        if self.is_completed {
            "✓ Goal reached!".to_string()
        } else if self.is_overdue {
            "⚠ Deadline passed".to_string()
        } else {
            format!("{} days left", self.days_left)
        }
    }
}

pub fn is_completed(goal: &SavingsGoal) -> bool {
    goal.saved >= goal.target
}

pub fn status(goal: &SavingsGoal, now: NaiveDateTime) -> GoalStatus {
    let progress = if goal.target.is_zero() {
        Decimal::ZERO
    } else {
        goal.saved * Decimal::ONE_HUNDRED / goal.target
    };
    let deadline = goal.deadline.and_time(chrono::NaiveTime::default());
    let secs = (deadline - now).num_seconds();
    // ceil(secs / day)
    let days_left = -((-secs).div_euclid(SECS_PER_DAY));
    GoalStatus {
        progress,
        days_left,
        is_overdue: days_left < 0,
        is_completed: is_completed(goal),
    }
}

/// Add a signed delta to the saved amount. Never goes below zero; may exceed the target.
pub fn apply_delta(goal: &mut SavingsGoal, delta: Decimal) -> Transition {
    let was_completed = is_completed(goal);
    goal.saved = (goal.saved + delta).max(Decimal::ZERO);
    Transition {
        was_completed,
        now_completed: is_completed(goal),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub was_completed: bool,
    pub now_completed: bool,
}

impl Transition {
    /// The update crossed from not-complete to complete.
    pub fn just_completed(&self) -> bool {
        !self.was_completed && self.now_completed
    }
}
