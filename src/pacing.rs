//! Derived pacing figures for a budget window: day-count progress, per-day
//! allowance, and remaining-balance projections.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::date::{start_of_day, DAY_MS};
use crate::document::Budget;

/// Whether actual spending sits at or below the planned daily burn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    On,
    Over,
}

/// Pacing figures for one budget at a given moment.
///
/// Every figure is a plain float. A missing date or a zero-day remainder
/// propagates as NaN or an infinity; the presentation layer special-cases
/// those, the calculator never errors. Positive numbers mean money is still
/// available, matching the depleting-budget model.
#[derive(Debug, Clone, PartialEq)]
pub struct PacingResult {
    /// Inclusive day count of the budget window.
    pub length_days: f64,
    /// 1-indexed day position of "now" inside the window. May be zero or
    /// negative before the window opens, or beyond `length_days` after it.
    pub current_days: f64,
    pub days_left: f64,
    /// Planned total spend over the whole window.
    pub total_budget: f64,
    /// Planned flat daily burn.
    pub initial_per_day_budget: f64,
    /// Actual margin remaining today.
    pub current_total: f64,
    /// Margin left per remaining day.
    pub current_per_day_budget: f64,
    /// How much of today's allowance is still unspent.
    pub remaining_today: f64,
    /// Where the plan says the margin should stand today.
    pub target_total: f64,
}

impl PacingResult {
    /// On pace iff the current allowance is no tighter than the planned one.
    pub fn pace(&self) -> Pace {
        if self.initial_per_day_budget <= self.current_per_day_budget {
            Pace::On
        } else {
            Pace::Over
        }
    }
}

/// Computes the pacing figures for a budget given the live balance sum of
/// its linked accounts. `now` is injected so the result is deterministic;
/// see [`crate::time::Clock`].
pub fn compute_pacing(
    budget: &Budget,
    account_balance_sum: f64,
    now: DateTime<Utc>,
) -> PacingResult {
    let day = DAY_MS as f64;
    let first = millis_or_nan(budget.first_day);
    let last = millis_or_nan(budget.last_day);
    let today = start_of_day(now).timestamp_millis() as f64;

    let length_days = ((day + last - first) / day).round();
    let current_days = ((today - first) / day).round() + 1.0;
    let days_left = length_days - current_days;

    let total_budget = budget.starting_balance - budget.target_balance;
    let initial_per_day_budget = total_budget / length_days;
    let current_total = account_balance_sum - budget.target_balance;
    let current_per_day_budget = current_total / days_left;

    let remaining_today = current_total - (total_budget - initial_per_day_budget * current_days);
    let target_total = total_budget - initial_per_day_budget * current_days;

    PacingResult {
        length_days,
        current_days,
        days_left,
        total_budget,
        initial_per_day_budget,
        current_total,
        current_per_day_budget,
        remaining_today,
        target_total,
    }
}

/// Where a budget sits relative to "now" on the budgets screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetPhase {
    Active,
    Pending,
    Expired,
}

/// Classifies a budget as expired, pending, or active.
///
/// Expired means the last day plus one full day lies before now; pending
/// means the first day is still ahead. An unset date never satisfies its
/// comparison, and the chain guarantees the three phases partition all
/// budgets: a budget starting or ending exactly now counts as active.
pub fn budget_phase(budget: &Budget, now: DateTime<Utc>) -> BudgetPhase {
    let now_ms = now.timestamp_millis();
    let expired = budget
        .last_day
        .map(|last| last.timestamp_millis() + DAY_MS < now_ms)
        .unwrap_or(false);
    if expired {
        return BudgetPhase::Expired;
    }
    let pending = budget
        .first_day
        .map(|first| first.timestamp_millis() > now_ms)
        .unwrap_or(false);
    if pending {
        BudgetPhase::Pending
    } else {
        BudgetPhase::Active
    }
}

/// Budget ids grouped for display, each list ordered by last day ascending.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BudgetPartition {
    pub active: Vec<u64>,
    pub pending: Vec<u64>,
    pub expired: Vec<u64>,
}

/// Splits all budgets into the three display groups, ordered by last day
/// ascending. Budgets without a last day sort after all dated ones.
pub fn partition_budgets(
    budgets: &BTreeMap<u64, Budget>,
    now: DateTime<Utc>,
) -> BudgetPartition {
    let mut ordered: Vec<(&u64, &Budget)> = budgets.iter().collect();
    ordered.sort_by_key(|(_, budget)| {
        budget
            .last_day
            .map(|last| last.timestamp_millis())
            .unwrap_or(i64::MAX)
    });

    let mut partition = BudgetPartition::default();
    for (id, budget) in ordered {
        match budget_phase(budget, now) {
            BudgetPhase::Active => partition.active.push(*id),
            BudgetPhase::Pending => partition.pending.push(*id),
            BudgetPhase::Expired => partition.expired.push(*id),
        }
    }
    partition
}

fn millis_or_nan(date: Option<DateTime<Utc>>) -> f64 {
    date.map(|d| d.timestamp_millis() as f64)
        .unwrap_or(f64::NAN)
}
