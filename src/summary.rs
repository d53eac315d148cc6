// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::{DashboardSummary, Target, Transaction, TxnKind};

/// Derive the dashboard aggregates from a transaction list.
///
/// A pure, order-independent fold: summing a partition and combining equals
/// summing the whole. Non-positive amounts contribute zero so a bad record
/// can never drag a total negative.
pub fn summarize(transactions: &[Transaction]) -> DashboardSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    for t in transactions {
        let amount = if t.amount > Decimal::ZERO {
            t.amount
        } else {
            Decimal::ZERO
        };
        match t.kind {
            TxnKind::Income => total_income += amount,
            TxnKind::Expense => total_expenses += amount,
        }
    }
    let available_balance = total_income - total_expenses;
    DashboardSummary {
        total_income,
        total_expenses,
        available_balance,
        // no external asset data in this system
        net_worth: available_balance,
    }
}

/// Merge two partial summaries field-wise. `combine(summarize(a), summarize(b))`
/// equals `summarize(a ++ b)`.
pub fn combine(a: &DashboardSummary, b: &DashboardSummary) -> DashboardSummary {
    let total_income = a.total_income + b.total_income;
    let total_expenses = a.total_expenses + b.total_expenses;
    let available_balance = total_income - total_expenses;
    DashboardSummary {
        total_income,
        total_expenses,
        available_balance,
        net_worth: available_balance,
    }
}

/// Completion percentage of a target, clamped to `[0, 100]`.
/// A non-positive target amount yields 0 rather than dividing.
pub fn progress(target: &Target) -> f64 {
    if target.target_amount <= Decimal::ZERO {
        return 0.0;
    }
    let ratio = (target.current_amount / target.target_amount)
        .to_f64()
        .unwrap_or(0.0);
    (ratio * 100.0).clamp(0.0, 100.0)
}
