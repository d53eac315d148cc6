// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod dashboard;
pub mod notifications;
pub mod targets;
pub mod transactions;

use anyhow::{Context, Result};

use crate::models::{Category, TxnKind};

pub(crate) fn parse_kind(s: &str) -> Result<TxnKind> {
    match s {
        "income" => Ok(TxnKind::Income),
        "expense" => Ok(TxnKind::Expense),
        _ => anyhow::bail!("Invalid kind '{}', expected 'income' or 'expense'", s),
    }
}

pub(crate) fn parse_category(s: &str) -> Result<Category> {
    Category::parse(s).with_context(|| format!("Unknown category '{}'", s))
}
