// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a money movement. Every transaction and target is one of the
/// two; the category sets are disjoint per kind (except `Other`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Income,
    Expense,
}

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Income => "income",
            TxnKind::Expense => "expense",
        }
    }
}

/// Closed category set. The backend stores categories as plain strings; this
/// enum pins the wire values so an invalid category cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    // income
    Salary,
    Interest,
    Investments,
    Business,
    Freelance,
    // expense
    Housing,
    Food,
    Transportation,
    Utilities,
    Entertainment,
    Healthcare,
    Personal,
    Education,
    Debt,
    // valid for both kinds
    Other,
}

impl Category {
    /// Whether this category is valid for the given transaction kind.
    pub fn allows(&self, kind: TxnKind) -> bool {
        use Category::*;
        match self {
            Salary | Interest | Investments | Business | Freelance => kind == TxnKind::Income,
            Housing | Food | Transportation | Utilities | Entertainment | Healthcare | Personal
            | Education | Debt => kind == TxnKind::Expense,
            Other => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use Category::*;
        match self {
            Salary => "Salary",
            Interest => "Interest",
            Investments => "Investments",
            Business => "Business",
            Freelance => "Freelance",
            Housing => "Housing",
            Food => "Food",
            Transportation => "Transportation",
            Utilities => "Utilities",
            Entertainment => "Entertainment",
            Healthcare => "Healthcare",
            Personal => "Personal",
            Education => "Education",
            Debt => "Debt",
            Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        use Category::*;
        let c = match s {
            "Salary" => Salary,
            "Interest" => Interest,
            "Investments" => Investments,
            "Business" => Business,
            "Freelance" => Freelance,
            "Housing" => Housing,
            "Food" => Food,
            "Transportation" => Transportation,
            "Utilities" => Utilities,
            "Entertainment" => Entertainment,
            "Healthcare" => Healthcare,
            "Personal" => Personal,
            "Education" => Education,
            "Debt" => Debt,
            "Other" => Other,
            _ => return None,
        };
        Some(c)
    }
}

/// A persisted transaction as the backend returns it. `month`/`year` are
/// denormalized from `date` because the backend partitions by them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TxnKind,
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    pub month: u32,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_id: String,
}

/// Draft sent to the backend on create; the server issues the id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TxnKind,
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    pub month: u32,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_id: String,
}

/// An income goal or expense ceiling tracked against a category.
/// `current_amount` is a server-computed running total; only transactions
/// dated on/after `created_at` count toward it, and the client must never
/// add into it locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TxnKind,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTarget {
    pub user_id: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TxnKind,
    pub target_amount: Decimal,
}

/// Partial update for a target; only present fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TxnKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Decimal>,
}

/// The four derived aggregate figures for a period. `net_worth` equals
/// `available_balance` here: there is no external asset data in this system,
/// which is a deliberate simplification rather than a bug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub available_balance: Decimal,
    pub net_worth: Decimal,
}

/// Unit of month caching: everything displayed for one month.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthData {
    pub transactions: Vec<Transaction>,
    pub targets: Vec<Target>,
    pub summary: DashboardSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

/// Notification payload built by the evaluator. Carries no id: the server is
/// the sole source of notification identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub user_id: String,
}
