// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::monthkey::MonthKey;
use crate::remote::RemoteService;
use crate::session::SessionContext;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};

pub async fn handle<R: RemoteService>(
    ctx: &SessionContext<R>,
    m: &clap::ArgMatches,
) -> Result<()> {
    let key = match m.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => MonthKey::current(),
    };
    ctx.set_month(key).await?;
    let snap = ctx.snapshot().await;

    if maybe_print_json(m.get_flag("json"), &snap.summary)? {
        return Ok(());
    }

    println!("Month {}", key);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Balance", "Net worth"],
            vec![vec![
                fmt_money(&snap.summary.total_income),
                fmt_money(&snap.summary.total_expenses),
                fmt_money(&snap.summary.available_balance),
                fmt_money(&snap.summary.net_worth),
            ]],
        )
    );

    let rows: Vec<Vec<String>> = snap
        .transactions
        .iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                t.kind.as_str().to_string(),
                t.category.as_str().to_string(),
                fmt_money(&t.amount),
                t.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Kind", "Category", "Amount", "Note"], rows)
    );
    Ok(())
}
