// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{parse_category, parse_kind};
use crate::monthkey::MonthKey;
use crate::remote::RemoteService;
use crate::session::{SessionContext, TransactionDraft};
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
};

pub async fn handle<R: RemoteService>(
    ctx: &SessionContext<R>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub).await?,
        Some(("rm", sub)) => rm(ctx, sub).await?,
        Some(("list", sub)) => list(ctx, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn add<R: RemoteService>(ctx: &SessionContext<R>, sub: &clap::ArgMatches) -> Result<()> {
    let draft = TransactionDraft {
        kind: parse_kind(sub.get_one::<String>("kind").unwrap())?,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        category: parse_category(sub.get_one::<String>("category").unwrap())?,
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        description: sub.get_one::<String>("note").map(|s| s.to_string()),
    };
    let created = ctx.add_transaction(draft).await?;
    println!(
        "Recorded {} {} of {} on {} (id: {})",
        created.category.as_str(),
        created.kind.as_str(),
        fmt_money(&created.amount),
        created.date,
        created.id
    );
    Ok(())
}

async fn rm<R: RemoteService>(ctx: &SessionContext<R>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    ctx.delete_transaction(id).await?;
    println!("Deleted transaction {}", id);
    Ok(())
}

async fn list<R: RemoteService>(ctx: &SessionContext<R>, sub: &clap::ArgMatches) -> Result<()> {
    let key = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => MonthKey::current(),
    };
    ctx.set_month(key).await?;
    let snap = ctx.snapshot().await;

    if maybe_print_json(sub.get_flag("json"), &snap.transactions)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = snap
        .transactions
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
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
        pretty_table(&["Id", "Date", "Kind", "Category", "Amount", "Note"], rows)
    );
    Ok(())
}
