// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{parse_category, parse_kind};
use crate::models::TargetPatch;
use crate::remote::RemoteService;
use crate::session::{SessionContext, TargetDraft};
use crate::summary::progress;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub async fn handle<R: RemoteService>(
    ctx: &SessionContext<R>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ctx, sub).await?,
        Some(("update", sub)) => update(ctx, sub).await?,
        Some(("rm", sub)) => rm(ctx, sub).await?,
        Some(("list", sub)) => list(ctx, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn set<R: RemoteService>(ctx: &SessionContext<R>, sub: &clap::ArgMatches) -> Result<()> {
    let draft = TargetDraft {
        kind: parse_kind(sub.get_one::<String>("kind").unwrap())?,
        category: parse_category(sub.get_one::<String>("category").unwrap())?,
        target_amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
    };
    let created = ctx.add_target(draft).await?;
    println!(
        "Target set: {} {} at {} (id: {})",
        created.category.as_str(),
        created.kind.as_str(),
        fmt_money(&created.target_amount),
        created.id
    );
    Ok(())
}

async fn update<R: RemoteService>(ctx: &SessionContext<R>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let patch = TargetPatch {
        target_amount: Some(parse_decimal(sub.get_one::<String>("amount").unwrap())?),
        ..Default::default()
    };
    let updated = ctx.update_target(id, patch).await?;
    println!(
        "Target {} now at {}",
        updated.id,
        fmt_money(&updated.target_amount)
    );
    Ok(())
}

async fn rm<R: RemoteService>(ctx: &SessionContext<R>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    ctx.delete_target(id).await?;
    println!("Deleted target {}", id);
    Ok(())
}

async fn list<R: RemoteService>(ctx: &SessionContext<R>, sub: &clap::ArgMatches) -> Result<()> {
    let snap = ctx.snapshot().await;
    if maybe_print_json(sub.get_flag("json"), &snap.targets)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = snap
        .targets
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.kind.as_str().to_string(),
                t.category.as_str().to_string(),
                fmt_money(&t.current_amount),
                fmt_money(&t.target_amount),
                format!("{:.0}%", progress(t)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Kind", "Category", "Current", "Target", "Progress"],
            rows
        )
    );
    Ok(())
}
