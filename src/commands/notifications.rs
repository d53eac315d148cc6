// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::remote::RemoteService;
use crate::session::SessionContext;
use crate::utils::{maybe_print_json, pretty_table};

pub async fn handle<R: RemoteService>(
    ctx: &SessionContext<R>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(ctx, sub).await?,
        Some(("read", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            ctx.mark_notification_read(id).await?;
            println!("Marked {} as read", id);
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            ctx.delete_notification(id).await?;
            println!("Deleted notification {}", id);
        }
        Some(("clear-read", _)) => {
            ctx.clear_read_notifications().await?;
            println!("Cleared read notifications");
        }
        _ => {}
    }
    Ok(())
}

async fn list<R: RemoteService>(ctx: &SessionContext<R>, sub: &clap::ArgMatches) -> Result<()> {
    ctx.refresh_notifications().await?;
    let snap = ctx.snapshot().await;
    if maybe_print_json(sub.get_flag("json"), &snap.notifications)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = snap
        .notifications
        .iter()
        .map(|n| {
            vec![
                n.id.clone(),
                n.title.clone(),
                n.message.clone(),
                format!("{:?}", n.severity).to_lowercase(),
                if n.is_read { "read" } else { "unread" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Title", "Message", "Severity", "Status"], rows)
    );
    Ok(())
}
