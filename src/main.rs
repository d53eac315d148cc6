// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use fintrack::monthkey::MonthKey;
use fintrack::remote::HttpRemote;
use fintrack::session::SessionContext;
use fintrack::{cli, commands, mirror, utils};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let base_url = std::env::var("FINTRACK_API_URL")
        .context("FINTRACK_API_URL is not set (backend base URL, e.g. https://host/api)")?;
    let token =
        std::env::var("FINTRACK_TOKEN").context("FINTRACK_TOKEN is not set (bearer token)")?;
    let user_id = std::env::var("FINTRACK_USER").ok();

    let remote = HttpRemote::new(utils::http_client()?, base_url, token);
    let mirror = mirror::Mirror::open_default()?;
    let ctx = SessionContext::new(remote, mirror, user_id, MonthKey::current());

    match matches.subcommand() {
        Some(("dashboard", sub)) => commands::dashboard::handle(&ctx, sub).await?,
        Some(("tx", sub)) => commands::transactions::handle(&ctx, sub).await?,
        Some(("target", sub)) => commands::targets::handle(&ctx, sub).await?,
        Some(("notify", sub)) => commands::notifications::handle(&ctx, sub).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
