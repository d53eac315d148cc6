// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::warn;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::cache::MonthCache;
use crate::models::DashboardSummary;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.fintrack", "Fintrack", "fintrack"));

const SUMMARY_KEY: &str = "summary.json";
const MONTHS_KEY: &str = "months.json";

/// Best-effort durable shadow of the two derived aggregates: the displayed
/// summary and the full month-cache map. Read once at startup so the UI has
/// something to show before the first network round-trip. Never
/// authoritative; the remote service is.
#[derive(Debug, Clone)]
pub struct Mirror {
    dir: PathBuf,
}

pub fn default_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.to_path_buf())
}

impl Mirror {
    pub fn new(dir: PathBuf) -> Self {
        Mirror { dir }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Mirror::new(default_dir()?))
    }

    /// Persist the summary unless it is the zeroed initial state: a zero
    /// balance during the window before the first fetch resolves must not
    /// clobber a meaningful cached value.
    pub fn save_summary(&self, summary: &DashboardSummary) {
        if summary.available_balance == Decimal::ZERO {
            return;
        }
        self.write(SUMMARY_KEY, summary);
    }

    /// Persist the month map whenever it is non-empty.
    pub fn save_months(&self, cache: &MonthCache) {
        if cache.is_empty() {
            return;
        }
        self.write(MONTHS_KEY, cache);
    }

    pub fn load_summary(&self) -> Option<DashboardSummary> {
        self.read(SUMMARY_KEY)
    }

    pub fn load_months(&self) -> Option<MonthCache> {
        self.read(MONTHS_KEY)
    }

    fn write<T: serde::Serialize>(&self, key: &str, value: &T) {
        let path = self.dir.join(key);
        let res = serde_json::to_vec(value)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| fs::write(&path, bytes).map_err(anyhow::Error::from));
        if let Err(e) = res {
            // opportunistic cache; a failed write only costs the next startup
            warn!("mirror write to {} failed: {:#}", path.display(), e);
        }
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.dir.join(key);
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("mirror read from {} failed: {}", path.display(), e);
                None
            }
        }
    }
}
