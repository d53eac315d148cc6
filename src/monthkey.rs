// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical identifier for a (year, month) pair.
///
/// The wire/storage form is `"{year}-{month+1}"` (e.g. `2026-8` for August
/// 2026), matching the backend's monthly-data paths; in memory the month is
/// zero-based, `0..=11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(month: u32, year: i32) -> Option<Self> {
        if month > 11 {
            return None;
        }
        Some(MonthKey { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn encode(&self) -> String {
        format!("{}-{}", self.year, self.month + 1)
    }

    /// Whether this month is strictly after `today`'s month. Only the present
    /// and past are editable; the engine rejects mutations into locked months.
    pub fn is_locked_at(&self, today: NaiveDate) -> bool {
        (self.year, self.month) > (today.year(), today.month0())
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked_at(Utc::now().date_naive())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // rsplit keeps negative years intact ("-5-9" -> year -5, month 8)
        let (y, m) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("invalid month key '{}'", s))?;
        let year: i32 = y.parse().map_err(|_| format!("invalid year in '{}'", s))?;
        let month1: u32 = m.parse().map_err(|_| format!("invalid month in '{}'", s))?;
        if !(1..=12).contains(&month1) {
            return Err(format!("month out of range in '{}'", s));
        }
        Ok(MonthKey {
            year,
            month: month1 - 1,
        })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
