// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewNotification, Severity, Target, TxnKind};
use crate::summary::progress;

/// Progress classification of a target. Only the upper three bands produce
/// a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Quiet,
    Approaching,
    Achieved,
    Exceeded,
}

const APPROACHING_THRESHOLD: f64 = 80.0;

/// Classify a target by its completion percentage.
pub fn classify(target: &Target) -> Band {
    let pct = progress(target);
    if pct >= 100.0 {
        match target.kind {
            TxnKind::Income => Band::Achieved,
            TxnKind::Expense => Band::Exceeded,
        }
    } else if pct >= APPROACHING_THRESHOLD {
        Band::Approaching
    } else {
        Band::Quiet
    }
}

/// Build the notification payload for a target, if its band warrants one.
///
/// Delivery is at-least-once: the payload carries no identity and the same
/// band will produce the same payload on every evaluation. The server owns
/// notification ids and deduplication.
pub fn notification_for(target: &Target) -> Option<NewNotification> {
    let category = target.category.as_str();
    let (title, message, severity) = match classify(target) {
        Band::Quiet => return None,
        Band::Achieved => (
            format!("{} goal achieved", category),
            format!(
                "Your {} income has reached its target of {}.",
                category, target.target_amount
            ),
            Severity::Success,
        ),
        Band::Exceeded => (
            format!("{} limit exceeded", category),
            format!(
                "Your {} spending ({}) has exceeded its limit of {}.",
                category, target.current_amount, target.target_amount
            ),
            Severity::Warning,
        ),
        Band::Approaching => {
            let severity = match target.kind {
                TxnKind::Income => Severity::Success,
                TxnKind::Expense => Severity::Info,
            };
            (
                format!("{} target approaching", category),
                format!(
                    "Your {} {} ({}) is approaching its target of {}.",
                    category,
                    target.kind.as_str(),
                    target.current_amount,
                    target.target_amount
                ),
                severity,
            )
        }
    };
    Some(NewNotification {
        title,
        message,
        severity,
        user_id: target.user_id.clone(),
    })
}

/// Evaluate every loaded target and collect the payloads to persist.
pub fn evaluate(targets: &[Target]) -> Vec<NewNotification> {
    targets.iter().filter_map(notification_for).collect()
}
