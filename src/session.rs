// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use chrono::Datelike;
use log::{debug, error, warn};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::cache::MonthCache;
use crate::error::EngineError;
use crate::evaluator;
use crate::mirror::Mirror;
use crate::models::{
    Category, DashboardSummary, MonthData, NewTarget, NewTransaction, Notification, Target,
    TargetPatch, Transaction, TxnKind,
};
use crate::monthkey::MonthKey;
use crate::remote::RemoteService;
use crate::summary::summarize;

/// Caller-supplied transaction input; `month`/`year` are derived from `date`
/// and the owning user from the session.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: TxnKind,
    pub amount: Decimal,
    pub category: Category,
    pub date: chrono::NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TargetDraft {
    pub kind: TxnKind,
    pub category: Category,
    pub target_amount: Decimal,
}

/// Read-only view of the session handed to consumers. Collections are
/// cloned out; nothing outside the coordinator mutates session state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub month: MonthKey,
    pub transactions: Vec<Transaction>,
    pub targets: Vec<Target>,
    pub notifications: Vec<Notification>,
    pub summary: DashboardSummary,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
struct SessionState {
    current: MonthKey,
    transactions: Vec<Transaction>,
    targets: Vec<Target>,
    notifications: Vec<Notification>,
    summary: DashboardSummary,
    loading: bool,
    error: Option<String>,
    cache: MonthCache,
}

/// Single owner of the in-memory financial state for one signed-in user.
///
/// Every mutation follows the same three-phase shape: validate, call the
/// remote service, then update local state. Local state therefore never
/// reflects a write the backend rejected. The state sits behind one async
/// mutex; concurrent operations interleave at await points and the last
/// completion wins, which is acceptable for a single-user client.
pub struct SessionContext<R: RemoteService> {
    remote: R,
    mirror: Mirror,
    user_id: Option<String>,
    state: Arc<Mutex<SessionState>>,
}

impl<R: RemoteService + Clone> Clone for SessionContext<R> {
    fn clone(&self) -> Self {
        SessionContext {
            remote: self.remote.clone(),
            mirror: self.mirror.clone(),
            user_id: self.user_id.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: RemoteService> SessionContext<R> {
    /// Build a session for `initial` month, seeding summary and month cache
    /// from the local mirror so consumers have data before the first fetch
    /// resolves.
    pub fn new(remote: R, mirror: Mirror, user_id: Option<String>, initial: MonthKey) -> Self {
        let cache = mirror.load_months().unwrap_or_default();
        let summary = mirror.load_summary().unwrap_or_default();
        let mut state = SessionState {
            current: initial,
            transactions: Vec::new(),
            targets: Vec::new(),
            notifications: Vec::new(),
            summary,
            loading: false,
            error: None,
            cache,
        };
        if let Some(data) = state.cache.get(initial) {
            state.transactions = data.transactions.clone();
            state.targets = data.targets.clone();
            state.summary = data.summary.clone();
        }
        SessionContext {
            remote,
            mirror,
            user_id,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let st = self.state.lock().await;
        SessionSnapshot {
            month: st.current,
            transactions: st.transactions.clone(),
            targets: st.targets.clone(),
            notifications: st.notifications.clone(),
            summary: st.summary.clone(),
            loading: st.loading,
            error: st.error.clone(),
        }
    }

    /// Navigate to a month. A cached month is served instantly with no
    /// network call; a miss fetches transactions and targets concurrently,
    /// attempts the server-computed summary, and caches the triple.
    pub async fn set_month(&self, key: MonthKey) -> Result<(), EngineError> {
        self.begin().await;
        let res = self.set_month_inner(key).await;
        self.finish(&res).await;
        res
    }

    async fn set_month_inner(&self, key: MonthKey) -> Result<(), EngineError> {
        {
            let mut st = self.state.lock().await;
            if let Some(data) = st.cache.get(key).cloned() {
                debug!("month {} served from cache", key);
                st.current = key;
                st.transactions = data.transactions;
                st.targets = data.targets;
                st.summary = data.summary;
                self.mirror.save_summary(&st.summary);
                return Ok(());
            }
        }

        debug!("month {} not cached, fetching", key);
        let (transactions, targets) = {
            let (t, g) = tokio::join!(self.remote.transactions_for(key), self.remote.targets());
            (t?, g?)
        };
        let summary = match self.remote.monthly_summary(key).await {
            Ok(s) => s,
            Err(e) => {
                // not fatal; derive the figures from what we just fetched
                debug!("summary fetch for {} failed ({}), computing locally", key, e);
                summarize(&transactions)
            }
        };

        let mut st = self.state.lock().await;
        st.cache.insert(
            key,
            MonthData {
                transactions: transactions.clone(),
                targets: targets.clone(),
                summary: summary.clone(),
            },
        );
        st.current = key;
        st.transactions = transactions;
        st.targets = targets;
        st.summary = summary;
        self.mirror.save_months(&st.cache);
        self.mirror.save_summary(&st.summary);
        Ok(())
    }

    /// Create a transaction. The draft's month must not be locked (future
    /// months are read-only, enforced here rather than left to the UI
    /// affordance). On success the displayed summary is republished
    /// immediately when the draft lands in the displayed month, the cache
    /// entry for the draft's month is updated when one exists (an unvisited
    /// month stays absent so its first navigation still fetches), and targets
    /// are re-fetched before the evaluator runs: their running totals are
    /// server-computed and never bumped locally.
    pub async fn add_transaction(
        &self,
        draft: TransactionDraft,
    ) -> Result<Transaction, EngineError> {
        self.begin().await;
        let res = self.add_transaction_inner(draft).await;
        self.finish(&res).await;
        res
    }

    async fn add_transaction_inner(
        &self,
        draft: TransactionDraft,
    ) -> Result<Transaction, EngineError> {
        let user_id = self.require_user()?;
        if draft.amount <= Decimal::ZERO {
            return Err(EngineError::validation("amount must be positive"));
        }
        if !draft.category.allows(draft.kind) {
            return Err(EngineError::validation(format!(
                "category '{}' is not valid for {} transactions",
                draft.category.as_str(),
                draft.kind.as_str()
            )));
        }
        let key = MonthKey::from_date(draft.date);
        if key.is_locked() {
            return Err(EngineError::validation(format!(
                "month {} is in the future and locked for edits",
                key
            )));
        }

        let new = NewTransaction {
            kind: draft.kind,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            month: draft.date.month0(),
            year: draft.date.year(),
            description: draft.description,
            user_id,
        };
        let created = self.remote.create_transaction(&new).await?;

        {
            let mut st = self.state.lock().await;
            // re-check the displayed key at completion time; a navigation may
            // have finished while the create was in flight
            if key == st.current {
                st.transactions.push(created.clone());
                st.transactions.retain(|t| t.amount > Decimal::ZERO);
                st.summary = summarize(&st.transactions);
                self.mirror.save_summary(&st.summary);
            }
            st.cache.apply_insert(key, created.clone());
            self.mirror.save_months(&st.cache);
        }

        self.refetch_targets_and_evaluate().await?;
        Ok(created)
    }

    /// Delete a transaction known to this session. Fails fast when the id is
    /// not found locally; nothing is sent to the backend in that case.
    pub async fn delete_transaction(&self, id: &str) -> Result<(), EngineError> {
        self.begin().await;
        let res = self.delete_transaction_inner(id).await;
        self.finish(&res).await;
        res
    }

    async fn delete_transaction_inner(&self, id: &str) -> Result<(), EngineError> {
        let key = {
            let st = self.state.lock().await;
            st.transactions
                .iter()
                .find(|t| t.id == id)
                .map(|t| MonthKey::from_date(t.date))
                .or_else(|| st.cache.find_transaction(id).map(|(key, _)| key))
                .ok_or_else(|| EngineError::validation(format!("transaction '{}' not found", id)))?
        };

        self.remote.delete_transaction(id).await?;

        {
            let mut st = self.state.lock().await;
            if key == st.current {
                st.transactions.retain(|t| t.id != id);
                st.summary = summarize(&st.transactions);
                self.mirror.save_summary(&st.summary);
            }
            st.cache.apply_remove(key, id);
            self.mirror.save_months(&st.cache);
        }

        self.refetch_targets_and_evaluate().await?;
        Ok(())
    }

    pub async fn add_target(&self, draft: TargetDraft) -> Result<Target, EngineError> {
        self.begin().await;
        let res = self.add_target_inner(draft).await;
        self.finish(&res).await;
        res
    }

    async fn add_target_inner(&self, draft: TargetDraft) -> Result<Target, EngineError> {
        let user_id = self.require_user()?;
        if draft.target_amount <= Decimal::ZERO {
            return Err(EngineError::validation("target amount must be positive"));
        }
        if !draft.category.allows(draft.kind) {
            return Err(EngineError::validation(format!(
                "category '{}' is not valid for {} targets",
                draft.category.as_str(),
                draft.kind.as_str()
            )));
        }

        let new = NewTarget {
            user_id,
            category: draft.category,
            kind: draft.kind,
            target_amount: draft.target_amount,
        };
        let created = self.remote.create_target(&new).await?;

        let targets = {
            let mut st = self.state.lock().await;
            st.targets.push(created.clone());
            let targets = st.targets.clone();
            let cur = st.current;
            st.cache.set_targets(cur, &targets);
            self.mirror.save_months(&st.cache);
            targets
        };
        self.evaluate_targets(&targets).await?;
        Ok(created)
    }

    pub async fn update_target(
        &self,
        id: &str,
        patch: TargetPatch,
    ) -> Result<Target, EngineError> {
        self.begin().await;
        let res = self.update_target_inner(id, patch).await;
        self.finish(&res).await;
        res
    }

    async fn update_target_inner(
        &self,
        id: &str,
        patch: TargetPatch,
    ) -> Result<Target, EngineError> {
        if let Some(amount) = patch.target_amount {
            if amount <= Decimal::ZERO {
                return Err(EngineError::validation("target amount must be positive"));
            }
        }
        {
            // validate the pairing the target would end up with, falling back
            // to the local copy for whichever field the patch leaves out
            let st = self.state.lock().await;
            let current = st.targets.iter().find(|t| t.id == id);
            let kind = patch.kind.or(current.map(|t| t.kind));
            let category = patch.category.or(current.map(|t| t.category));
            if let (Some(kind), Some(category)) = (kind, category) {
                if !category.allows(kind) {
                    return Err(EngineError::validation(format!(
                        "category '{}' is not valid for {} targets",
                        category.as_str(),
                        kind.as_str()
                    )));
                }
            }
        }

        let updated = self.remote.update_target(id, &patch).await?;

        let targets = {
            let mut st = self.state.lock().await;
            if let Some(slot) = st.targets.iter_mut().find(|t| t.id == id) {
                *slot = updated.clone();
            }
            let targets = st.targets.clone();
            let cur = st.current;
            st.cache.set_targets(cur, &targets);
            self.mirror.save_months(&st.cache);
            targets
        };
        self.evaluate_targets(&targets).await?;
        Ok(updated)
    }

    pub async fn delete_target(&self, id: &str) -> Result<(), EngineError> {
        self.begin().await;
        let res = self.delete_target_inner(id).await;
        self.finish(&res).await;
        res
    }

    async fn delete_target_inner(&self, id: &str) -> Result<(), EngineError> {
        self.remote.delete_target(id).await?;

        let targets = {
            let mut st = self.state.lock().await;
            st.targets.retain(|t| t.id != id);
            let targets = st.targets.clone();
            let cur = st.current;
            st.cache.set_targets(cur, &targets);
            self.mirror.save_months(&st.cache);
            targets
        };
        self.evaluate_targets(&targets).await?;
        Ok(())
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<(), EngineError> {
        self.begin().await;
        let res = async {
            self.remote.mark_notification_read(id).await?;
            let mut st = self.state.lock().await;
            if let Some(n) = st.notifications.iter_mut().find(|n| n.id == id) {
                n.is_read = true;
            }
            Ok(())
        }
        .await;
        self.finish(&res).await;
        res
    }

    pub async fn delete_notification(&self, id: &str) -> Result<(), EngineError> {
        self.begin().await;
        let res = async {
            self.remote.delete_notification(id).await?;
            let mut st = self.state.lock().await;
            st.notifications.retain(|n| n.id != id);
            Ok(())
        }
        .await;
        self.finish(&res).await;
        res
    }

    pub async fn clear_read_notifications(&self) -> Result<(), EngineError> {
        self.begin().await;
        let res = async {
            self.remote.clear_read_notifications().await?;
            let mut st = self.state.lock().await;
            st.notifications.retain(|n| !n.is_read);
            Ok(())
        }
        .await;
        self.finish(&res).await;
        res
    }

    /// Replace the notification list with the server's.
    pub async fn refresh_notifications(&self) -> Result<(), EngineError> {
        let list = self.remote.notifications().await?;
        self.state.lock().await.notifications = list;
        Ok(())
    }

    /// Targets carry server-computed running totals, so after any transaction
    /// mutation the whole list is re-fetched and replaces local state before
    /// the evaluator runs.
    async fn refetch_targets_and_evaluate(&self) -> Result<(), EngineError> {
        let targets = self.remote.targets().await?;
        {
            let mut st = self.state.lock().await;
            st.targets = targets.clone();
            let cur = st.current;
            st.cache.set_targets(cur, &targets);
        }
        self.evaluate_targets(&targets).await
    }

    /// Persist a notification for every target in a notifiable band, then
    /// re-fetch the list so local ids are all server-issued. Delivery is
    /// at-least-once; a failed create is logged and skipped.
    async fn evaluate_targets(&self, targets: &[Target]) -> Result<(), EngineError> {
        let payloads = evaluator::evaluate(targets);
        if payloads.is_empty() {
            return Ok(());
        }
        let mut persisted = false;
        for p in &payloads {
            match self.remote.create_notification(p).await {
                Ok(()) => persisted = true,
                Err(e) => warn!("notification '{}' not persisted: {}", p.title, e),
            }
        }
        if persisted {
            let list = self.remote.notifications().await?;
            self.state.lock().await.notifications = list;
        }
        Ok(())
    }

    fn require_user(&self) -> Result<String, EngineError> {
        self.user_id
            .clone()
            .ok_or_else(|| EngineError::validation("no authenticated user"))
    }

    async fn begin(&self) {
        let mut st = self.state.lock().await;
        st.loading = true;
        st.error = None;
    }

    /// Finally-equivalent: always clears the loading flag; a remote failure
    /// additionally becomes the session-wide error string.
    async fn finish<T>(&self, res: &Result<T, EngineError>) {
        let mut st = self.state.lock().await;
        st.loading = false;
        if let Err(e @ EngineError::Remote(_)) = res {
            error!("operation failed: {}", e);
            st.error = Some(e.to_string());
        }
    }
}
