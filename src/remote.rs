// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use log::debug;
use reqwest::{Response, StatusCode};

use crate::error::RemoteError;
use crate::models::{
    DashboardSummary, NewNotification, NewTarget, NewTransaction, Notification, Target,
    TargetPatch, Transaction,
};
use crate::monthkey::MonthKey;

/// The remote persistence service the engine reconciles against.
///
/// One method per consumed endpoint; the engine never constructs ids or
/// server-computed figures itself. Tests substitute an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait RemoteService {
    async fn transactions_for(&self, key: MonthKey) -> Result<Vec<Transaction>, RemoteError>;
    async fn create_transaction(&self, draft: &NewTransaction)
        -> Result<Transaction, RemoteError>;
    async fn delete_transaction(&self, id: &str) -> Result<(), RemoteError>;

    async fn targets(&self) -> Result<Vec<Target>, RemoteError>;
    async fn create_target(&self, draft: &NewTarget) -> Result<Target, RemoteError>;
    async fn update_target(&self, id: &str, patch: &TargetPatch) -> Result<Target, RemoteError>;
    async fn delete_target(&self, id: &str) -> Result<(), RemoteError>;

    /// Server-computed month summary. Callers fall back to local computation
    /// when this fails; implementations should not retry.
    async fn monthly_summary(&self, key: MonthKey) -> Result<DashboardSummary, RemoteError>;

    async fn notifications(&self) -> Result<Vec<Notification>, RemoteError>;
    async fn create_notification(&self, draft: &NewNotification) -> Result<(), RemoteError>;
    async fn mark_notification_read(&self, id: &str) -> Result<(), RemoteError>;
    async fn delete_notification(&self, id: &str) -> Result<(), RemoteError>;
    async fn clear_read_notifications(&self) -> Result<(), RemoteError>;
}

/// REST-backed implementation. Attaches the bearer token to every call and
/// maps 401 to `RemoteError::Unauthorized` so the caller can invalidate the
/// session.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpRemote {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        HttpRemote {
            client,
            base_url,
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(&self, resp: Response) -> Result<Response, RemoteError> {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(RemoteError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        debug!("GET {}", path);
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(self.check(resp).await?.json().await?)
    }

    async fn send_json<B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, RemoteError> {
        debug!("{} {}", method, path);
        let mut req = self
            .client
            .request(method, self.url(path))
            .bearer_auth(&self.token);
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        self.check(resp).await
    }
}

impl RemoteService for HttpRemote {
    async fn transactions_for(&self, key: MonthKey) -> Result<Vec<Transaction>, RemoteError> {
        self.get_json(&format!(
            "/transactions?month={}&year={}",
            key.month, key.year
        ))
        .await
    }

    async fn create_transaction(
        &self,
        draft: &NewTransaction,
    ) -> Result<Transaction, RemoteError> {
        let resp = self
            .send_json(reqwest::Method::POST, "/transactions", Some(draft))
            .await?;
        Ok(resp.json().await?)
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), RemoteError> {
        self.send_json::<()>(reqwest::Method::DELETE, &format!("/transactions/{}", id), None)
            .await?;
        Ok(())
    }

    async fn targets(&self) -> Result<Vec<Target>, RemoteError> {
        self.get_json("/targets").await
    }

    async fn create_target(&self, draft: &NewTarget) -> Result<Target, RemoteError> {
        let resp = self
            .send_json(reqwest::Method::POST, "/targets", Some(draft))
            .await?;
        Ok(resp.json().await?)
    }

    async fn update_target(&self, id: &str, patch: &TargetPatch) -> Result<Target, RemoteError> {
        let resp = self
            .send_json(reqwest::Method::PUT, &format!("/targets/{}", id), Some(patch))
            .await?;
        Ok(resp.json().await?)
    }

    async fn delete_target(&self, id: &str) -> Result<(), RemoteError> {
        self.send_json::<()>(reqwest::Method::DELETE, &format!("/targets/{}", id), None)
            .await?;
        Ok(())
    }

    async fn monthly_summary(&self, key: MonthKey) -> Result<DashboardSummary, RemoteError> {
        self.get_json(&format!(
            "/monthly-data/{}/{}/summary",
            key.year,
            key.month + 1
        ))
        .await
    }

    async fn notifications(&self) -> Result<Vec<Notification>, RemoteError> {
        self.get_json("/notifications").await
    }

    async fn create_notification(&self, draft: &NewNotification) -> Result<(), RemoteError> {
        self.send_json(reqwest::Method::POST, "/notifications", Some(draft))
            .await?;
        Ok(())
    }

    async fn mark_notification_read(&self, id: &str) -> Result<(), RemoteError> {
        self.send_json::<()>(
            reqwest::Method::PATCH,
            &format!("/notifications/{}/read", id),
            None,
        )
        .await?;
        Ok(())
    }

    async fn delete_notification(&self, id: &str) -> Result<(), RemoteError> {
        self.send_json::<()>(reqwest::Method::DELETE, &format!("/notifications/{}", id), None)
            .await?;
        Ok(())
    }

    async fn clear_read_notifications(&self) -> Result<(), RemoteError> {
        self.send_json::<()>(reqwest::Method::DELETE, "/notifications/read", None)
            .await?;
        Ok(())
    }
}
