// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Transport-level failure talking to the backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// 401 from the backend; the caller is expected to invalidate the session.
    #[error("unauthorized")]
    Unauthorized,
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Engine-level failure surfaced to the facade.
///
/// Validation errors are raised synchronously and never reach the network;
/// remote errors abort the operation before any local state has changed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("remote call failed: {0}")]
    Remote(#[from] RemoteError),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }
}
