// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;
use thiserror::Error;

/// Everything the store, the server and the sync client can fail with.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("write lock not acquired within {0:?}")]
    LockTimeout(Duration),

    #[error("ID not found: {0}")]
    IdNotFound(String),

    #[error("archive lookup failed: {0}")]
    ArchiveLocate(String),

    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
