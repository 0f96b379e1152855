// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the Aitu bridge client.

use std::time::Duration;

use thiserror::Error;

/// Top-level error type for all bridge operations.
///
/// Facade calls never return this synchronously; it only ever surfaces as the
/// output of a reply future.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Host replies --
    /// The host answered with a non-null `error` field. The payload is kept
    /// verbatim; see [`crate::host_errors`] for classification.
    #[error("host rejected the call: {0}")]
    Host(serde_json::Value),

    #[error("reply payload did not match the expected shape: {0}")]
    Decode(String),

    // -- Client side --
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("request id already pending: {0}")]
    DuplicateRequestId(String),

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("bridge closed before the host replied")]
    Closed,

    // -- Host surface --
    #[error("host surface error: {0}")]
    Surface(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// The raw host error payload, if this is a host rejection.
    pub fn host_payload(&self) -> Option<&serde_json::Value> {
        match self {
            BridgeError::Host(payload) => Some(payload),
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;
