// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pending-call registry.
//
// Maps a correlation id to the sending half of the caller's reply channel.
// An entry is removed in the same critical section that finds it, so a given
// id settles at most once no matter how many events reference it afterwards.
// Duplicate and late events find nothing and are dropped.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use aitu_core::RequestId;
use aitu_core::error::{BridgeError, Result};

/// Receiving half handed to the caller.
pub type ReplyReceiver = oneshot::Receiver<Result<Value>>;

struct PendingCall {
    method: String,
    issued_at: DateTime<Utc>,
    reply: oneshot::Sender<Result<Value>>,
}

/// Read-only view of an unanswered call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSnapshot {
    pub req_id: RequestId,
    pub method: String,
    pub issued_at: DateTime<Utc>,
}

/// What `resolve` did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved,
    Rejected,
    /// No pending entry: never issued, already settled, or cancelled.
    Unmatched,
}

/// Shared registry of in-flight calls, keyed by full correlation id.
#[derive(Default)]
pub struct Registry {
    entries: Mutex<HashMap<RequestId, PendingCall>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section is a single map operation, so a poisoned lock
    // still guards a consistent map.
    fn lock(&self) -> MutexGuard<'_, HashMap<RequestId, PendingCall>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a pending call under `req_id`.
    ///
    /// Fails only if `req_id` is already pending, which generated ids never
    /// are; caller-supplied ids can collide.
    pub fn add(&self, req_id: RequestId, method: &str) -> Result<ReplyReceiver> {
        let (tx, rx) = oneshot::channel();
        let mut entries = self.lock();
        if entries.contains_key(&req_id) {
            return Err(BridgeError::DuplicateRequestId(req_id.0));
        }
        trace!(%req_id, method, "registered pending call");
        entries.insert(
            req_id,
            PendingCall {
                method: method.to_owned(),
                issued_at: Utc::now(),
                reply: tx,
            },
        );
        Ok(rx)
    }

    /// Settle the call registered under `req_id`, if any.
    ///
    /// `is_success` decides between resolving with `data` and rejecting with
    /// `error` (a missing error rejects with `null`).
    pub fn resolve(
        &self,
        req_id: &RequestId,
        data: Value,
        error: Option<Value>,
        is_success: impl FnOnce(&Value, Option<&Value>) -> bool,
    ) -> Resolution {
        let Some(pending) = self.lock().remove(req_id) else {
            trace!(%req_id, "no pending call for event; dropped");
            return Resolution::Unmatched;
        };

        let (outcome, resolution) = if is_success(&data, error.as_ref()) {
            (Ok(data), Resolution::Resolved)
        } else {
            (
                Err(BridgeError::Host(error.unwrap_or(Value::Null))),
                Resolution::Rejected,
            )
        };

        debug!(%req_id, method = %pending.method, ?resolution, "settled pending call");
        if pending.reply.send(outcome).is_err() {
            trace!(%req_id, "caller stopped waiting before the reply arrived");
        }
        resolution
    }

    /// Drop the entry for `req_id` without settling it. The caller's reply
    /// future observes a closed channel.
    pub fn discard(&self, req_id: &RequestId) -> bool {
        self.lock().remove(req_id).is_some()
    }

    pub fn contains(&self, req_id: &RequestId) -> bool {
        self.lock().contains_key(req_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Unanswered calls, oldest first.
    pub fn snapshot(&self) -> Vec<PendingSnapshot> {
        let mut pending: Vec<PendingSnapshot> = self
            .lock()
            .iter()
            .map(|(req_id, call)| PendingSnapshot {
                req_id: req_id.clone(),
                method: call.method.clone(),
                issued_at: call.issued_at,
            })
            .collect();
        pending.sort_by(|a, b| a.issued_at.cmp(&b.issued_at).then(a.req_id.cmp(&b.req_id)));
        pending
    }
}
