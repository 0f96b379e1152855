// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reply futures handed back by the facade.
//
// A `PendingReply` settles when the demultiplexer resolves its registry entry.
// Calls that could not be dispatched because the host surface is missing
// never settle. The optional deadline is the opt-in timeout layer: it rejects
// with `Timeout` and discards the registry entry so a late reply is dropped,
// but the registry itself knows nothing about time.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::{Instant, Sleep};
use tracing::debug;

use aitu_core::RequestId;
use aitu_core::error::{BridgeError, Result};

use crate::registry::{Registry, ReplyReceiver};

enum ReplyState {
    Waiting {
        rx: ReplyReceiver,
        registry: Weak<Registry>,
    },
    /// Settled before dispatch (validation failure, surface error).
    Ready(Option<Result<Value>>),
    /// No host surface; stays pending forever.
    Never,
    Done,
}

struct Deadline {
    after: Duration,
    issued_at: Instant,
    sleep: Option<Pin<Box<Sleep>>>,
}

/// Future resolving to the host's reply payload.
#[must_use = "a reply does nothing unless awaited"]
pub struct PendingReply {
    req_id: Option<RequestId>,
    issued_at: Instant,
    state: ReplyState,
    deadline: Option<Deadline>,
}

impl PendingReply {
    pub(crate) fn waiting(req_id: RequestId, rx: ReplyReceiver, registry: &Arc<Registry>) -> Self {
        Self {
            req_id: Some(req_id),
            issued_at: Instant::now(),
            state: ReplyState::Waiting {
                rx,
                registry: Arc::downgrade(registry),
            },
            deadline: None,
        }
    }

    pub(crate) fn never(req_id: RequestId) -> Self {
        Self {
            req_id: Some(req_id),
            issued_at: Instant::now(),
            state: ReplyState::Never,
            deadline: None,
        }
    }

    pub(crate) fn rejected(err: BridgeError) -> Self {
        Self {
            req_id: None,
            issued_at: Instant::now(),
            state: ReplyState::Ready(Some(Err(err))),
            deadline: None,
        }
    }

    /// Correlation id of the call, if one was issued.
    pub fn req_id(&self) -> Option<&RequestId> {
        self.req_id.as_ref()
    }

    /// Reject with [`BridgeError::Timeout`] if no reply arrives within
    /// `after` of the call being issued. Replaces any earlier deadline.
    ///
    /// The deadline is a tokio timer, so a reply with a deadline must be
    /// polled inside a tokio runtime with the time driver enabled. Replies
    /// without one can be awaited on any executor.
    pub fn timeout(mut self, after: Duration) -> Self {
        self.deadline = Some(Deadline {
            after,
            issued_at: self.issued_at,
            sleep: None,
        });
        self
    }

    /// Decode the reply payload into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> TypedReply<T> {
        TypedReply {
            inner: self,
            _marker: PhantomData,
        }
    }

    fn expire(&mut self) {
        if let (Some(req_id), ReplyState::Waiting { registry, .. }) = (&self.req_id, &self.state) {
            if let Some(registry) = registry.upgrade() {
                registry.discard(req_id);
            }
        }
        self.state = ReplyState::Done;
    }
}

impl Future for PendingReply {
    type Output = Result<Value>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        match &mut this.state {
            ReplyState::Ready(outcome) => {
                let outcome = outcome.take().unwrap_or(Err(BridgeError::Closed));
                this.state = ReplyState::Done;
                return Poll::Ready(outcome);
            }
            ReplyState::Waiting { rx, .. } => {
                if let Poll::Ready(received) = Pin::new(rx).poll(cx) {
                    this.state = ReplyState::Done;
                    return Poll::Ready(received.unwrap_or(Err(BridgeError::Closed)));
                }
            }
            ReplyState::Never => {}
            ReplyState::Done => return Poll::Ready(Err(BridgeError::Closed)),
        }

        let Some(deadline) = this.deadline.as_mut() else {
            return Poll::Pending;
        };
        let (issued_at, after) = (deadline.issued_at, deadline.after);
        let sleep = deadline
            .sleep
            .get_or_insert_with(|| Box::pin(tokio::time::sleep_until(issued_at + after)));
        if sleep.as_mut().poll(cx).is_pending() {
            return Poll::Pending;
        }

        debug!(req_id = ?this.req_id, ?after, "call timed out");
        this.expire();
        Poll::Ready(Err(BridgeError::Timeout(after)))
    }
}

/// [`PendingReply`] decoded into a typed response.
#[must_use = "a reply does nothing unless awaited"]
pub struct TypedReply<T> {
    inner: PendingReply,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedReply<T> {
    pub fn req_id(&self) -> Option<&RequestId> {
        self.inner.req_id()
    }

    pub fn timeout(self, after: Duration) -> Self {
        Self {
            inner: self.inner.timeout(after),
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Future for TypedReply<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll(cx) {
            Poll::Ready(Ok(payload)) => Poll::Ready(
                serde_json::from_value(payload).map_err(|e| BridgeError::Decode(e.to_string())),
            ),
            Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
            Poll::Pending => Poll::Pending,
        }
    }
}
