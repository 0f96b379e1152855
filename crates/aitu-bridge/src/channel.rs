// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared inbound event channel and the demultiplexer that feeds the registry.
//
// All transports deliver replies on one channel. Listeners are called in
// registration order, synchronously, on whichever thread publishes the event.
// The listener list is snapshotted before the fan-out so a listener may
// subscribe further listeners without deadlocking; those only see later
// events.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::trace;

use aitu_core::{InboundEvent, SuccessRule};

use crate::registry::{Registry, Resolution};

/// Raw event listener.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Single process-wide channel for inbound reply events.
#[derive(Default)]
pub struct EventChannel {
    listeners: Mutex<Vec<Listener>>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. Listeners are never removed.
    pub fn subscribe(&self, listener: Listener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }

    /// Deliver `detail` to every listener, in registration order.
    pub fn publish(&self, detail: &Value) {
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .map(|l| l.clone())
            .unwrap_or_default();
        trace!(listeners = snapshot.len(), "publishing inbound event");
        for listener in snapshot {
            listener(detail);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }
}

/// Routes inbound events to the registry by correlation id.
pub struct Demultiplexer {
    registry: Arc<Registry>,
    rule: SuccessRule,
}

impl Demultiplexer {
    pub fn new(registry: Arc<Registry>, rule: SuccessRule) -> Self {
        Self { registry, rule }
    }

    /// Subscribe a demultiplexer to `channel`. Call once per channel.
    pub fn attach(channel: &EventChannel, registry: Arc<Registry>, rule: SuccessRule) {
        let demux = Self::new(registry, rule);
        channel.subscribe(Arc::new(move |detail: &Value| {
            demux.route(detail);
        }));
    }

    /// Handle one raw event. Payloads without a correlation id are ignored.
    pub fn route(&self, detail: &Value) -> Resolution {
        let Some(event) = InboundEvent::from_detail(detail) else {
            trace!("event carries no correlation id; ignored");
            return Resolution::Unmatched;
        };
        let rule = self.rule;
        self.registry.resolve(&event.req_id, event.data, event.error, move |data, error| {
            rule.is_success(data, error)
        })
    }
}
