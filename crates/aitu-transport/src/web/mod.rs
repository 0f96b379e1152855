// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cross-window transport (iframe embedded in a parent web page).
//
// Outbound requests are posted to the parent window as
// `{ source, method, reqId, payload: [...] }`, scoped to the origin resolved
// at construction. Inbound replies arrive as window messages; this transport
// origin-checks them and republishes them on the shared event channel, which
// is the one translation step the other transports do not need.

pub mod origin;

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use aitu_core::error::Result;
use aitu_core::{CallbackSlot, RequestId};

use crate::traits::*;

pub use origin::resolve_origin;

/// Transport talking to the parent window.
pub struct CrossWindowTransport {
    window: Arc<dyn ParentWindow>,
    sink: Arc<dyn EventSink>,
    origin: String,
    source: String,
}

impl CrossWindowTransport {
    pub fn new(
        window: Arc<dyn ParentWindow>,
        sink: Arc<dyn EventSink>,
        origin: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            window,
            sink,
            origin: origin.into(),
            source: source.into(),
        }
    }

    /// Origin every message is scoped to.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Handle a message received from another window.
    ///
    /// Messages from any origin other than the resolved one, and null
    /// payloads, are dropped. Everything else is republished on the shared
    /// channel. A JSON-string payload naming a click-handler method also fires
    /// the matching callback.
    pub fn receive(&self, origin: &str, data: &Value) {
        if origin != self.origin {
            trace!(origin, expected = %self.origin, "ignoring message from foreign origin");
            return;
        }
        if data.is_null() {
            return;
        }

        self.sink.emit(data.clone());

        let Some(text) = data.as_str().filter(|s| !s.is_empty()) else {
            return;
        };
        match serde_json::from_str::<Value>(text) {
            Ok(message) => self.route_handler_call(&message),
            Err(e) => debug!("error parsing message data: {e}"),
        }
    }

    fn route_handler_call(&self, message: &Value) {
        let Some(method) = message.get("method").and_then(Value::as_str) else {
            return;
        };
        match CallbackSlot::from_registration_method(method) {
            Some(CallbackSlot::BackArrowClick) => {
                self.sink.fire_callback(CallbackSlot::BackArrowClick, None);
            }
            Some(CallbackSlot::HeaderMenuItemClick) => {
                self.sink.fire_callback(
                    CallbackSlot::HeaderMenuItemClick,
                    message.get("param").cloned(),
                );
            }
            _ => {}
        }
    }
}

impl Transport for CrossWindowTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::CrossWindow
    }

    /// Always `true`. The parent page exposes a single message entry point
    /// and offers no per-method probe, so every method is forwarded and the
    /// parent decides what it can serve. Callers cannot use this to detect
    /// missing methods when framed.
    fn supports(&self, _method: &str) -> bool {
        true
    }

    fn dispatch(&self, method: &str, req_id: &RequestId, args: &[Value]) -> Result<Dispatch> {
        let message = json!({
            "source": self.source,
            "method": method,
            "reqId": req_id.as_str(),
            "payload": args,
        });
        debug!(method, %req_id, origin = %self.origin, "cross-window dispatch");
        if let Err(e) = self.window.post_message(message, &self.origin) {
            warn!(method, "parent window rejected message: {e}");
            return Err(e);
        }
        Ok(Dispatch::Sent)
    }
}
