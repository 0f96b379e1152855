// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The bridge facade: binds id generation, the pending-call registry, the
// shared event channel and the selected transport into one handle.
//
// Every call follows the same four steps: take a fresh id from the call's
// namespace, register a pending entry, hand the request to the transport,
// return the reply future. Nothing here returns an error synchronously.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use aitu_core::{BridgeConfig, CallbackSlot, RequestId};
use aitu_core::error::BridgeError;
use aitu_transport::{
    ActiveTransport, Dispatch, EventSink, HostEnvironment, Transport, TransportKind,
    select_transport,
};

use crate::callbacks::{CallbackHandler, CallbackTable};
use crate::channel::{Demultiplexer, EventChannel};
use crate::counter::IdNamespaces;
use crate::registry::{PendingSnapshot, Registry};
use crate::reply::PendingReply;

/// State shared between the facade and the transports that feed events back.
struct Core {
    registry: Arc<Registry>,
    ids: IdNamespaces,
    channel: EventChannel,
    callbacks: CallbackTable,
}

impl EventSink for Core {
    fn emit(&self, detail: Value) {
        self.channel.publish(&detail);
    }

    fn fire_callback(&self, slot: CallbackSlot, param: Option<Value>) {
        self.callbacks.fire(slot, param);
    }
}

/// Handle to the host bridge. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Bridge {
    core: Arc<Core>,
    transport: Arc<ActiveTransport>,
    config: Arc<BridgeConfig>,
}

impl Bridge {
    /// Probe `env` once and build a bridge over whatever surface it offers.
    ///
    /// A `config` that fails [`BridgeConfig::validate`] is replaced by the
    /// defaults.
    pub fn new(env: &dyn HostEnvironment, config: BridgeConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("invalid bridge config, using defaults: {e}");
                BridgeConfig::default()
            }
        };

        let registry = Arc::new(Registry::new());
        let channel = EventChannel::new();
        Demultiplexer::attach(&channel, registry.clone(), config.success_rule);

        let core = Arc::new(Core {
            registry,
            ids: IdNamespaces::default(),
            channel,
            callbacks: CallbackTable::new(),
        });
        let transport = select_transport(env, core.clone(), &config);

        Self {
            core,
            transport: Arc::new(transport),
            config: Arc::new(config),
        }
    }

    /// [`Bridge::new`] with the default configuration.
    pub fn detect(env: &dyn HostEnvironment) -> Self {
        Self::new(env, BridgeConfig::default())
    }

    /// Crate version.
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    /// Whether a host is present. On the message-post transport the `invoke`
    /// handler must be registered as well.
    pub fn is_supported(&self) -> bool {
        match self.transport.kind() {
            TransportKind::Unsupported => false,
            TransportKind::MessagePost => self.transport.supports("invoke"),
            TransportKind::DirectCall | TransportKind::CrossWindow => true,
        }
    }

    /// Whether the active host surface exposes `method`.
    pub fn supports(&self, method: &str) -> bool {
        self.transport.supports(method)
    }

    // -- Inbound ------------------------------------------------------------

    /// Add a raw listener to the shared event channel. Listeners run after
    /// the reply demultiplexer, in registration order.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.core.channel.subscribe(Arc::new(listener));
    }

    /// Entry point for hosts delivering a reply event,
    /// `{ reqId, data, error }`.
    pub fn deliver(&self, detail: Value) {
        self.core.emit(detail);
    }

    /// Entry point for window messages when running framed. Ignored on the
    /// other transports.
    pub fn receive_window_message(&self, origin: &str, data: &Value) {
        match self.transport.as_cross_window() {
            Some(window) => window.receive(origin, data),
            None => trace!(origin, "window message ignored; not on cross-window transport"),
        }
    }

    // -- Outbound -----------------------------------------------------------

    /// Call `method` with positional `args`. Ids are `<method>:<n>`.
    pub fn call(&self, method: &str, args: Vec<Value>) -> PendingReply {
        let req_id = self.core.ids.next_id(&format!("{method}:"));
        self.issue(method, req_id, &args)
    }

    /// Call `method` with ids drawn from `namespace` instead of the method
    /// name. The namespace is used verbatim as the id prefix.
    pub fn call_namespaced(&self, namespace: &str, method: &str, args: Vec<Value>) -> PendingReply {
        let req_id = self.core.ids.next_id(namespace);
        self.issue(method, req_id, &args)
    }

    /// Call `method` under a caller-chosen id. Rejects with
    /// [`BridgeError::DuplicateRequestId`] if that id is still pending.
    pub fn call_with_id(&self, req_id: RequestId, method: &str, args: Vec<Value>) -> PendingReply {
        self.issue(method, req_id, &args)
    }

    /// Generic `invoke` call. Ids are `<sub_method>:invoke:<n>` so two
    /// sub-methods never share a counter. `null` props are sent as `{}`.
    pub fn invoke(&self, sub_method: &str, props: Value) -> PendingReply {
        let props = if props.is_null() {
            Value::Object(Default::default())
        } else {
            props
        };
        self.call_namespaced(
            &format!("{sub_method}:invoke:"),
            "invoke",
            vec![Value::String(sub_method.to_owned()), props],
        )
    }

    /// A reply that is already rejected. Used by operations whose arguments
    /// fail validation before anything is dispatched.
    pub(crate) fn reject(&self, err: BridgeError) -> PendingReply {
        debug!("call rejected before dispatch: {err}");
        PendingReply::rejected(err)
    }

    #[instrument(skip_all, fields(method = method, req_id = %req_id))]
    fn issue(&self, method: &str, req_id: RequestId, args: &[Value]) -> PendingReply {
        let rx = match self.core.registry.add(req_id.clone(), method) {
            Ok(rx) => rx,
            Err(e) => return self.reject(e),
        };

        match self.transport.dispatch(method, &req_id, args) {
            Ok(Dispatch::Sent) => {
                let reply = PendingReply::waiting(req_id, rx, &self.core.registry);
                match self.config.default_timeout() {
                    Some(after) => reply.timeout(after),
                    None => reply,
                }
            }
            // No host will ever answer; the default timeout does not apply.
            Ok(Dispatch::Unsupported) => {
                self.core.registry.discard(&req_id);
                PendingReply::never(req_id)
            }
            Err(e) => {
                warn!(method, "dispatch failed: {e}");
                self.core.registry.discard(&req_id);
                PendingReply::rejected(e)
            }
        }
    }

    // -- Callbacks ----------------------------------------------------------

    /// Install or clear the handler for `slot`. Last write wins.
    pub fn set_callback(&self, slot: CallbackSlot, handler: Option<CallbackHandler>) {
        self.core.callbacks.set(slot, handler);
    }

    /// Fire the handler in `slot`, as the host does. Returns `false` when no
    /// handler is installed.
    pub fn trigger_callback(&self, slot: CallbackSlot, param: Option<Value>) -> bool {
        self.core.callbacks.fire(slot, param)
    }

    // -- Diagnostics --------------------------------------------------------

    /// Calls still waiting for a reply, oldest first.
    pub fn pending_calls(&self) -> Vec<PendingSnapshot> {
        self.core.registry.snapshot()
    }

    pub fn pending_count(&self) -> usize {
        self.core.registry.len()
    }

    /// Stop waiting for `req_id`. Its reply future resolves to
    /// [`BridgeError::Closed`] and a later reply is dropped.
    pub fn cancel(&self, req_id: &RequestId) -> bool {
        let cancelled = self.core.registry.discard(req_id);
        if cancelled {
            debug!(%req_id, "pending call cancelled");
        }
        cancelled
    }
}
