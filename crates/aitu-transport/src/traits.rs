// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for host surfaces and transports.
//
// A host surface is whatever the embedding shell exposes to the web app: a
// method object injected into the page (Android), a set of message handlers
// (iOS WKWebView), or the parent window of an iframe. Environment detection
// hands those surfaces to `select_transport`, which wraps exactly one of them
// in a transport adapter.

use std::sync::Arc;

use aitu_core::error::Result;
use aitu_core::{CallbackSlot, RequestId};
use serde::Serialize;
use serde_json::{Map, Value};

/// Which transport serves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    /// Methods invoked directly on a host-injected object.
    DirectCall,
    /// `postMessage` on a per-method handler object.
    MessagePost,
    /// Structured messages posted to the parent window.
    CrossWindow,
    /// No host surface detected; every call stays pending.
    Unsupported,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::DirectCall => write!(f, "direct-call"),
            TransportKind::MessagePost => write!(f, "message-post"),
            TransportKind::CrossWindow => write!(f, "cross-window"),
            TransportKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Outcome of handing a request to a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Delivered to the host surface; the reply arrives on the event channel.
    Sent,
    /// The surface (or this particular method on it) is missing. The call
    /// will never be answered.
    Unsupported,
}

/// Fire-and-forget delivery of a correlated request.
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Whether the host surface exposes `method`.
    fn supports(&self, method: &str) -> bool;

    /// Emit `method` tagged with `req_id`. Never waits for the reply.
    fn dispatch(&self, method: &str, req_id: &RequestId, args: &[Value]) -> Result<Dispatch>;
}

/// Argument as it crosses a flat native boundary (JNI-style): only strings,
/// booleans, numbers and null. Objects and arrays are pre-serialized to JSON
/// text.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeArg {
    Text(String),
    Bool(bool),
    Number(serde_json::Number),
    Null,
}

/// Host object whose methods are called directly,
/// `host[method](reqId, ...args)`.
pub trait DirectCallHost: Send + Sync {
    fn has_method(&self, method: &str) -> bool;

    fn call(&self, method: &str, req_id: &str, args: &[NativeArg]) -> Result<()>;
}

/// Host exposing one message handler per method,
/// `host[method].postMessage({ reqId, ...fields })`.
pub trait MessagePostHost: Send + Sync {
    fn has_handler(&self, method: &str) -> bool;

    fn post_message(&self, method: &str, message: Map<String, Value>) -> Result<()>;
}

/// The parent browsing context, `window.top.postMessage(message, origin)`.
pub trait ParentWindow: Send + Sync {
    fn post_message(&self, message: Value, target_origin: &str) -> Result<()>;
}

/// Durable string storage (the web `localStorage` equivalent).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Receiving end of the shared event channel, as seen by transports that
/// must translate their own inbound traffic (the cross-window transport).
pub trait EventSink: Send + Sync {
    /// Publish a raw event payload on the shared channel.
    fn emit(&self, detail: Value);

    /// Fire a registered host callback.
    fn fire_callback(&self, slot: CallbackSlot, param: Option<Value>);
}

/// Capability probe over the embedding environment.
///
/// Every accessor defaults to "absent", so an environment only needs to
/// override what it actually provides.
pub trait HostEnvironment {
    fn direct_call_host(&self) -> Option<Arc<dyn DirectCallHost>> {
        None
    }

    fn message_post_host(&self) -> Option<Arc<dyn MessagePostHost>> {
        None
    }

    /// Whether the app runs inside a nested browsing context.
    fn is_framed(&self) -> bool {
        false
    }

    fn parent_window(&self) -> Option<Arc<dyn ParentWindow>> {
        None
    }

    /// Query string of the page URL, with or without the leading `?`.
    fn location_search(&self) -> Option<String> {
        None
    }

    /// Storage used to cache the parent origin across page loads.
    fn origin_store(&self) -> Option<Arc<dyn KeyValueStore>> {
        None
    }
}

/// Environment with no host at all (outside any WebView).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHost;

impl HostEnvironment for NoHost {}
