// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Direct-call transport (Android `AndroidBridge` style).
//
// The host injects an object whose methods are named after bridge methods.
// Each call passes the correlation id first, then the positional arguments.
// The native boundary only accepts flat values, so objects and arrays are
// serialized to JSON text before the call.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use aitu_core::RequestId;
use aitu_core::error::Result;

use crate::traits::*;

/// Transport calling methods on a host-injected object.
pub struct DirectCallTransport {
    host: Arc<dyn DirectCallHost>,
}

impl DirectCallTransport {
    pub fn new(host: Arc<dyn DirectCallHost>) -> Self {
        Self { host }
    }
}

impl Transport for DirectCallTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::DirectCall
    }

    fn supports(&self, method: &str) -> bool {
        self.host.has_method(method)
    }

    fn dispatch(&self, method: &str, req_id: &RequestId, args: &[Value]) -> Result<Dispatch> {
        if !self.host.has_method(method) {
            warn!(method, "direct-call host has no such method; call will never settle");
            return Ok(Dispatch::Unsupported);
        }

        let native_args = to_native_args(args)?;
        debug!(method, %req_id, argc = native_args.len(), "direct-call dispatch");
        self.host.call(method, req_id.as_str(), &native_args)?;
        Ok(Dispatch::Sent)
    }
}

/// Flatten JSON arguments for the native boundary.
pub fn to_native_args(args: &[Value]) -> Result<Vec<NativeArg>> {
    args.iter()
        .map(|arg| {
            Ok(match arg {
                Value::Null => NativeArg::Null,
                Value::Bool(b) => NativeArg::Bool(*b),
                Value::Number(n) => NativeArg::Number(n.clone()),
                Value::String(s) => NativeArg::Text(s.clone()),
                Value::Array(_) | Value::Object(_) => NativeArg::Text(serde_json::to_string(arg)?),
            })
        })
        .collect()
}
