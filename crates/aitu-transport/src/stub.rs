// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub transport for environments without any host surface (plain browser
// tab, desktop, CI).
//
// Every dispatch only logs. The caller still gets a well-formed reply future;
// it simply never settles.

use serde_json::Value;

use aitu_core::RequestId;
use aitu_core::error::Result;

use crate::traits::*;

/// No-op transport used when environment detection finds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedTransport;

impl Transport for UnsupportedTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Unsupported
    }

    fn supports(&self, _method: &str) -> bool {
        false
    }

    fn dispatch(&self, method: &str, req_id: &RequestId, _args: &[Value]) -> Result<Dispatch> {
        tracing::warn!(method, %req_id, "no host surface available; call will never settle");
        Ok(Dispatch::Unsupported)
    }
}
