// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Callback slots for recurring host notifications (shake, tab activation,
// header menu click, custom back arrow click).
//
// One slot per kind, owned by the bridge instance. Registering replaces the
// previous handler; there is no correlation id and no reply.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, trace};

use aitu_core::CallbackSlot;

/// Handler stored in a slot. Receives the host's parameter, if any.
pub type CallbackHandler = Arc<dyn Fn(Option<Value>) + Send + Sync>;

#[derive(Default)]
pub struct CallbackTable {
    slots: Mutex<HashMap<CallbackSlot, CallbackHandler>>,
}

impl CallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` in `slot`, or clear the slot with `None`.
    pub fn set(&self, slot: CallbackSlot, handler: Option<CallbackHandler>) {
        if let Ok(mut slots) = self.slots.lock() {
            match handler {
                Some(handler) => {
                    slots.insert(slot, handler);
                    debug!(?slot, "callback registered");
                }
                None => {
                    slots.remove(&slot);
                    debug!(?slot, "callback cleared");
                }
            }
        }
    }

    pub fn is_set(&self, slot: CallbackSlot) -> bool {
        self.slots.lock().map(|s| s.contains_key(&slot)).unwrap_or(false)
    }

    /// Run the handler in `slot`. Returns `false` when the slot is empty.
    pub fn fire(&self, slot: CallbackSlot, param: Option<Value>) -> bool {
        // Clone out of the lock so a handler may re-register itself.
        let handler = self.slots.lock().ok().and_then(|s| s.get(&slot).cloned());
        match handler {
            Some(handler) => {
                handler(param);
                true
            }
            None => {
                trace!(?slot, "no handler registered");
                false
            }
        }
    }
}
