// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host-side key/value storage, reached through the `storage` method.
//
// Requests are `storage(storageMethod, data)` with ids `storage:<n>`.

use serde_json::{Value, json};

use aitu_core::Method;

use crate::facade::Bridge;
use crate::reply::{PendingReply, TypedReply};

/// Borrowed view of the bridge's storage methods.
pub struct Storage<'a> {
    bridge: &'a Bridge,
}

impl Bridge {
    pub fn storage(&self) -> Storage<'_> {
        Storage { bridge: self }
    }
}

impl Storage<'_> {
    fn request(&self, storage_method: &str, data: Value) -> PendingReply {
        self.bridge.call(
            Method::Storage.as_str(),
            vec![Value::String(storage_method.to_owned()), data],
        )
    }

    /// Stored value for `key`, or `None` when the host has nothing under it.
    pub fn get_item(&self, key: &str) -> TypedReply<Option<String>> {
        self.request("getItem", json!({ "keyName": key })).decode()
    }

    pub fn set_item(&self, key: &str, value: &str) -> PendingReply {
        self.request("setItem", json!({ "keyName": key, "keyValue": value }))
    }

    pub fn remove_item(&self, key: &str) -> PendingReply {
        self.request("removeItem", json!({ "keyName": key }))
    }

    pub fn clear(&self) -> PendingReply {
        self.request("clear", json!({}))
    }
}
