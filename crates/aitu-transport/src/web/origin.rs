// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parent origin resolution for the cross-window transport.
//
// Precedence: the origin query parameter on this load (persisted for later
// loads), then the previously persisted value, then nothing.

use tracing::{debug, warn};

use crate::traits::KeyValueStore;

/// Resolve the parent window origin.
///
/// `search` is the page query string, with or without the leading `?`.
/// Returns `None` when neither the query nor the store provides an origin.
pub fn resolve_origin(
    search: Option<&str>,
    store: Option<&dyn KeyValueStore>,
    param: &str,
    storage_key: &str,
) -> Option<String> {
    if let Some(origin) = search.and_then(|s| query_param(s, param)) {
        if let Some(store) = store {
            if let Err(e) = store.set(storage_key, &origin) {
                warn!("failed to persist parent origin: {e}");
            }
        }
        debug!(%origin, "parent origin taken from query string");
        return Some(origin);
    }

    let persisted = store.and_then(|s| s.get(storage_key)).filter(|o| !o.is_empty());
    if let Some(origin) = &persisted {
        debug!(%origin, "parent origin taken from storage");
    }
    persisted
}

/// First non-empty value of `name` in a query string.
fn query_param(search: &str, name: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}
