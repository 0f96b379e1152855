// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Correlation id generation.
//
// Ids are `<prefix><n>` with `n` counting up from 1 per prefix. Prefixes are
// independent: `getQr:1` and `getGeo:1` can coexist, and ids are never reused
// for the lifetime of the bridge.

use std::collections::HashMap;
use std::sync::Mutex;

use aitu_core::RequestId;

/// Counter with a fixed prefix.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    current: u64,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            current: 0,
        }
    }

    pub fn next_id(&mut self) -> RequestId {
        self.current += 1;
        RequestId(format!("{}{}", self.prefix, self.current))
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.current
    }
}

/// Lazily created generator per namespace.
#[derive(Debug, Default)]
pub struct IdNamespaces {
    generators: Mutex<HashMap<String, IdGenerator>>,
}

impl IdNamespaces {
    /// Next id under `prefix`, creating its generator on first use.
    pub fn next_id(&self, prefix: &str) -> RequestId {
        let mut generators = self
            .generators
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        generators
            .entry(prefix.to_owned())
            .or_insert_with(|| IdGenerator::new(prefix))
            .next_id()
    }
}
