// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Aitu bridge core: types, method catalogue and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod host_errors;
pub mod methods;
pub mod types;

pub use config::BridgeConfig;
pub use error::BridgeError;
pub use methods::{CallbackSlot, InvokeRequest, Method};
pub use types::*;
