// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Aitu bridge request/response correlation engine.
//!
//! A mini-app talks to its host through fire-and-forget calls. Each call
//! carries a correlation id; the host answers later with an event on one
//! shared channel, and the engine routes that event back to the caller's
//! [`PendingReply`].
//!
//! ```text
//! Bridge::call ─► IdNamespaces ─► Registry::add ─► Transport::dispatch
//!                                      ▲
//! host ─► Bridge::deliver ─► EventChannel ─► Demultiplexer ─► Registry::resolve
//! ```

pub mod callbacks;
pub mod channel;
pub mod counter;
pub mod facade;
pub mod operations;
pub mod registry;
pub mod reply;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use callbacks::{CallbackHandler, CallbackTable};
pub use channel::{Demultiplexer, EventChannel, Listener};
pub use counter::{IdGenerator, IdNamespaces};
pub use facade::Bridge;
pub use registry::{PendingSnapshot, Registry, Resolution};
pub use reply::{PendingReply, TypedReply};
pub use storage::Storage;

pub use aitu_core::error::{BridgeError, Result};
pub use aitu_core::{BridgeConfig, CallbackSlot, RequestId};
pub use aitu_transport::{HostEnvironment, TransportKind};
