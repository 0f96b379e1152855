// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Aitu bridge host-surface transports.
//!
//! Defines the traits a host environment implements and the three transport
//! adapters that speak each host's calling convention. Selection happens once,
//! at bridge construction, and the result never changes for the life of the
//! process.

pub mod traits;

pub mod android;
pub mod ios;
pub mod store;
pub mod stub;
pub mod web;

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use aitu_core::error::Result;
use aitu_core::{BridgeConfig, RequestId};

pub use android::DirectCallTransport;
pub use ios::MessagePostTransport;
pub use store::{JsonFileStore, MemoryStore};
pub use stub::UnsupportedTransport;
pub use traits::*;
pub use web::CrossWindowTransport;

/// The transport serving this process, fixed at construction.
pub enum ActiveTransport {
    DirectCall(DirectCallTransport),
    MessagePost(MessagePostTransport),
    CrossWindow(CrossWindowTransport),
    Unsupported(UnsupportedTransport),
}

impl ActiveTransport {
    fn inner(&self) -> &dyn Transport {
        match self {
            ActiveTransport::DirectCall(t) => t,
            ActiveTransport::MessagePost(t) => t,
            ActiveTransport::CrossWindow(t) => t,
            ActiveTransport::Unsupported(t) => t,
        }
    }

    /// The cross-window transport, if that is the one selected.
    pub fn as_cross_window(&self) -> Option<&CrossWindowTransport> {
        match self {
            ActiveTransport::CrossWindow(t) => Some(t),
            _ => None,
        }
    }
}

impl Transport for ActiveTransport {
    fn kind(&self) -> TransportKind {
        self.inner().kind()
    }

    fn supports(&self, method: &str) -> bool {
        self.inner().supports(method)
    }

    fn dispatch(&self, method: &str, req_id: &RequestId, args: &[Value]) -> Result<Dispatch> {
        self.inner().dispatch(method, req_id, args)
    }
}

/// Probe `env` and pick the transport for this process.
///
/// First match wins, in fixed priority order: direct-call host, then
/// message-post host, then parent window (only when framed). A framed app
/// whose parent origin cannot be resolved is unsupported rather than falling
/// through.
pub fn select_transport(
    env: &dyn HostEnvironment,
    sink: Arc<dyn EventSink>,
    config: &BridgeConfig,
) -> ActiveTransport {
    let selected = probe(env, sink, config);
    info!(transport = %selected.kind(), "bridge transport selected");
    selected
}

fn probe(env: &dyn HostEnvironment, sink: Arc<dyn EventSink>, config: &BridgeConfig) -> ActiveTransport {
    if let Some(host) = env.direct_call_host() {
        return ActiveTransport::DirectCall(DirectCallTransport::new(host));
    }

    if let Some(host) = env.message_post_host() {
        return ActiveTransport::MessagePost(MessagePostTransport::new(host));
    }

    if env.is_framed() {
        let Some(window) = env.parent_window() else {
            return ActiveTransport::Unsupported(UnsupportedTransport);
        };
        let search = env.location_search();
        let store = env.origin_store();
        let origin = web::resolve_origin(
            search.as_deref(),
            store.as_deref(),
            &config.origin_param,
            &config.origin_storage_key,
        );
        return match origin {
            Some(origin) => ActiveTransport::CrossWindow(CrossWindowTransport::new(
                window,
                sink,
                origin,
                config.message_source.clone(),
            )),
            None => {
                tracing::warn!("framed without a resolvable parent origin");
                ActiveTransport::Unsupported(UnsupportedTransport)
            }
        };
    }

    ActiveTransport::Unsupported(UnsupportedTransport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aitu_core::CallbackSlot;
    use serde_json::Map;

    struct NullSink;

    impl EventSink for NullSink {
        fn emit(&self, _detail: Value) {}
        fn fire_callback(&self, _slot: CallbackSlot, _param: Option<Value>) {}
    }

    struct AnyDirect;

    impl DirectCallHost for AnyDirect {
        fn has_method(&self, _method: &str) -> bool {
            true
        }
        fn call(&self, _method: &str, _req_id: &str, _args: &[NativeArg]) -> Result<()> {
            Ok(())
        }
    }

    struct AnyMessage;

    impl MessagePostHost for AnyMessage {
        fn has_handler(&self, _method: &str) -> bool {
            true
        }
        fn post_message(&self, _method: &str, _message: Map<String, Value>) -> Result<()> {
            Ok(())
        }
    }

    struct AnyWindow;

    impl ParentWindow for AnyWindow {
        fn post_message(&self, _message: Value, _target_origin: &str) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Env {
        direct: bool,
        message: bool,
        framed: bool,
        search: Option<&'static str>,
    }

    impl HostEnvironment for Env {
        fn direct_call_host(&self) -> Option<Arc<dyn DirectCallHost>> {
            self.direct.then(|| Arc::new(AnyDirect) as Arc<dyn DirectCallHost>)
        }
        fn message_post_host(&self) -> Option<Arc<dyn MessagePostHost>> {
            self.message.then(|| Arc::new(AnyMessage) as Arc<dyn MessagePostHost>)
        }
        fn is_framed(&self) -> bool {
            self.framed
        }
        fn parent_window(&self) -> Option<Arc<dyn ParentWindow>> {
            Some(Arc::new(AnyWindow))
        }
        fn location_search(&self) -> Option<String> {
            self.search.map(str::to_owned)
        }
    }

    fn select(env: &Env) -> TransportKind {
        select_transport(env, Arc::new(NullSink), &BridgeConfig::default()).kind()
    }

    #[test]
    fn direct_call_beats_message_post() {
        let env = Env {
            direct: true,
            message: true,
            framed: true,
            search: Some("?__aitu-domain=test.domain"),
        };
        assert_eq!(select(&env), TransportKind::DirectCall);
    }

    #[test]
    fn message_post_beats_cross_window() {
        let env = Env {
            message: true,
            framed: true,
            search: Some("?__aitu-domain=test.domain"),
            ..Default::default()
        };
        assert_eq!(select(&env), TransportKind::MessagePost);
    }

    #[test]
    fn framed_with_origin_is_cross_window() {
        let env = Env {
            framed: true,
            search: Some("?__aitu-domain=test.domain"),
            ..Default::default()
        };
        let transport = select_transport(&env, Arc::new(NullSink), &BridgeConfig::default());
        assert_eq!(transport.kind(), TransportKind::CrossWindow);
        assert_eq!(
            transport.as_cross_window().map(|t| t.origin().to_owned()).as_deref(),
            Some("test.domain")
        );
    }

    #[test]
    fn framed_without_origin_is_unsupported() {
        let env = Env {
            framed: true,
            ..Default::default()
        };
        assert_eq!(select(&env), TransportKind::Unsupported);
    }

    #[test]
    fn no_host_is_unsupported() {
        assert_eq!(
            select_transport(&NoHost, Arc::new(NullSink), &BridgeConfig::default()).kind(),
            TransportKind::Unsupported
        );
    }

    #[test]
    fn kind_serializes_as_its_display_name() {
        for kind in [
            TransportKind::DirectCall,
            TransportKind::MessagePost,
            TransportKind::CrossWindow,
            TransportKind::Unsupported,
        ] {
            assert_eq!(
                serde_json::to_value(kind).expect("serialize"),
                Value::String(kind.to_string())
            );
        }
    }
}
