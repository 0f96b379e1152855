// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Message-post transport (iOS `webkit.messageHandlers` style).
//
// The host registers one message handler per method. A request is a single
// structured object `{ reqId, ...namedFields }`; positional arguments are
// renamed using the field table in `aitu_core::methods`. Structured values
// cross the boundary natively, so nothing is pre-serialized.

use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use aitu_core::error::Result;
use aitu_core::{Method, RequestId};

use crate::traits::*;

/// Transport posting structured messages to per-method handlers.
pub struct MessagePostTransport {
    host: Arc<dyn MessagePostHost>,
}

impl MessagePostTransport {
    pub fn new(host: Arc<dyn MessagePostHost>) -> Self {
        Self { host }
    }
}

impl Transport for MessagePostTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::MessagePost
    }

    fn supports(&self, method: &str) -> bool {
        self.host.has_handler(method)
    }

    fn dispatch(&self, method: &str, req_id: &RequestId, args: &[Value]) -> Result<Dispatch> {
        if !self.host.has_handler(method) {
            warn!(method, "no message handler for method; call will never settle");
            return Ok(Dispatch::Unsupported);
        }

        let message = build_message(method, req_id, args);
        debug!(method, %req_id, "message-post dispatch");
        self.host.post_message(method, message)?;
        Ok(Dispatch::Sent)
    }
}

/// Build `{ reqId, ...fields }` for `method`.
///
/// Catalogue methods get their named fields; missing trailing arguments are
/// omitted and surplus ones dropped. Methods outside the catalogue carry their
/// arguments as a `payload` array.
pub fn build_message(method: &str, req_id: &RequestId, args: &[Value]) -> Map<String, Value> {
    let mut message = Map::new();
    message.insert("reqId".into(), Value::String(req_id.to_string()));

    match Method::from_str(method) {
        Ok(known) => {
            let fields = known.message_fields();
            if args.len() > fields.len() {
                warn!(
                    method,
                    expected = fields.len(),
                    got = args.len(),
                    "dropping surplus arguments"
                );
            }
            for (field, value) in fields.iter().zip(args) {
                message.insert((*field).to_owned(), value.clone());
            }
        }
        Err(_) => {
            if !args.is_empty() {
                message.insert("payload".into(), Value::Array(args.to_vec()));
            }
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHandlers {
        handlers: Vec<&'static str>,
        posted: Mutex<Vec<(String, Value)>>,
    }

    impl MessagePostHost for RecordingHandlers {
        fn has_handler(&self, method: &str) -> bool {
            self.handlers.contains(&method)
        }

        fn post_message(&self, method: &str, message: Map<String, Value>) -> Result<()> {
            self.posted
                .lock()
                .expect("lock")
                .push((method.into(), Value::Object(message)));
            Ok(())
        }
    }

    #[test]
    fn share_file_uses_named_fields() {
        let host = Arc::new(RecordingHandlers {
            handlers: vec!["shareFile"],
            ..Default::default()
        });
        let transport = MessagePostTransport::new(host.clone());

        transport
            .dispatch(
                "shareFile",
                &RequestId::from("shareFile:1"),
                &[json!("look"), json!("image.png"), json!("iVBORw0")],
            )
            .expect("dispatch");

        let posted = host.posted.lock().expect("lock");
        assert_eq!(posted[0].0, "shareFile");
        assert_eq!(
            posted[0].1,
            json!({
                "reqId": "shareFile:1",
                "text": "look",
                "filename": "image.png",
                "base64Data": "iVBORw0",
            })
        );
    }

    #[test]
    fn structured_arguments_are_not_serialized() {
        let message = build_message("vibrate", &RequestId::from("vibrate:1"), &[json!([100, 200])]);
        assert_eq!(Value::Object(message), json!({ "reqId": "vibrate:1", "pattern": [100, 200] }));
    }

    #[test]
    fn uncatalogued_method_carries_payload_array() {
        let message = build_message("scanBarcode", &RequestId::from("scanBarcode:1"), &[json!(1)]);
        assert_eq!(
            Value::Object(message),
            json!({ "reqId": "scanBarcode:1", "payload": [1] })
        );
    }

    #[test]
    fn missing_handler_is_unsupported() {
        let host = Arc::new(RecordingHandlers::default());
        let transport = MessagePostTransport::new(host.clone());
        let outcome = transport
            .dispatch("getQr", &RequestId::from("getQr:1"), &[])
            .expect("dispatch");
        assert_eq!(outcome, Dispatch::Unsupported);
        assert!(host.posted.lock().expect("lock").is_empty());
    }
}
