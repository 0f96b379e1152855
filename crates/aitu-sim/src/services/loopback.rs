// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Loopback host.
//
// The host surfaces only enqueue outbound requests. A separate responder task
// drains the queue, computes canned replies and feeds them back through the
// bridge, so replies always arrive asynchronously the way a real host's do.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::{debug, info};

use aitu_bridge::Bridge;
use aitu_core::Method;
use aitu_core::error::{BridgeError, Result};
use aitu_transport::{
    DirectCallHost, HostEnvironment, KeyValueStore, NativeArg, ParentWindow,
};

/// Origin the simulated parent page pretends to live on.
pub const SIM_ORIGIN: &str = "https://sim.aitu.local";

/// Request captured from one of the loopback surfaces.
#[derive(Debug)]
pub enum Outbound {
    Direct {
        method: String,
        req_id: String,
        args: Vec<NativeArg>,
    },
    Window {
        message: Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    /// Injected host object.
    DirectCall,
    /// Iframe talking to a parent page.
    Framed,
}

struct LoopbackHost {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl DirectCallHost for LoopbackHost {
    fn has_method(&self, method: &str) -> bool {
        Method::from_str(method).is_ok()
    }

    fn call(&self, method: &str, req_id: &str, args: &[NativeArg]) -> Result<()> {
        self.tx
            .send(Outbound::Direct {
                method: method.to_owned(),
                req_id: req_id.to_owned(),
                args: args.to_vec(),
            })
            .map_err(|_| BridgeError::Surface("loopback responder stopped".into()))
    }
}

struct LoopbackWindow {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ParentWindow for LoopbackWindow {
    fn post_message(&self, message: Value, target_origin: &str) -> Result<()> {
        if target_origin != SIM_ORIGIN {
            return Err(BridgeError::Surface(format!(
                "parent lives on {SIM_ORIGIN}, not {target_origin}"
            )));
        }
        self.tx
            .send(Outbound::Window { message })
            .map_err(|_| BridgeError::Surface("loopback responder stopped".into()))
    }
}

/// Host environment backed by the loopback surfaces.
pub struct SimEnv {
    mode: SimMode,
    tx: mpsc::UnboundedSender<Outbound>,
    store: Arc<dyn KeyValueStore>,
    first_load: bool,
}

impl SimEnv {
    /// `first_load` controls whether the origin query parameter is present;
    /// later loads must find the origin in `store`.
    pub fn new(
        mode: SimMode,
        tx: mpsc::UnboundedSender<Outbound>,
        store: Arc<dyn KeyValueStore>,
        first_load: bool,
    ) -> Self {
        Self {
            mode,
            tx,
            store,
            first_load,
        }
    }
}

impl HostEnvironment for SimEnv {
    fn direct_call_host(&self) -> Option<Arc<dyn DirectCallHost>> {
        (self.mode == SimMode::DirectCall).then(|| {
            Arc::new(LoopbackHost {
                tx: self.tx.clone(),
            }) as Arc<dyn DirectCallHost>
        })
    }

    fn is_framed(&self) -> bool {
        self.mode == SimMode::Framed
    }

    fn parent_window(&self) -> Option<Arc<dyn ParentWindow>> {
        Some(Arc::new(LoopbackWindow {
            tx: self.tx.clone(),
        }))
    }

    fn location_search(&self) -> Option<String> {
        self.first_load
            .then(|| format!("?__aitu-domain={SIM_ORIGIN}&lang=ru"))
    }

    fn origin_store(&self) -> Option<Arc<dyn KeyValueStore>> {
        Some(self.store.clone())
    }
}

/// Canned host behaviour, including a small key/value store for `storage`.
#[derive(Debug, Default)]
pub struct Responder {
    storage: HashMap<String, String>,
}

impl Responder {
    /// Reply event for one request.
    pub fn answer(&mut self, method: &str, req_id: &str, args: &[Value]) -> Value {
        let outcome = match Method::from_str(method) {
            Ok(Method::GetQr) => Ok(json!("https://aitu.io/qr/simulated")),
            Ok(Method::GetGeo) => Ok(json!({ "latitude": 43.238949, "longitude": 76.889709 })),
            Ok(Method::GetSmsCode) => Ok(json!("1234")),
            Ok(Method::CheckBiometry) => Err(json!({
                "code": "permission_denied",
                "msg": "permission deny",
                "meta": { "can_retry": true }
            })),
            Ok(Method::GetCustomBackArrowMode) => Ok(json!(false)),
            Ok(Method::GetNavigationItemMode) => Ok(json!("SystemBackArrow")),
            Ok(Method::Invoke) => self.invoke(args),
            Ok(Method::Storage) => self.storage(args),
            Ok(_) => Ok(json!("success")),
            Err(_) => Err(json!({ "code": "unknown_method", "msg": format!("no such method {method}") })),
        };

        match outcome {
            Ok(data) => json!({ "reqId": req_id, "data": data, "error": null }),
            Err(error) => json!({ "reqId": req_id, "data": null, "error": error }),
        }
    }

    fn invoke(&self, args: &[Value]) -> std::result::Result<Value, Value> {
        match args.first().and_then(Value::as_str) {
            Some("GetMe") => Ok(json!({
                "name": "Aigerim",
                "lastname": "Sadykova",
                "id": "sim-user-1",
                "sign": "c2lt"
            })),
            Some("GetPhone") => Ok(json!({ "phone": "+77010000000", "sign": "c2lt" })),
            Some(other) => Ok(json!({ "invoked": other })),
            None => Err(json!({ "code": "bad_request", "msg": "invoke without sub-method" })),
        }
    }

    fn storage(&mut self, args: &[Value]) -> std::result::Result<Value, Value> {
        let data = args.get(1).cloned().unwrap_or(Value::Null);
        let key = data
            .get("keyName")
            .and_then(Value::as_str)
            .map(str::to_owned);

        match (args.first().and_then(Value::as_str), key) {
            (Some("getItem"), Some(key)) => Ok(self
                .storage
                .get(&key)
                .map_or(Value::Null, |v| Value::String(v.clone()))),
            (Some("setItem"), Some(key)) => {
                let value = data
                    .get("keyValue")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                self.storage.insert(key, value.to_owned());
                Ok(Value::Null)
            }
            (Some("removeItem"), Some(key)) => {
                self.storage.remove(&key);
                Ok(Value::Null)
            }
            (Some("clear"), _) => {
                self.storage.clear();
                Ok(Value::Null)
            }
            _ => Err(json!({ "code": "bad_request", "msg": "malformed storage request" })),
        }
    }
}

/// Undo the direct-call flattening: JSON text that parses as an object or
/// array becomes structured again.
fn restore_arg(arg: &NativeArg) -> Value {
    match arg {
        NativeArg::Text(text) if text.starts_with('{') || text.starts_with('[') => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
        }
        NativeArg::Text(text) => Value::String(text.clone()),
        NativeArg::Bool(b) => Value::Bool(*b),
        NativeArg::Number(n) => Value::Number(n.clone()),
        NativeArg::Null => Value::Null,
    }
}

/// Drain `rx`, answering every request through `bridge`.
pub async fn respond(bridge: Bridge, mut rx: mpsc::UnboundedReceiver<Outbound>) {
    let mut responder = Responder::default();
    while let Some(outbound) = rx.recv().await {
        // Yield once so the caller is already awaiting when the reply lands.
        tokio::task::yield_now().await;
        match outbound {
            Outbound::Direct {
                method,
                req_id,
                args,
            } => {
                let args: Vec<Value> = args.iter().map(restore_arg).collect();
                debug!(%method, %req_id, "host received direct call");
                bridge.deliver(responder.answer(&method, &req_id, &args));
            }
            Outbound::Window { message } => {
                let method = message["method"].as_str().unwrap_or_default().to_owned();
                let req_id = message["reqId"].as_str().unwrap_or_default().to_owned();
                let args = message["payload"].as_array().cloned().unwrap_or_default();
                debug!(%method, %req_id, "parent received window message");
                let reply = responder.answer(&method, &req_id, &args);
                bridge.receive_window_message(SIM_ORIGIN, &reply);
            }
        }
    }
    info!("loopback responder stopped");
}
