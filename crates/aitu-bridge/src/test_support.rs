// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording host surfaces for unit tests.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use aitu_core::error::{BridgeError, Result};
use aitu_transport::{
    DirectCallHost, HostEnvironment, KeyValueStore, MemoryStore, MessagePostHost, NativeArg,
    ParentWindow,
};

pub type DirectCall = (String, String, Vec<NativeArg>);

/// Direct-call host that records every call.
pub struct RecordingDirectHost {
    methods: Option<Vec<String>>,
    fail: bool,
    calls: Mutex<Vec<DirectCall>>,
}

impl RecordingDirectHost {
    pub fn accepting_all() -> Arc<Self> {
        Arc::new(Self {
            methods: None,
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_methods(methods: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            methods: Some(methods.iter().map(|m| (*m).to_owned()).collect()),
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Host whose every call raises.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            methods: None,
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<DirectCall> {
        self.calls.lock().expect("lock").clone()
    }
}

impl DirectCallHost for RecordingDirectHost {
    fn has_method(&self, method: &str) -> bool {
        self.methods
            .as_ref()
            .is_none_or(|methods| methods.iter().any(|m| m == method))
    }

    fn call(&self, method: &str, req_id: &str, args: &[NativeArg]) -> Result<()> {
        if self.fail {
            return Err(BridgeError::Surface(format!("{method} raised on the host")));
        }
        self.calls
            .lock()
            .expect("lock")
            .push((method.to_owned(), req_id.to_owned(), args.to_vec()));
        Ok(())
    }
}

/// Message-post host that records every posted message.
pub struct RecordingMessageHost {
    handlers: Option<Vec<String>>,
    messages: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl RecordingMessageHost {
    pub fn accepting_all() -> Arc<Self> {
        Arc::new(Self {
            handlers: None,
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn with_handlers(handlers: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            handlers: Some(handlers.iter().map(|h| (*h).to_owned()).collect()),
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn messages(&self) -> Vec<(String, Map<String, Value>)> {
        self.messages.lock().expect("lock").clone()
    }
}

impl MessagePostHost for RecordingMessageHost {
    fn has_handler(&self, method: &str) -> bool {
        self.handlers
            .as_ref()
            .is_none_or(|handlers| handlers.iter().any(|h| h == method))
    }

    fn post_message(&self, method: &str, message: Map<String, Value>) -> Result<()> {
        self.messages
            .lock()
            .expect("lock")
            .push((method.to_owned(), message));
        Ok(())
    }
}

/// Parent window that records posted messages with their target origin.
#[derive(Default)]
pub struct RecordingWindow {
    posted: Mutex<Vec<(Value, String)>>,
}

impl RecordingWindow {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn posted(&self) -> Vec<(Value, String)> {
        self.posted.lock().expect("lock").clone()
    }
}

impl ParentWindow for RecordingWindow {
    fn post_message(&self, message: Value, target_origin: &str) -> Result<()> {
        self.posted
            .lock()
            .expect("lock")
            .push((message, target_origin.to_owned()));
        Ok(())
    }
}

/// Configurable host environment.
#[derive(Default)]
pub struct TestEnv {
    pub direct: Option<Arc<RecordingDirectHost>>,
    pub message: Option<Arc<RecordingMessageHost>>,
    pub window: Option<Arc<RecordingWindow>>,
    pub search: Option<String>,
    pub store: Option<Arc<MemoryStore>>,
}

impl TestEnv {
    pub fn direct(host: Arc<RecordingDirectHost>) -> Self {
        Self {
            direct: Some(host),
            ..Default::default()
        }
    }

    pub fn message(host: Arc<RecordingMessageHost>) -> Self {
        Self {
            message: Some(host),
            ..Default::default()
        }
    }

    pub fn framed(window: Arc<RecordingWindow>, search: &str) -> Self {
        Self {
            window: Some(window),
            search: Some(search.to_owned()),
            store: Some(Arc::new(MemoryStore::default())),
            ..Default::default()
        }
    }
}

impl HostEnvironment for TestEnv {
    fn direct_call_host(&self) -> Option<Arc<dyn DirectCallHost>> {
        self.direct.clone().map(|h| h as Arc<dyn DirectCallHost>)
    }

    fn message_post_host(&self) -> Option<Arc<dyn MessagePostHost>> {
        self.message.clone().map(|h| h as Arc<dyn MessagePostHost>)
    }

    fn is_framed(&self) -> bool {
        self.window.is_some()
    }

    fn parent_window(&self) -> Option<Arc<dyn ParentWindow>> {
        self.window.clone().map(|w| w as Arc<dyn ParentWindow>)
    }

    fn location_search(&self) -> Option<String> {
        self.search.clone()
    }

    fn origin_store(&self) -> Option<Arc<dyn KeyValueStore>> {
        self.store.clone().map(|s| s as Arc<dyn KeyValueStore>)
    }
}
