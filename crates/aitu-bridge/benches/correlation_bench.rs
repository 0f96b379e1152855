// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the correlation hot path: id generation, the
// registry round trip, and a full call through the facade on a host that
// accepts everything.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};

use aitu_bridge::{Bridge, IdGenerator, IdNamespaces, Registry, RequestId};
use aitu_core::error::Result;
use aitu_core::SuccessRule;
use aitu_transport::{DirectCallHost, HostEnvironment, NativeArg};

struct SilentHost;

impl DirectCallHost for SilentHost {
    fn has_method(&self, _method: &str) -> bool {
        true
    }

    fn call(&self, _method: &str, _req_id: &str, _args: &[NativeArg]) -> Result<()> {
        Ok(())
    }
}

struct SilentEnv;

impl HostEnvironment for SilentEnv {
    fn direct_call_host(&self) -> Option<Arc<dyn DirectCallHost>> {
        Some(Arc::new(SilentHost))
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_id_generation(c: &mut Criterion) {
    let mut generator = IdGenerator::new("getQr:");
    c.bench_function("id_generator next_id", |b| {
        b.iter(|| black_box(generator.next_id()));
    });

    let namespaces = IdNamespaces::default();
    c.bench_function("id_namespaces next_id", |b| {
        b.iter(|| black_box(namespaces.next_id(black_box("getGeo:"))));
    });
}

fn bench_registry_round_trip(c: &mut Criterion) {
    let registry = Registry::new();
    let mut generator = IdGenerator::new("share:");
    c.bench_function("registry add + resolve", |b| {
        b.iter(|| {
            let id: RequestId = generator.next_id();
            let _rx = registry.add(id.clone(), "share");
            black_box(registry.resolve(&id, json!("success"), None, |data, error| {
                SuccessRule::ErrorAbsent.is_success(data, error)
            }));
        });
    });
}

fn bench_facade_call(c: &mut Criterion) {
    let bridge = Bridge::detect(&SilentEnv);
    let mut n: u64 = 0;
    c.bench_function("bridge call + deliver", |b| {
        b.iter(|| {
            n += 1;
            let _reply = bridge.call("getQr", Vec::<Value>::new());
            bridge.deliver(json!({ "reqId": format!("getQr:{n}"), "data": "qr" }));
        });
    });
}

criterion_group!(
    benches,
    bench_id_generation,
    bench_registry_round_trip,
    bench_facade_call
);
criterion_main!(benches);
